//! `pkgtally formats` command handler

use std::io::Write;

use serde::Serialize;

use pkgtally_inventory::default_formats;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `formats` command.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    let entries = default_formats()
        .iter()
        .map(|format| FormatEntry {
            manager: format.manager().to_string(),
            files_needed: format
                .files_needed()
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
        })
        .collect();

    writer.render(&FormatList { formats: entries })?;
    Ok(())
}

#[derive(Serialize)]
pub struct FormatList {
    pub formats: Vec<FormatEntry>,
}

#[derive(Serialize)]
pub struct FormatEntry {
    pub manager: String,
    pub files_needed: Vec<String>,
}

impl Render for FormatList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{:<10} Files", "Manager")?;
        writeln!(w, "{}", "-".repeat(60))?;
        for format in &self.formats {
            writeln!(w, "{:<10} {}", format.manager, format.files_needed.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_default_formats() {
        let entries: Vec<FormatEntry> = default_formats()
            .iter()
            .map(|format| FormatEntry {
                manager: format.manager().to_string(),
                files_needed: format
                    .files_needed()
                    .iter()
                    .map(|p| (*p).to_owned())
                    .collect(),
            })
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].manager, "apk");
        assert_eq!(entries[0].files_needed, vec!["/lib/apk/db/installed"]);
        assert_eq!(entries[1].manager, "deb");
        assert_eq!(entries[1].files_needed, vec!["/var/lib/dpkg/status"]);
    }

    #[test]
    fn renders_text_table() {
        let list = FormatList {
            formats: vec![FormatEntry {
                manager: "apk".to_owned(),
                files_needed: vec!["/lib/apk/db/installed".to_owned()],
            }],
        };
        let mut buffer = Vec::new();
        list.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("apk"));
        assert!(output.contains("/lib/apk/db/installed"));
    }
}
