//! `pkgtally containers` command handler

use std::io::Write;

use serde::Serialize;

use pkgtally_core::config::PkgtallyConfig;
use pkgtally_docker::DockerClient;

use crate::commands::connect_docker;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `containers` command.
pub async fn execute(config: &PkgtallyConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let docker = connect_docker(&config.docker)?;
    let containers = docker.list_containers().await?;

    let entries = containers
        .into_iter()
        .map(|c| ContainerEntry {
            id: c.id,
            name: c.name,
            image: c.image,
            status: c.status,
        })
        .collect();

    writer.render(&ContainerList { containers: entries })?;
    Ok(())
}

#[derive(Serialize)]
pub struct ContainerList {
    pub containers: Vec<ContainerEntry>,
}

#[derive(Serialize)]
pub struct ContainerEntry {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
}

impl Render for ContainerList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.containers.is_empty() {
            writeln!(w, "No running containers.")?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<12} {:<30} {:<40} {:<10}",
            "ID", "Name", "Image", "Status"
        )?;
        writeln!(w, "{}", "-".repeat(92))?;

        for container in &self.containers {
            let short_id = if container.id.len() > 12 {
                &container.id[..12]
            } else {
                &container.id
            };
            writeln!(
                w,
                "{:<12} {:<30} {:<40} {:<10}",
                short_id, container.name, container.image, container.status
            )?;
        }

        Ok(())
    }
}
