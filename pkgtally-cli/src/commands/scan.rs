//! `pkgtally scan` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use pkgtally_core::config::PkgtallyConfig;
use pkgtally_core::report::Report;
use pkgtally_core::types::Manager;
use pkgtally_docker::BollardDockerClient;
use pkgtally_inventory::{InventoryScannerBuilder, PackageDb, default_formats};

use crate::cli::ScanArgs;
use crate::commands::connect_docker;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config: &PkgtallyConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let include_host = config.scan.include_host && !args.containers_only;
    let include_containers =
        config.scan.include_containers && config.docker.enabled && !args.host_only;

    let mut builder = InventoryScannerBuilder::<BollardDockerClient>::new()
        .with_config(config)
        .formats(resolve_formats(args.manager.as_deref())?)
        .include_host(include_host)
        .include_containers(include_containers);

    if let Some(hostname) = args.hostname {
        builder = builder.hostname(hostname);
    }

    if include_containers {
        builder = builder.docker_client(connect_docker(&config.docker)?);
    }

    let scanner = builder.build()?;

    info!(include_host, include_containers, "starting inventory scan");
    let report = scanner.scan().await?;
    info!(packages = report.total_packages(), "inventory scan finished");

    writer.render(&ScanOutput(report))?;
    Ok(())
}

/// Resolve the format list for a scan, applying the optional
/// `--manager` filter.
fn resolve_formats(filter: Option<&str>) -> Result<Vec<Box<dyn PackageDb>>, CliError> {
    let Some(raw) = filter else {
        return Ok(default_formats());
    };
    let manager = Manager::from_str_loose(raw).ok_or_else(|| {
        CliError::Command(format!(
            "unknown package manager '{raw}', expected one of: apk, deb"
        ))
    })?;
    Ok(default_formats()
        .into_iter()
        .filter(|format| format.manager() == manager)
        .collect())
}

/// Report wrapper carrying the text rendering.
///
/// JSON output serialises the report transparently, preserving the
/// downstream wire tags.
#[derive(Serialize)]
#[serde(transparent)]
pub struct ScanOutput(pub Report);

impl Render for ScanOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let report = &self.0;

        writeln!(w, "Host: {}", report.hostname.bold())?;
        writeln!(w, "Scan ID: {}", report.scan_id)?;
        writeln!(w)?;

        writeln!(
            w,
            "{} ({} packages)",
            "Host packages".bold(),
            report.host_packages.len()
        )?;
        render_package_table(w, &report.host_packages)?;

        for container in &report.containers {
            writeln!(w)?;
            let short_id = if container.id.len() > 12 {
                &container.id[..12]
            } else {
                &container.id
            };
            writeln!(
                w,
                "{} {} ({}, {} packages)",
                "Container".bold(),
                short_id,
                container.image,
                container.packages.len()
            )?;
            render_package_table(w, &container.packages)?;
        }

        writeln!(w)?;
        writeln!(w, "Total: {} packages", report.total_packages())?;

        Ok(())
    }
}

fn render_package_table(
    w: &mut dyn Write,
    packages: &[pkgtally_core::types::PackageRecord],
) -> std::io::Result<()> {
    if packages.is_empty() {
        writeln!(w, "  (none)")?;
        return Ok(());
    }

    writeln!(w, "  {:<30} {:<20} {:<8}", "Name", "Version", "Manager")?;
    writeln!(w, "  {}", "-".repeat(58))?;
    for package in packages {
        writeln!(
            w,
            "  {:<30} {:<20} {:<8}",
            package.name, package.version, package.manager
        )?;
    }
    Ok(())
}
