//! Command handlers -- one module per subcommand

pub mod containers;
pub mod formats;
pub mod scan;

use std::sync::Arc;

use pkgtally_core::config::DockerConfig;
use pkgtally_docker::BollardDockerClient;

use crate::error::CliError;

/// Connect to the container runtime using the configured socket.
pub fn connect_docker(config: &DockerConfig) -> Result<Arc<BollardDockerClient>, CliError> {
    let client = match &config.socket_path {
        Some(socket) => BollardDockerClient::connect_with_socket(socket)?,
        None => BollardDockerClient::connect_local()?,
    };
    Ok(Arc::new(client))
}
