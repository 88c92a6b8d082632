//! Docker API abstraction for testability.
//!
//! The [`DockerClient`] trait abstracts the bollard Docker API, allowing
//! production code to use [`BollardDockerClient`] while tests use mock
//! implementations.
//!
//! Only the two operations the inventory core consumes are exposed:
//! listing running containers and fetching the archive stream for a single
//! in-container path. Everything else the runtime offers is deliberately
//! out of reach.
//!
//! # Container ID Validation
//!
//! All methods that accept container IDs perform validation to prevent
//! injection attacks:
//! - Must be 1-64 characters
//! - Must contain only ASCII hex digits ([0-9a-fA-F])
//! - Empty IDs and IDs with special characters are rejected
//!
//! # Error Handling
//!
//! - **404 on the archive endpoint**: converted to
//!   `DockerError::FileNotFound` — an expected, recoverable condition
//!   (different containers run different package managers or none at all)
//! - **Connection errors**: wrapped as `DockerError::Connection`
//! - **Other API failures**: wrapped as `DockerError::Api`

use std::future::Future;
use std::sync::Arc;
use std::time::SystemTime;

use futures::StreamExt;
use pkgtally_core::types::ContainerInfo;

use crate::error::DockerError;

/// Validates a container ID to prevent injection attacks.
///
/// Docker container IDs are 64-character hex strings (or shorter prefix
/// forms). This function ensures the ID contains only hex characters and is
/// within valid length.
fn validate_container_id(id: &str) -> Result<(), DockerError> {
    if id.is_empty() || id.len() > 64 {
        return Err(DockerError::Api(format!(
            "invalid container ID: length {} (must be 1-64)",
            id.len()
        )));
    }
    if !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DockerError::Api(
            "invalid container ID: contains non-hex characters".to_owned(),
        ));
    }
    Ok(())
}

/// Trait abstracting the container runtime operations the scanner needs.
///
/// All runtime calls go through this trait, enabling testability via
/// mocking. The trait is `Send + Sync + 'static`, allowing safe sharing
/// across async contexts.
///
/// # Implementations
///
/// - [`BollardDockerClient`]: production implementation using the `bollard`
///   library
/// - Mock implementations with configurable responses live in the test
///   modules of this crate and of `pkgtally-inventory`
pub trait DockerClient: Send + Sync + 'static {
    /// Lists running containers.
    ///
    /// Returns only running containers (stopped/exited containers are
    /// filtered). Each `ContainerInfo` includes ID, name, image, status, and
    /// creation time.
    ///
    /// # Errors
    ///
    /// Returns `DockerError::Api` if the Docker API call fails.
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerInfo>, DockerError>> + Send;

    /// Fetches the raw archive stream for a single in-container path.
    ///
    /// The runtime responds with a tar stream whose first meaningful entry
    /// is the requested path; callers unpack it with
    /// [`first_entry_bytes`](crate::archive::first_entry_bytes).
    ///
    /// # Errors
    ///
    /// - `DockerError::FileNotFound`: the path does not exist in the
    ///   container (recoverable)
    /// - `DockerError::Api`: invalid ID or other API errors
    fn fetch_archive(
        &self,
        container_id: &str,
        path: &str,
    ) -> impl Future<Output = Result<Vec<u8>, DockerError>> + Send;

    /// Checks Docker daemon connectivity.
    ///
    /// # Errors
    ///
    /// Returns `DockerError::Connection` if the daemon is unreachable.
    fn ping(&self) -> impl Future<Output = Result<(), DockerError>> + Send;
}

/// Production Docker client implementation using `bollard`.
///
/// Communicates with the Docker daemon via a Unix socket or TCP connection.
/// Internally uses `Arc<bollard::Docker>` for safe sharing across async
/// tasks.
pub struct BollardDockerClient {
    docker: Arc<bollard::Docker>,
}

impl BollardDockerClient {
    /// Connects to Docker using the default local socket.
    ///
    /// Automatically detects the socket path based on the platform.
    ///
    /// # Errors
    ///
    /// Returns `DockerError::Connection` if the connection fails
    /// (e.g., socket not found, permission denied, daemon not running).
    pub fn connect_local() -> Result<Self, DockerError> {
        let docker = bollard::Docker::connect_with_local_defaults().map_err(|e| {
            DockerError::Connection(format!("failed to connect to docker: {e}"))
        })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }

    /// Connects to Docker using a specific socket path.
    ///
    /// # Errors
    ///
    /// Returns `DockerError::Connection` if the connection fails.
    pub fn connect_with_socket(socket_path: &str) -> Result<Self, DockerError> {
        let docker =
            bollard::Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| {
                    DockerError::Connection(format!(
                        "failed to connect to docker at {socket_path}: {e}"
                    ))
                })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }
}

impl DockerClient for BollardDockerClient {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, DockerError> {
        use bollard::container::ListContainersOptions;

        let options = ListContainersOptions::<String> {
            all: false, // only running containers have a filesystem worth scanning
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| DockerError::Api(format!("list containers failed: {e}")))?;

        let mut result = Vec::with_capacity(containers.len());
        for container in containers {
            let id = container.id.unwrap_or_default();
            let names = container.names.unwrap_or_default();
            let name = names
                .first()
                .map(|n| n.trim_start_matches('/').to_owned())
                .unwrap_or_default();
            let image = container.image.unwrap_or_default();
            let status = container.state.unwrap_or_default();
            let created = container.created.unwrap_or_default();
            let created_at = SystemTime::UNIX_EPOCH
                + std::time::Duration::from_secs(u64::try_from(created).unwrap_or(0));

            result.push(ContainerInfo {
                id,
                name,
                image,
                status,
                created_at,
            });
        }

        Ok(result)
    }

    async fn fetch_archive(
        &self,
        container_id: &str,
        path: &str,
    ) -> Result<Vec<u8>, DockerError> {
        validate_container_id(container_id)?;

        use bollard::container::DownloadFromContainerOptions;

        let options = DownloadFromContainerOptions {
            path: path.to_owned(),
        };

        let mut stream = self
            .docker
            .download_from_container(container_id, Some(options));

        let mut archive = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.to_string().contains("404") {
                    DockerError::FileNotFound {
                        container_id: container_id.to_owned(),
                        path: path.to_owned(),
                    }
                } else {
                    DockerError::Api(format!("archive download failed: {e}"))
                }
            })?;
            archive.extend_from_slice(&chunk);
        }

        Ok(archive)
    }

    async fn ping(&self) -> Result<(), DockerError> {
        self.docker
            .ping()
            .await
            .map_err(|e| DockerError::Connection(format!("ping failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_full_hex_id() {
        assert!(validate_container_id(&"a".repeat(64)).is_ok());
        assert!(validate_container_id("abc123DEF456").is_ok());
    }

    #[test]
    fn validate_rejects_empty_id() {
        assert!(validate_container_id("").is_err());
    }

    #[test]
    fn validate_rejects_overlong_id() {
        assert!(validate_container_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn validate_rejects_non_hex_characters() {
        assert!(validate_container_id("abc;rm -rf /").is_err());
        assert!(validate_container_id("web-server").is_err());
    }

    #[test]
    fn docker_client_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<BollardDockerClient>();
    }
}
