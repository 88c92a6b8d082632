//! 컨테이너 파일 추출기
//!
//! [`ContainerExtractor`]는 컨테이너 ID와 내부 경로 하나를 받아 해당
//! 파일의 원본 바이트를 돌려줍니다. 런타임에 단일 경로의 아카이브
//! 스트림을 요청하고 첫 번째 엔트리만 풀어냅니다.
//!
//! 원본 구현에는 타임아웃이 없어 런타임이 멈추면 스캔 전체가 영원히
//! 대기했습니다. 여기서는 모든 아카이브 요청을
//! `tokio::time::timeout`으로 감싸며, 초과 시 복구 가능한
//! [`DockerError::Timeout`]으로 보고합니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use pkgtally_core::types::FileStat;

use crate::archive;
use crate::client::DockerClient;
use crate::error::DockerError;

/// 단일 파일 추출기
///
/// 클라이언트를 `Arc`로 공유하므로 복제 비용이 낮고, 여러 대상 스캔에
/// 같은 인스턴스를 재사용할 수 있습니다.
pub struct ContainerExtractor<D> {
    client: Arc<D>,
    timeout: Duration,
}

impl<D> Clone for ContainerExtractor<D> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            timeout: self.timeout,
        }
    }
}

impl<D: DockerClient> ContainerExtractor<D> {
    /// 새 추출기를 생성합니다.
    ///
    /// `timeout`은 아카이브 요청 한 건에 적용됩니다.
    pub fn new(client: Arc<D>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// 컨테이너 내부 파일 하나의 원본 바이트를 추출합니다.
    ///
    /// # Errors
    ///
    /// - [`DockerError::FileNotFound`]: 경로가 컨테이너에 없음 (복구 가능)
    /// - [`DockerError::Timeout`]: 아카이브 요청 시간 초과 (복구 가능)
    /// - [`DockerError::Archive`]: 응답 스트림 해석 실패
    pub async fn extract(
        &self,
        container_id: &str,
        path: &str,
    ) -> Result<Vec<u8>, DockerError> {
        let archive_bytes = self.fetch_with_timeout(container_id, path).await?;
        let contents = archive::first_entry_bytes(&archive_bytes)?;
        debug!(
            container_id,
            path,
            bytes = contents.len(),
            "extracted file from container"
        );
        Ok(contents)
    }

    /// 컨테이너 내부 경로의 존재 여부와 종류를 확인합니다.
    ///
    /// 아카이브 스트림의 첫 엔트리 헤더만 해석합니다. 경로 부재는
    /// 에러가 아니라 [`FileStat::ABSENT`]로 보고됩니다.
    ///
    /// # Errors
    ///
    /// 부재 이외의 런타임/아카이브 에러는 그대로 전파됩니다.
    pub async fn stat(&self, container_id: &str, path: &str) -> Result<FileStat, DockerError> {
        match self.fetch_with_timeout(container_id, path).await {
            Ok(archive_bytes) => archive::first_entry_stat(&archive_bytes),
            Err(DockerError::FileNotFound { .. }) => Ok(FileStat::ABSENT),
            Err(e) => Err(e),
        }
    }

    async fn fetch_with_timeout(
        &self,
        container_id: &str,
        path: &str,
    ) -> Result<Vec<u8>, DockerError> {
        tokio::time::timeout(self.timeout, self.client.fetch_archive(container_id, path))
            .await
            .map_err(|_| DockerError::Timeout {
                container_id: container_id.to_owned(),
                path: path.to_owned(),
                secs: self.timeout.as_secs(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;

    use pkgtally_core::types::ContainerInfo;

    /// 경로별 응답을 설정할 수 있는 mock 클라이언트
    ///
    /// `fetch_archive`는 등록된 파일/디렉토리를 실제 tar 바이트로
    /// 감싸 반환하므로 아카이브 해석 경로까지 함께 검증됩니다.
    #[derive(Default)]
    struct MockDockerClient {
        /// (container_id, path) -> 파일 내용; None이면 디렉토리
        entries: HashMap<(String, String), Option<Vec<u8>>>,
        /// 응답 지연 (타임아웃 테스트용)
        delay: Option<Duration>,
    }

    impl MockDockerClient {
        fn with_file(mut self, container: &str, path: &str, contents: &[u8]) -> Self {
            self.entries.insert(
                (container.to_owned(), path.to_owned()),
                Some(contents.to_vec()),
            );
            self
        }

        fn with_dir(mut self, container: &str, path: &str) -> Self {
            self.entries
                .insert((container.to_owned(), path.to_owned()), None);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn build_tar(name: &str, contents: Option<&[u8]>) -> Vec<u8> {
            let mut builder = tar::Builder::new(Vec::new());
            let mut header = tar::Header::new_gnu();
            match contents {
                Some(data) => {
                    header.set_size(data.len() as u64);
                    header.set_mode(0o644);
                    header.set_cksum();
                    builder.append_data(&mut header, name, data).unwrap();
                }
                None => {
                    header.set_entry_type(tar::EntryType::Directory);
                    header.set_size(0);
                    header.set_mode(0o755);
                    header.set_cksum();
                    builder
                        .append_data(&mut header, name, std::io::empty())
                        .unwrap();
                }
            }
            builder.into_inner().unwrap()
        }
    }

    impl DockerClient for MockDockerClient {
        fn list_containers(
            &self,
        ) -> impl Future<Output = Result<Vec<ContainerInfo>, DockerError>> + Send {
            async { Ok(Vec::new()) }
        }

        async fn fetch_archive(
            &self,
            container_id: &str,
            path: &str,
        ) -> Result<Vec<u8>, DockerError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self
                .entries
                .get(&(container_id.to_owned(), path.to_owned()))
            {
                Some(contents) => {
                    let name = path.trim_start_matches('/').to_owned();
                    Ok(Self::build_tar(&name, contents.as_deref()))
                }
                None => Err(DockerError::FileNotFound {
                    container_id: container_id.to_owned(),
                    path: path.to_owned(),
                }),
            }
        }

        async fn ping(&self) -> Result<(), DockerError> {
            Ok(())
        }
    }

    fn extractor(client: MockDockerClient) -> ContainerExtractor<MockDockerClient> {
        ContainerExtractor::new(Arc::new(client), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn extract_returns_byte_identical_content() {
        let payload = b"P:curl\nV:7.68.0\n\n";
        let client =
            MockDockerClient::default().with_file("abc123", "/lib/apk/db/installed", payload);
        let contents = extractor(client)
            .extract("abc123", "/lib/apk/db/installed")
            .await
            .unwrap();
        assert_eq!(contents, payload);
    }

    #[tokio::test]
    async fn extract_missing_path_is_recoverable_not_found() {
        let client = MockDockerClient::default();
        let err = extractor(client)
            .extract("abc123", "/var/lib/dpkg/status")
            .await
            .unwrap_err();
        assert!(matches!(err, DockerError::FileNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn stat_reports_file_dir_and_absent() {
        let client = MockDockerClient::default()
            .with_file("abc123", "/var/lib/dpkg/status", b"x")
            .with_dir("abc123", "/var/lib/dpkg");
        let extractor = extractor(client);

        assert_eq!(
            extractor.stat("abc123", "/var/lib/dpkg/status").await.unwrap(),
            FileStat::FILE
        );
        assert_eq!(
            extractor.stat("abc123", "/var/lib/dpkg").await.unwrap(),
            FileStat::DIR
        );
        assert_eq!(
            extractor.stat("abc123", "/nope").await.unwrap(),
            FileStat::ABSENT
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_archive_request_times_out() {
        let client = MockDockerClient::default()
            .with_file("abc123", "/var/lib/dpkg/status", b"x")
            .with_delay(Duration::from_secs(120));
        let extractor = ContainerExtractor::new(Arc::new(client), Duration::from_secs(1));

        let err = extractor
            .extract("abc123", "/var/lib/dpkg/status")
            .await
            .unwrap_err();
        assert!(matches!(err, DockerError::Timeout { secs: 1, .. }));
        assert!(err.is_recoverable());
    }
}
