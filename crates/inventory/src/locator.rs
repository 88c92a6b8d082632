//! 파일 로케이터 — 포맷별 필수 파일의 존재 확인
//!
//! [`TargetFs`] trait은 스캔 대상의 파일시스템을 stat 한 번으로
//! 추상화합니다. 로컬 루트는 [`LocalFs`], 컨테이너는 [`ContainerFs`]가
//! 구현합니다.
//!
//! [`all_present`]는 포맷이 선언한 모든 경로가 일반 파일로 존재할 때만
//! true를 반환합니다. 첫 실패에서 단락 평가하지만, 어떤 경로도 "있다고
//! 가정"하지 않습니다 — 성공 판정은 항상 모든 경로의 확인을 거칩니다.

use std::future::Future;
use std::path::PathBuf;

use pkgtally_core::error::PkgtallyError;
use pkgtally_core::types::FileStat;
use pkgtally_docker::{ContainerExtractor, DockerClient};

/// 스캔 대상 파일시스템 접근자
pub trait TargetFs: Sync {
    /// 경로 하나의 존재 여부와 종류를 확인합니다.
    fn stat(&self, path: &str) -> impl Future<Output = Result<FileStat, PkgtallyError>> + Send;
}

/// 모든 경로가 일반(비 디렉토리) 파일로 존재하는지 확인합니다.
///
/// 하나라도 없거나 디렉토리면 false입니다. 첫 실패에서 즉시 반환합니다.
///
/// # Errors
///
/// stat 자체가 실패하면 (런타임 에러 등) 그대로 전파합니다. 경로 부재는
/// 에러가 아니라 `Ok(false)`입니다.
pub async fn all_present<F: TargetFs>(paths: &[&str], fs: &F) -> Result<bool, PkgtallyError> {
    for path in paths {
        if !fs.stat(path).await?.is_present_file() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 로컬 호스트 파일시스템 접근자
///
/// 경로를 `root` 아래로 해석합니다. 운영에서는 `root`가 `/`이고,
/// 테스트에서는 임시 디렉토리를 루트로 쓸 수 있습니다.
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// 주어진 루트 디렉토리에 대한 접근자를 생성합니다.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 절대 경로를 루트 아래의 실제 경로로 해석합니다.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl TargetFs for LocalFs {
    async fn stat(&self, path: &str) -> Result<FileStat, PkgtallyError> {
        match tokio::fs::metadata(self.resolve(path)).await {
            Ok(meta) => Ok(if meta.is_dir() {
                FileStat::DIR
            } else {
                FileStat::FILE
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileStat::ABSENT),
            Err(e) => Err(PkgtallyError::Io(e)),
        }
    }
}

/// 컨테이너 파일시스템 접근자
///
/// stat은 런타임의 아카이브 스트림에서 첫 엔트리 헤더만 읽습니다.
pub struct ContainerFs<'a, D> {
    extractor: &'a ContainerExtractor<D>,
    container_id: &'a str,
}

impl<'a, D: DockerClient> ContainerFs<'a, D> {
    /// 컨테이너 하나에 대한 접근자를 생성합니다.
    pub fn new(extractor: &'a ContainerExtractor<D>, container_id: &'a str) -> Self {
        Self {
            extractor,
            container_id,
        }
    }
}

impl<D: DockerClient> TargetFs for ContainerFs<'_, D> {
    async fn stat(&self, path: &str) -> Result<FileStat, PkgtallyError> {
        self.extractor
            .stat(self.container_id, path)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_stat_distinguishes_file_dir_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("var/lib/dpkg")).unwrap();
        std::fs::write(dir.path().join("var/lib/dpkg/status"), b"").unwrap();

        let fs = LocalFs::new(dir.path());
        assert_eq!(fs.stat("/var/lib/dpkg/status").await.unwrap(), FileStat::FILE);
        assert_eq!(fs.stat("/var/lib/dpkg").await.unwrap(), FileStat::DIR);
        assert_eq!(fs.stat("/lib/apk/db/installed").await.unwrap(), FileStat::ABSENT);
    }

    #[tokio::test]
    async fn all_present_requires_every_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a/one"), b"x").unwrap();
        std::fs::write(dir.path().join("a/two"), b"y").unwrap();

        let fs = LocalFs::new(dir.path());
        assert!(all_present(&["/a/one", "/a/two"], &fs).await.unwrap());
        assert!(!all_present(&["/a/one", "/a/missing"], &fs).await.unwrap());
    }

    #[tokio::test]
    async fn all_present_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib/apk/db/installed")).unwrap();

        let fs = LocalFs::new(dir.path());
        // 경로가 존재하더라도 디렉토리면 present가 아니다
        assert!(!all_present(&["/lib/apk/db/installed"], &fs).await.unwrap());
    }

    #[tokio::test]
    async fn all_present_with_no_paths_is_true() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFs::new(dir.path());
        assert!(all_present(&[], &fs).await.unwrap());
    }

    #[test]
    fn resolve_strips_leading_slash() {
        let fs = LocalFs::new("/tmp/root");
        assert_eq!(
            fs.resolve("/lib/apk/db/installed"),
            PathBuf::from("/tmp/root/lib/apk/db/installed")
        );
    }
}
