//! 인벤토리 스캐너 오케스트레이터 — 포맷 × 대상 교차 스캔
//!
//! [`InventoryScanner`]는 설정된 포맷과 스캔 대상의 교차곱을 순회하며
//! 패키지 레코드를 수집합니다. 대상 목록은 로컬 루트(설정 시)와
//! 런타임이 보고한 실행 중 컨테이너들입니다.
//!
//! # (대상, 포맷) 쌍당 상태 흐름
//!
//! ```text
//! 존재 확인 --- 누락/디렉토리 ---> 건너뜀 (에러 아님)
//!     |
//! 물질화 (컨테이너: 선언 순서대로 스크래치 추출; 로컬: 제자리 읽기)
//!     |                 \-- 추출 실패 --> 포맷 포기 (복구 가능)
//! 파싱 --> 레코드를 대상 결과에 추가
//!     |
//! 스크래치 정리 (어느 종단 상태든 무조건)
//! ```
//!
//! 스크래치 파일은 `NamedTempFile`이 소유하므로 파싱 성공/실패와
//! 무관하게 쌍 하나의 처리가 끝나면 제거됩니다. 치명적 에러는 스크래치
//! 생성/쓰기 실패뿐이며, 그 외의 실패는 해당 쌍의 결과만 버립니다.
//!
//! 스캔은 한 번에 한 쌍씩 순차 실행됩니다. 대상 간 공유 상태가 없어
//! 병렬화가 가능하지만, 순차 실행이 안전한 기본값입니다.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use pkgtally_core::config::PkgtallyConfig;
use pkgtally_core::error::{ConfigError, PkgtallyError, ScanError};
use pkgtally_core::report::Report;
use pkgtally_core::types::{PackageRecord, ScanTarget};
use pkgtally_docker::{ContainerExtractor, DockerClient};

use crate::format::{PackageDb, default_formats};
use crate::locator::{ContainerFs, LocalFs, all_present};

/// 인벤토리 스캐너
///
/// [`InventoryScannerBuilder`]로 생성합니다. 설정은 생성 시점에
/// 고정되며, 전역 가변 상태 없이 인스턴스 단위로 동작합니다.
pub struct InventoryScanner<D> {
    formats: Vec<Box<dyn PackageDb>>,
    docker: Option<Arc<D>>,
    extractor: Option<ContainerExtractor<D>>,
    include_host: bool,
    include_containers: bool,
    scratch_dir: Option<PathBuf>,
    host_root: PathBuf,
    hostname: String,
}

impl<D: DockerClient> InventoryScanner<D> {
    /// 전체 스캔을 수행하고 리포트를 반환합니다.
    ///
    /// 대상 하나의 실패는 다른 대상의 스캔에 영향을 주지 않습니다.
    /// 컨테이너 목록 조회 실패는 경고 후 호스트만 스캔합니다.
    ///
    /// # Errors
    ///
    /// 스크래치 파일 생성/쓰기 실패만이 스캔 전체를 중단시킵니다.
    pub async fn scan(&self) -> Result<Report, PkgtallyError> {
        let mut report = Report::new(&self.hostname);

        let mut targets = Vec::new();
        if self.include_host {
            targets.push(ScanTarget::LocalRoot);
        }
        if self.include_containers
            && let Some(docker) = &self.docker
        {
            match docker.list_containers().await {
                Ok(containers) => {
                    info!(count = containers.len(), "discovered running containers");
                    targets.extend(containers.into_iter().map(|c| ScanTarget::Container {
                        id: c.id,
                        image: c.image,
                    }));
                }
                Err(e) => {
                    warn!(error = %e, "failed to list containers, scanning host only");
                }
            }
        }

        for target in targets {
            let packages = self.scan_target(&target).await?;
            info!(target = %target, packages = packages.len(), "target scan completed");
            report.add_target(target, packages);
        }

        Ok(report)
    }

    /// 대상 하나를 모든 포맷으로 스캔합니다.
    ///
    /// 포맷 하나의 실패는 같은 대상의 다른 포맷 스캔을 중단시키지
    /// 않습니다.
    pub async fn scan_target(
        &self,
        target: &ScanTarget,
    ) -> Result<Vec<PackageRecord>, PkgtallyError> {
        let mut packages = Vec::new();

        for format in &self.formats {
            match self.scan_format(target, format.as_ref()).await {
                Ok(Some(mut records)) => {
                    debug!(
                        target = %target,
                        manager = %format.manager(),
                        records = records.len(),
                        "format parsed"
                    );
                    packages.append(&mut records);
                }
                Ok(None) => {
                    debug!(
                        target = %target,
                        manager = %format.manager(),
                        "format not applicable, skipping"
                    );
                }
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => {
                    warn!(
                        target = %target,
                        manager = %format.manager(),
                        error = %e,
                        "format scan failed, dropping its contribution"
                    );
                }
            }
        }

        Ok(packages)
    }

    /// (대상, 포맷) 쌍 하나를 처리합니다.
    ///
    /// `Ok(None)`은 건너뜀(미적용 또는 복구 가능한 추출 실패),
    /// `Ok(Some)`은 파싱 완료입니다.
    async fn scan_format(
        &self,
        target: &ScanTarget,
        format: &dyn PackageDb,
    ) -> Result<Option<Vec<PackageRecord>>, PkgtallyError> {
        let needed = format.files_needed();

        match target {
            ScanTarget::LocalRoot => {
                let fs = LocalFs::new(&self.host_root);
                if !all_present(needed, &fs).await? {
                    return Ok(None);
                }

                // 로컬 대상은 스크래치 없이 제자리에서 읽는다
                let paths: Vec<PathBuf> = needed.iter().map(|p| fs.resolve(p)).collect();
                let records = format.parse(&paths).map_err(PkgtallyError::from)?;
                Ok(Some(records))
            }
            ScanTarget::Container { id, .. } => {
                let Some(extractor) = &self.extractor else {
                    return Ok(None);
                };

                let fs = ContainerFs::new(extractor, id);
                if !all_present(needed, &fs).await? {
                    return Ok(None);
                }

                // 선언 순서대로 각 파일을 스크래치에 물질화.
                // NamedTempFile이 소유하므로 모든 반환 경로에서 제거된다.
                let mut scratches: Vec<NamedTempFile> = Vec::with_capacity(needed.len());
                let mut paths: Vec<PathBuf> = Vec::with_capacity(needed.len());
                for path in needed {
                    let bytes = match extractor.extract(id, path).await {
                        Ok(b) => b,
                        Err(e) if e.is_recoverable() => {
                            debug!(
                                container_id = %id,
                                path = %path,
                                error = %e,
                                "extraction failed, abandoning format for this target"
                            );
                            return Ok(None);
                        }
                        Err(e) => return Err(e.into()),
                    };

                    let scratch = self.write_scratch(&bytes)?;
                    paths.push(scratch.path().to_path_buf());
                    scratches.push(scratch);
                }

                let records = format.parse(&paths).map_err(PkgtallyError::from)?;
                Ok(Some(records))
            }
        }
    }

    /// 추출된 바이트를 새 스크래치 파일에 기록합니다.
    ///
    /// 실패는 스캔 전체에 치명적입니다 — 로컬 디스크는 전제조건입니다.
    fn write_scratch(&self, bytes: &[u8]) -> Result<NamedTempFile, PkgtallyError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pkgtally-");

        let created = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };

        let mut scratch = created.map_err(|e| {
            PkgtallyError::Scan(ScanError::Scratch {
                path: self
                    .scratch_dir
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| std::env::temp_dir().display().to_string()),
                reason: e.to_string(),
            })
        })?;

        scratch
            .write_all(bytes)
            .and_then(|()| scratch.flush())
            .map_err(|e| {
                PkgtallyError::Scan(ScanError::Scratch {
                    path: scratch.path().display().to_string(),
                    reason: e.to_string(),
                })
            })?;

        Ok(scratch)
    }
}

fn is_fatal(err: &PkgtallyError) -> bool {
    matches!(err, PkgtallyError::Scan(ScanError::Scratch { .. }))
}

/// 인벤토리 스캐너 빌더
pub struct InventoryScannerBuilder<D> {
    formats: Vec<Box<dyn PackageDb>>,
    docker: Option<Arc<D>>,
    extract_timeout: Duration,
    include_host: bool,
    include_containers: bool,
    scratch_dir: Option<PathBuf>,
    host_root: PathBuf,
    hostname: Option<String>,
}

impl<D: DockerClient> InventoryScannerBuilder<D> {
    /// 기본 설정으로 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            formats: default_formats(),
            docker: None,
            extract_timeout: Duration::from_secs(30),
            include_host: true,
            include_containers: true,
            scratch_dir: None,
            host_root: PathBuf::from("/"),
            hostname: None,
        }
    }

    /// [`PkgtallyConfig`]의 관련 섹션을 빌더에 적용합니다.
    pub fn with_config(mut self, config: &PkgtallyConfig) -> Self {
        self.include_host = config.scan.include_host;
        self.include_containers = config.scan.include_containers && config.docker.enabled;
        self.extract_timeout = Duration::from_secs(config.docker.extract_timeout_secs);
        self.scratch_dir = config.scan.scratch_dir.as_ref().map(PathBuf::from);
        self
    }

    /// 스캔에 사용할 포맷 목록을 지정합니다.
    pub fn formats(mut self, formats: Vec<Box<dyn PackageDb>>) -> Self {
        self.formats = formats;
        self
    }

    /// 컨테이너 런타임 클라이언트를 지정합니다.
    ///
    /// 컨테이너 스캔이 활성화된 경우 필수입니다.
    pub fn docker_client(mut self, client: Arc<D>) -> Self {
        self.docker = Some(client);
        self
    }

    /// 아카이브 추출 타임아웃을 지정합니다.
    pub fn extract_timeout(mut self, timeout: Duration) -> Self {
        self.extract_timeout = timeout;
        self
    }

    /// 로컬 호스트 스캔 여부를 지정합니다.
    pub fn include_host(mut self, include: bool) -> Self {
        self.include_host = include;
        self
    }

    /// 컨테이너 스캔 여부를 지정합니다.
    pub fn include_containers(mut self, include: bool) -> Self {
        self.include_containers = include;
        self
    }

    /// 스크래치 파일 디렉토리를 지정합니다 (기본: 시스템 임시 디렉토리).
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// 로컬 스캔의 루트 디렉토리를 지정합니다 (기본: `/`).
    pub fn host_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.host_root = root.into();
        self
    }

    /// 리포트에 기록할 호스트명을 지정합니다.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Errors
    ///
    /// - 포맷 목록이 비어 있으면 실패
    /// - 컨테이너 스캔이 활성화되었는데 클라이언트가 없으면 실패
    /// - 타임아웃이 0이면 실패
    pub fn build(self) -> Result<InventoryScanner<D>, PkgtallyError> {
        if self.formats.is_empty() {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "formats".to_owned(),
                reason: "at least one format is required".to_owned(),
            }));
        }

        if self.include_containers && self.docker.is_none() {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "scan.include_containers".to_owned(),
                reason: "container scanning requires a docker client".to_owned(),
            }));
        }

        if self.extract_timeout.is_zero() {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "docker.extract_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }));
        }

        let extractor = self
            .docker
            .as_ref()
            .map(|client| ContainerExtractor::new(Arc::clone(client), self.extract_timeout));

        let hostname = self.hostname.unwrap_or_else(|| {
            std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_owned())
        });

        Ok(InventoryScanner {
            formats: self.formats,
            docker: self.docker,
            extractor,
            include_host: self.include_host,
            include_containers: self.include_containers,
            scratch_dir: self.scratch_dir,
            host_root: self.host_root,
            hostname,
        })
    }
}

impl<D: DockerClient> Default for InventoryScannerBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
