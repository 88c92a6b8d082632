//! 설정 관리 — pkgtally.toml 파싱 및 런타임 설정
//!
//! [`PkgtallyConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`PKGTALLY_DOCKER_SOCKET_PATH=/run/docker.sock` 형식)
//! 3. 설정 파일 (`pkgtally.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), pkgtally_core::error::PkgtallyError> {
//! use pkgtally_core::config::PkgtallyConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = PkgtallyConfig::load("pkgtally.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = PkgtallyConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, PkgtallyError};

/// pkgtally 통합 설정
///
/// `pkgtally.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PkgtallyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 컨테이너 런타임 설정
    #[serde(default)]
    pub docker: DockerConfig,
    /// 인벤토리 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace/debug/info/warn/error)
    pub log_level: String,
    /// 로그 출력 형식 ("json" 또는 "pretty")
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 컨테이너 런타임 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// 컨테이너 스캔 활성화 여부
    pub enabled: bool,
    /// Docker 소켓 경로 (None이면 플랫폼 기본값)
    pub socket_path: Option<String>,
    /// 아카이브 추출 요청 타임아웃 (초)
    pub extract_timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            socket_path: None,
            extract_timeout_secs: 30,
        }
    }
}

/// 인벤토리 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 로컬 호스트를 스캔 대상에 포함할지 여부
    pub include_host: bool,
    /// 실행 중 컨테이너를 스캔 대상에 포함할지 여부
    pub include_containers: bool,
    /// 스크래치 파일 디렉토리 (None이면 시스템 임시 디렉토리)
    pub scratch_dir: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_host: true,
            include_containers: true,
            scratch_dir: None,
        }
    }
}

/// 타임아웃 상한값 (24시간)
const MAX_EXTRACT_TIMEOUT_SECS: u64 = 86_400;

impl PkgtallyConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PkgtallyError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PkgtallyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PkgtallyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PkgtallyError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, PkgtallyError> {
        toml::from_str(toml_str).map_err(|e| {
            PkgtallyError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PKGTALLY_{SECTION}_{FIELD}`
    /// 예: `PKGTALLY_DOCKER_SOCKET_PATH=/run/docker.sock`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "PKGTALLY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PKGTALLY_GENERAL_LOG_FORMAT");

        // Docker
        override_bool(&mut self.docker.enabled, "PKGTALLY_DOCKER_ENABLED");
        override_opt_string(&mut self.docker.socket_path, "PKGTALLY_DOCKER_SOCKET_PATH");
        override_u64(
            &mut self.docker.extract_timeout_secs,
            "PKGTALLY_DOCKER_EXTRACT_TIMEOUT_SECS",
        );

        // Scan
        override_bool(&mut self.scan.include_host, "PKGTALLY_SCAN_INCLUDE_HOST");
        override_bool(
            &mut self.scan.include_containers,
            "PKGTALLY_SCAN_INCLUDE_CONTAINERS",
        );
        override_opt_string(&mut self.scan.scratch_dir, "PKGTALLY_SCAN_SCRATCH_DIR");
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `general.log_format`: "json" 또는 "pretty"
    /// - `docker.extract_timeout_secs`: 1-86400
    /// - `docker.socket_path`: 지정 시 비어있으면 안 됨
    pub fn validate(&self) -> Result<(), PkgtallyError> {
        if self.general.log_format != "json" && self.general.log_format != "pretty" {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!(
                    "unknown format '{}', expected 'json' or 'pretty'",
                    self.general.log_format
                ),
            }));
        }

        if self.docker.extract_timeout_secs == 0
            || self.docker.extract_timeout_secs > MAX_EXTRACT_TIMEOUT_SECS
        {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "docker.extract_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_EXTRACT_TIMEOUT_SECS}"),
            }));
        }

        if let Some(socket) = &self.docker.socket_path
            && socket.is_empty()
        {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "docker.socket_path".to_owned(),
                reason: "must not be empty when set".to_owned(),
            }));
        }

        if let Some(dir) = &self.scan.scratch_dir
            && dir.is_empty()
        {
            return Err(PkgtallyError::Config(ConfigError::InvalidValue {
                field: "scan.scratch_dir".to_owned(),
                reason: "must not be empty when set".to_owned(),
            }));
        }

        Ok(())
    }
}

fn override_string(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_opt_string(target: &mut Option<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = Some(value);
    }
}

fn override_bool(target: &mut bool, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring non-boolean env override"),
        }
    }
}

fn override_u64(target: &mut u64, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring non-numeric env override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PkgtallyConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn parse_minimal_toml() {
        let config = PkgtallyConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.docker.enabled);
        assert_eq!(config.docker.extract_timeout_secs, 30);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"
log_format = "json"

[docker]
enabled = false
socket_path = "/run/user/1000/docker.sock"
extract_timeout_secs = 10

[scan]
include_host = false
include_containers = true
scratch_dir = "/var/tmp"
"#;
        let config = PkgtallyConfig::parse(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "json");
        assert!(!config.docker.enabled);
        assert_eq!(
            config.docker.socket_path.as_deref(),
            Some("/run/user/1000/docker.sock")
        );
        assert_eq!(config.docker.extract_timeout_secs, 10);
        assert!(!config.scan.include_host);
        assert_eq!(config.scan.scratch_dir.as_deref(), Some("/var/tmp"));
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        assert!(PkgtallyConfig::parse("[general\nbroken").is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let mut config = PkgtallyConfig::default();
        config.general.log_format = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = PkgtallyConfig::default();
        config.docker.extract_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_timeout() {
        let mut config = PkgtallyConfig::default();
        config.docker.extract_timeout_secs = 100_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_socket_path() {
        let mut config = PkgtallyConfig::default();
        config.docker.socket_path = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn from_file_reports_missing_file() {
        let result = PkgtallyConfig::from_file("/nonexistent/pkgtally.toml").await;
        assert!(matches!(
            result,
            Err(PkgtallyError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
