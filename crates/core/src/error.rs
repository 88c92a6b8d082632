//! 에러 타입 — 도메인별 에러 정의

/// pkgtally 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PkgtallyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 컨테이너 런타임 에러
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// 인벤토리 스캔 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 컨테이너 런타임 에러
///
/// `FileNotFound`는 복구 가능한 조건입니다 — 컨테이너마다 설치된
/// 패키지 매니저가 다르므로 파일이 없는 것은 정상 동작입니다.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Docker 소켓 연결 실패
    #[error("docker connection error: {0}")]
    Connection(String),

    /// Docker API 호출 실패
    #[error("docker api error: {0}")]
    Api(String),

    /// 컨테이너 안에 파일이 없음 (복구 가능)
    #[error("file not found in container {container_id}: {path}")]
    FileNotFound { container_id: String, path: String },

    /// 아카이브 스트림 해석 실패
    #[error("archive error: {0}")]
    Archive(String),

    /// 아카이브 요청 시간 초과
    #[error("archive request timed out after {secs}s: container {container_id}: {path}")]
    Timeout {
        container_id: String,
        path: String,
        secs: u64,
    },
}

/// 인벤토리 스캔 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 패키지 DB 파싱 실패
    #[error("parse failed: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    /// 로케이터가 확인한 파일을 읽지 못함
    #[error("read failed: {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    /// 스크래치 파일 생성/쓰기 실패 — 스캔 전체에 치명적
    #[error("scratch file error: {path}: {reason}")]
    Scratch { path: String, reason: String },
}
