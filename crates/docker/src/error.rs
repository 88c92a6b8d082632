//! Docker 경계 에러 타입
//!
//! [`DockerError`]는 컨테이너 런타임과의 상호작용에서 발생하는 모든
//! 에러를 표현합니다. `From<DockerError> for PkgtallyError` 변환이
//! 구현되어 있어 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수
//! 있습니다.
//!
//! `FileNotFound`와 `Timeout`은 복구 가능한 조건입니다 — 스캐너는 해당
//! (대상, 포맷) 쌍만 건너뛰고 나머지 스캔을 계속합니다.

use pkgtally_core::error::{ContainerError, PkgtallyError};

/// Docker 경계 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    /// Docker 소켓 연결 실패
    #[error("docker connection error: {0}")]
    Connection(String),

    /// Docker API 호출 실패
    #[error("docker api error: {0}")]
    Api(String),

    /// 컨테이너 안에 요청한 경로가 없음 (복구 가능)
    #[error("file not found in container {container_id}: {path}")]
    FileNotFound {
        /// 대상 컨테이너 ID
        container_id: String,
        /// 컨테이너 내부 경로
        path: String,
    },

    /// 아카이브 스트림에 유효한 엔트리가 없거나 해석 실패
    #[error("archive error: {0}")]
    Archive(String),

    /// 아카이브 요청 시간 초과 (복구 가능)
    #[error("archive request timed out after {secs}s: container {container_id}: {path}")]
    Timeout {
        /// 대상 컨테이너 ID
        container_id: String,
        /// 컨테이너 내부 경로
        path: String,
        /// 적용된 타임아웃 (초)
        secs: u64,
    },
}

impl DockerError {
    /// 스캔 계속이 가능한 에러인지 여부
    ///
    /// 파일 부재와 타임아웃은 해당 (대상, 포맷) 쌍에만 영향을 주며
    /// 다른 포맷/컨테이너 스캔을 중단시키지 않습니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DockerError::FileNotFound { .. } | DockerError::Timeout { .. }
        )
    }
}

impl From<DockerError> for PkgtallyError {
    fn from(err: DockerError) -> Self {
        match err {
            DockerError::Connection(msg) => {
                PkgtallyError::Container(ContainerError::Connection(msg))
            }
            DockerError::Api(msg) => PkgtallyError::Container(ContainerError::Api(msg)),
            DockerError::FileNotFound { container_id, path } => {
                PkgtallyError::Container(ContainerError::FileNotFound { container_id, path })
            }
            DockerError::Archive(msg) => PkgtallyError::Container(ContainerError::Archive(msg)),
            DockerError::Timeout {
                container_id,
                path,
                secs,
            } => PkgtallyError::Container(ContainerError::Timeout {
                container_id,
                path,
                secs,
            }),
        }
    }
}
