//! 인벤토리 스캔 에러 타입
//!
//! [`InventoryError`]는 파서와 스캐너에서 발생하는 에러를 표현합니다.
//! `Scratch`만이 스캔 전체를 중단시키는 치명적 조건이며, 나머지는 해당
//! (대상, 포맷) 쌍의 결과를 버리고 스캔을 계속합니다.

use pkgtally_core::error::{PkgtallyError, ScanError};

/// 인벤토리 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// 패키지 DB 내용 파싱 실패
    #[error("parse failed: {path}: {reason}")]
    ParseFailed {
        /// 입력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 로케이터가 확인한 파일을 읽지 못함
    #[error("read failed: {path}: {reason}")]
    ReadFailed {
        /// 입력 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 스크래치 파일 생성/쓰기 실패 — 스캔 전체에 치명적
    #[error("scratch file error: {path}: {reason}")]
    Scratch {
        /// 스크래치 경로 (또는 디렉토리)
        path: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<InventoryError> for PkgtallyError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ParseFailed { path, reason } => {
                PkgtallyError::Scan(ScanError::ParseFailed { path, reason })
            }
            InventoryError::ReadFailed { path, reason } => {
                PkgtallyError::Scan(ScanError::ReadFailed { path, reason })
            }
            InventoryError::Scratch { path, reason } => {
                PkgtallyError::Scan(ScanError::Scratch { path, reason })
            }
        }
    }
}
