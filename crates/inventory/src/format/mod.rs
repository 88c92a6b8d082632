//! 패키지 DB 파서 — apk installed-db, dpkg status 파일
//!
//! [`PackageDb`] trait은 각 패키지 매니저의 DB 포맷이 구현해야 하는
//! 인터페이스입니다. 포맷은 닫힌 집합이며, 새 포맷 지원은 파서 구현을
//! 추가하고 [`default_formats`]에 등록하는 방식으로 확장합니다.
//!
//! # 지원 포맷
//!
//! - Alpine apk installed-db (`/lib/apk/db/installed`) — [`ApkDb`]
//! - Debian dpkg status (`/var/lib/dpkg/status`) — [`DpkgDb`]
//!
//! # 호출 계약
//!
//! `parse`는 항상 `files_needed()`가 선언한 경로들(또는 그 스크래치
//! 사본)을 선언 순서 그대로 받습니다. 스캐너가 로케이터로 존재를 확인한
//! 뒤에만 호출하므로, 이 시점의 읽기 실패는 [`InventoryError::ReadFailed`]
//! 입니다.

pub mod apk;
pub mod dpkg;

use std::path::PathBuf;

use pkgtally_core::types::{Manager, PackageRecord};

use crate::error::InventoryError;

pub use apk::ApkDb;
pub use dpkg::DpkgDb;

/// 패키지 DB 파서 trait
///
/// 포맷 하나당 정확히 세 연산을 노출합니다: 매니저 식별자, 필요한 파일
/// 목록, 파싱.
pub trait PackageDb: std::fmt::Debug + Send + Sync {
    /// 이 파서가 담당하는 패키지 매니저를 반환합니다.
    fn manager(&self) -> Manager;

    /// 이 포맷이 필요로 하는 파일들의 절대 경로를 선언 순서로 반환합니다.
    ///
    /// 물질화와 파싱 모두 이 순서를 따릅니다.
    fn files_needed(&self) -> &'static [&'static str];

    /// 주어진 로컬 파일들을 파싱하여 패키지 레코드를 반환합니다.
    ///
    /// `files`는 `files_needed()`와 같은 순서의 실제 로컬 경로입니다
    /// (원본 또는 스크래치 사본).
    fn parse(&self, files: &[PathBuf]) -> Result<Vec<PackageRecord>, InventoryError>;
}

/// 기본 포맷 목록을 반환합니다.
///
/// 스캐너 빌더가 별도 지정이 없으면 이 목록을 사용합니다.
pub fn default_formats() -> Vec<Box<dyn PackageDb>> {
    vec![Box::new(ApkDb), Box::new(DpkgDb)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formats_cover_apk_and_deb() {
        let formats = default_formats();
        let managers: Vec<Manager> = formats.iter().map(|f| f.manager()).collect();
        assert_eq!(managers, vec![Manager::Apk, Manager::Deb]);
    }

    #[test]
    fn files_needed_paths_are_absolute() {
        for format in default_formats() {
            for path in format.files_needed() {
                assert!(path.starts_with('/'), "{path} must be absolute");
            }
        }
    }
}
