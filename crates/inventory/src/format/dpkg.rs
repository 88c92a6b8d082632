//! Debian dpkg status 파일 파서
//!
//! `/var/lib/dpkg/status`는 `Key: value` 라인의 연속이며 레코드는 빈
//! 줄로 구분됩니다. 관심 필드는 `Package:`, `Version:`, `Status:`
//! 세 가지입니다.
//!
//! apk 파서와 달리 레코드는 `Status` 값이 정확히
//! `install ok installed`일 때에만 방출됩니다. status 파일에는
//! 삭제되었거나 설치가 끝나지 않은 패키지도 나열되므로 이 게이트가
//! 필요합니다. 방출 여부와 무관하게 경계마다 installed 플래그와
//! 누적값을 초기화하여, Status 라인이 없는 다음 레코드가 잘못
//! 방출되는 일을 막습니다.

use std::path::PathBuf;

use pkgtally_core::types::{Manager, PackageRecord};

use crate::error::InventoryError;
use crate::format::PackageDb;

/// dpkg status 파일 경로
const STATUS_FILE: &str = "/var/lib/dpkg/status";

/// 설치 완료를 나타내는 유일한 status 값
const STATUS_INSTALLED: &str = "install ok installed";

/// Debian dpkg 포맷 파서
#[derive(Debug)]
pub struct DpkgDb;

impl PackageDb for DpkgDb {
    fn manager(&self) -> Manager {
        Manager::Deb
    }

    fn files_needed(&self) -> &'static [&'static str] {
        &[STATUS_FILE]
    }

    fn parse(&self, files: &[PathBuf]) -> Result<Vec<PackageRecord>, InventoryError> {
        let Some(path) = files.first() else {
            return Err(InventoryError::ReadFailed {
                path: STATUS_FILE.to_owned(),
                reason: "no input file supplied".to_owned(),
            });
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| InventoryError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(parse_status_file(&content))
    }
}

/// status 파일 내용을 파싱합니다.
///
/// `Status: install ok installed`인 레코드만 방출합니다.
pub fn parse_status_file(content: &str) -> Vec<PackageRecord> {
    let mut packages = Vec::new();
    let mut name = String::new();
    let mut version = String::new();
    let mut installed = false;

    for line in content.lines() {
        if line.is_empty() {
            emit(&mut packages, &mut name, &mut version, &mut installed);
        } else if let Some(rest) = line.strip_prefix("Package: ") {
            name = rest.to_owned();
        } else if let Some(rest) = line.strip_prefix("Version: ") {
            version = rest.to_owned();
        } else if let Some(rest) = line.strip_prefix("Status: ") {
            installed = rest == STATUS_INSTALLED;
        }
    }

    emit(&mut packages, &mut name, &mut version, &mut installed);

    packages
}

fn emit(
    packages: &mut Vec<PackageRecord>,
    name: &mut String,
    version: &mut String,
    installed: &mut bool,
) {
    if *installed {
        packages.push(PackageRecord::new(
            std::mem::take(name),
            std::mem::take(version),
            Manager::Deb,
        ));
    } else {
        name.clear();
        version.clear();
    }
    *installed = false;
}
