//! Alpine apk installed-db 파서
//!
//! `/lib/apk/db/installed`는 레코드 지향 텍스트 파일입니다. 각 필드는
//! 한 글자 접두사 라인(`P:` 이름, `V:` 버전, 나머지는 무시)이고,
//! 레코드는 빈 줄로 구분됩니다. 입력의 끝도 레코드 경계로 취급하여
//! 마지막 레코드는 뒤따르는 빈 줄이 없어도 한 번 방출됩니다.
//!
//! 이름과 버전이 모두 비어 있는 경계(연속 빈 줄 등)는 아무것도
//! 방출하지 않으며, 방출 후에는 누적값을 초기화합니다. 따라서 이전
//! 레코드의 값이 다음 레코드로 새어 들어가지 않습니다.

use std::path::PathBuf;

use pkgtally_core::types::{Manager, PackageRecord};

use crate::error::InventoryError;
use crate::format::PackageDb;

/// Alpine installed-db 경로
const INSTALLED_DB: &str = "/lib/apk/db/installed";

/// Alpine apk 포맷 파서
#[derive(Debug)]
pub struct ApkDb;

impl PackageDb for ApkDb {
    fn manager(&self) -> Manager {
        Manager::Apk
    }

    fn files_needed(&self) -> &'static [&'static str] {
        &[INSTALLED_DB]
    }

    fn parse(&self, files: &[PathBuf]) -> Result<Vec<PackageRecord>, InventoryError> {
        let Some(path) = files.first() else {
            return Err(InventoryError::ReadFailed {
                path: INSTALLED_DB.to_owned(),
                reason: "no input file supplied".to_owned(),
            });
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| InventoryError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(parse_installed_db(&content))
    }
}

/// installed-db 내용을 파싱합니다.
///
/// 빈 줄 또는 입력 끝이 레코드 경계입니다. 경계마다 누적된 이름/버전으로
/// 레코드 하나를 방출하되, 둘 다 비어 있으면 방출을 생략합니다.
pub fn parse_installed_db(content: &str) -> Vec<PackageRecord> {
    let mut packages = Vec::new();
    let mut name = String::new();
    let mut version = String::new();

    for line in content.lines() {
        if line.is_empty() {
            emit(&mut packages, &mut name, &mut version);
        } else if let Some(rest) = line.strip_prefix("P:") {
            name = rest.to_owned();
        } else if let Some(rest) = line.strip_prefix("V:") {
            version = rest.to_owned();
        }
    }

    // 입력 끝도 경계: 마지막 부분 레코드를 방출
    emit(&mut packages, &mut name, &mut version);

    packages
}

fn emit(packages: &mut Vec<PackageRecord>, name: &mut String, version: &mut String) {
    if name.is_empty() && version.is_empty() {
        return;
    }
    packages.push(PackageRecord::new(
        std::mem::take(name),
        std::mem::take(version),
        Manager::Apk,
    ));
}
