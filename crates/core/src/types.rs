//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모든 크레이트가 공유하는 데이터 구조를 정의합니다.
//! 파서, 추출기, 스캐너는 이 타입들로 결과를 교환합니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// 패키지 매니저 종류
///
/// 닫힌 variant 집합입니다. 새 포맷 지원은 여기에 variant를 추가하고
/// `pkgtally-inventory`에 파서를 구현하는 방식으로 확장합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    /// Alpine apk (installed-db)
    Apk,
    /// Debian dpkg (status 파일)
    Deb,
}

impl Manager {
    /// 문자열에서 매니저를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "apk" => Some(Self::Apk),
            "deb" | "dpkg" => Some(Self::Deb),
            _ => None,
        }
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apk => write!(f, "apk"),
            Self::Deb => write!(f, "deb"),
        }
    }
}

/// 설치된 패키지 한 건의 정규화 레코드
///
/// 파서가 생성하는 출력 단위입니다. 구조적 동등성 외의 식별자는 없으며,
/// 같은 패키지가 DB에 두 번 나타나면 레코드도 두 번 생성됩니다
/// (이 계층에서 중복 제거를 하지 않습니다).
///
/// # 직렬화 형식
///
/// 다운스트림 소비자와의 호환을 위해 짧은 필드 태그를 사용합니다:
/// `n` (name), `v` (version), `m` (manager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// 벤더 패키지명 (비어있지 않음)
    #[serde(rename = "n")]
    pub name: String,
    /// 버전 문자열 — 벤더 고유 형식이며 이 시스템은 의미를 해석하지 않습니다
    #[serde(rename = "v")]
    pub version: String,
    /// 이 레코드를 생성한 파서의 매니저 태그
    #[serde(rename = "m")]
    pub manager: Manager,
}

impl PackageRecord {
    /// 새 패키지 레코드를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>, manager: Manager) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            manager,
        }
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.manager)
    }
}

/// 컨테이너 정보
///
/// 컨테이너 런타임이 보고한 실행 중 컨테이너의 메타데이터입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// 컨테이너 ID
    pub id: String,
    /// 컨테이너 이름
    pub name: String,
    /// 이미지명
    pub image: String,
    /// 상태 (running 등)
    pub status: String,
    /// 생성 시각
    pub created_at: SystemTime,
}

impl fmt::Display for ContainerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) image={} status={}",
            self.name,
            &self.id[..12.min(self.id.len())],
            self.image,
            self.status,
        )
    }
}

/// 스캔 대상
///
/// 로컬 호스트 파일시스템 또는 실행 중인 컨테이너 하나의 파일시스템입니다.
/// 컨테이너의 `image`는 리포트 표시에만 사용되며 파싱에는 관여하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// 로컬 호스트 루트
    LocalRoot,
    /// 실행 중인 컨테이너
    Container {
        /// 컨테이너 ID
        id: String,
        /// 이미지 태그 (리포트용)
        image: String,
    },
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalRoot => write!(f, "local"),
            Self::Container { id, image } => {
                write!(f, "container {} ({})", &id[..12.min(id.len())], image)
            }
        }
    }
}

/// 파일 stat 결과
///
/// 존재 여부와 디렉토리 여부만 구분합니다. 로케이터는 존재하면서
/// 디렉토리가 아닌 경로만 "present"로 취급합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// 경로 존재 여부
    pub exists: bool,
    /// 디렉토리 여부 (exists가 false면 의미 없음)
    pub is_dir: bool,
}

impl FileStat {
    /// 존재하지 않는 경로의 stat
    pub const ABSENT: Self = Self {
        exists: false,
        is_dir: false,
    };

    /// 존재하는 일반 파일의 stat
    pub const FILE: Self = Self {
        exists: true,
        is_dir: false,
    };

    /// 존재하는 디렉토리의 stat
    pub const DIR: Self = Self {
        exists: true,
        is_dir: true,
    };

    /// 일반(비 디렉토리) 파일로 존재하는지 여부
    pub fn is_present_file(self) -> bool {
        self.exists && !self.is_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_display() {
        assert_eq!(Manager::Apk.to_string(), "apk");
        assert_eq!(Manager::Deb.to_string(), "deb");
    }

    #[test]
    fn manager_from_str_loose() {
        assert_eq!(Manager::from_str_loose("apk"), Some(Manager::Apk));
        assert_eq!(Manager::from_str_loose("DEB"), Some(Manager::Deb));
        assert_eq!(Manager::from_str_loose("dpkg"), Some(Manager::Deb));
        assert_eq!(Manager::from_str_loose("rpm"), None);
    }

    #[test]
    fn package_record_wire_shape_uses_short_tags() {
        let record = PackageRecord::new("curl", "7.68.0", Manager::Apk);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["n"], "curl");
        assert_eq!(json["v"], "7.68.0");
        assert_eq!(json["m"], "apk");
    }

    #[test]
    fn package_record_deserialize_roundtrip() {
        let record = PackageRecord::new("bash", "5.0", Manager::Deb);
        let json = serde_json::to_string(&record).unwrap();
        let back: PackageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn package_record_structural_equality() {
        let a = PackageRecord::new("curl", "7.68.0", Manager::Apk);
        let b = PackageRecord::new("curl", "7.68.0", Manager::Apk);
        assert_eq!(a, b);
    }

    #[test]
    fn package_record_display() {
        let record = PackageRecord::new("curl", "7.68.0", Manager::Apk);
        assert_eq!(record.to_string(), "curl 7.68.0 (apk)");
    }

    #[test]
    fn container_info_display_truncates_id() {
        let info = ContainerInfo {
            id: "abcdef0123456789abcdef".to_owned(),
            name: "web".to_owned(),
            image: "nginx:latest".to_owned(),
            status: "running".to_owned(),
            created_at: SystemTime::now(),
        };
        let display = info.to_string();
        assert!(display.contains("abcdef012345"));
        assert!(!display.contains("abcdef0123456789abcdef"));
    }

    #[test]
    fn scan_target_display() {
        assert_eq!(ScanTarget::LocalRoot.to_string(), "local");
        let target = ScanTarget::Container {
            id: "abc123".to_owned(),
            image: "alpine:3.19".to_owned(),
        };
        assert!(target.to_string().contains("alpine:3.19"));
    }

    #[test]
    fn file_stat_present_file() {
        assert!(FileStat::FILE.is_present_file());
        assert!(!FileStat::DIR.is_present_file());
        assert!(!FileStat::ABSENT.is_present_file());
    }
}
