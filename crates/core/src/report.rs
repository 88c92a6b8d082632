//! 리포트 조립 — 스캔 결과의 다운스트림 경계
//!
//! 스캐너가 만든 (대상, 패키지 목록) 쌍을 하나의 [`Report`]로 모읍니다.
//! 전송(HTTP 업로드)과 인증은 이 시스템의 범위 밖이며, 여기서는
//! 직렬화 형식만 책임집니다.
//!
//! # 직렬화 호환성
//!
//! 기존 소비자와의 호환을 위해 컨테이너 항목은 짧은 필드 태그를
//! 사용합니다: `i` (id), `m` (image), `p` (packages). 패키지 레코드의
//! `n`/`v`/`m` 태그는 [`PackageRecord`]가 책임집니다.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::types::{PackageRecord, ScanTarget};

/// 컨테이너 하나의 스캔 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerReport {
    /// 컨테이너 ID
    #[serde(rename = "i")]
    pub id: String,
    /// 이미지 태그
    #[serde(rename = "m")]
    pub image: String,
    /// 발견된 패키지 목록
    #[serde(rename = "p")]
    pub packages: Vec<PackageRecord>,
}

/// 호스트 전체의 스캔 리포트
///
/// 대상별로 결과를 묶습니다: 호스트 자신의 패키지 목록과
/// 실행 중이던 컨테이너별 목록.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// 스캔 식별자
    pub scan_id: String,
    /// 리포트를 생성한 호스트명
    pub hostname: String,
    /// 리포트 생성 시각
    pub generated_at: SystemTime,
    /// 호스트 자신의 패키지 목록
    pub host_packages: Vec<PackageRecord>,
    /// 컨테이너별 스캔 결과
    pub containers: Vec<ContainerReport>,
}

impl Report {
    /// 빈 리포트를 생성합니다.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            scan_id: uuid::Uuid::new_v4().to_string(),
            hostname: hostname.into(),
            generated_at: SystemTime::now(),
            host_packages: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// 대상 하나의 스캔 결과를 리포트에 추가합니다.
    pub fn add_target(&mut self, target: ScanTarget, packages: Vec<PackageRecord>) {
        match target {
            ScanTarget::LocalRoot => self.host_packages.extend(packages),
            ScanTarget::Container { id, image } => self.containers.push(ContainerReport {
                id,
                image,
                packages,
            }),
        }
    }

    /// 리포트에 포함된 전체 패키지 수
    pub fn total_packages(&self) -> usize {
        self.host_packages.len()
            + self
                .containers
                .iter()
                .map(|c| c.packages.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Manager;

    fn sample_packages() -> Vec<PackageRecord> {
        vec![
            PackageRecord::new("curl", "7.68.0", Manager::Apk),
            PackageRecord::new("bash", "5.0", Manager::Apk),
        ]
    }

    #[test]
    fn add_local_target_extends_host_packages() {
        let mut report = Report::new("host-01");
        report.add_target(ScanTarget::LocalRoot, sample_packages());
        report.add_target(
            ScanTarget::LocalRoot,
            vec![PackageRecord::new("vim", "8.2", Manager::Deb)],
        );
        assert_eq!(report.host_packages.len(), 3);
        assert!(report.containers.is_empty());
    }

    #[test]
    fn add_container_target_groups_by_container() {
        let mut report = Report::new("host-01");
        report.add_target(
            ScanTarget::Container {
                id: "abc123".to_owned(),
                image: "alpine:3.19".to_owned(),
            },
            sample_packages(),
        );
        assert_eq!(report.containers.len(), 1);
        assert_eq!(report.containers[0].id, "abc123");
        assert_eq!(report.containers[0].packages.len(), 2);
    }

    #[test]
    fn total_packages_counts_all_targets() {
        let mut report = Report::new("host-01");
        report.add_target(ScanTarget::LocalRoot, sample_packages());
        report.add_target(
            ScanTarget::Container {
                id: "abc".to_owned(),
                image: "debian:12".to_owned(),
            },
            vec![PackageRecord::new("bash", "5.2", Manager::Deb)],
        );
        assert_eq!(report.total_packages(), 3);
    }

    #[test]
    fn container_report_wire_shape_uses_short_tags() {
        let mut report = Report::new("host-01");
        report.add_target(
            ScanTarget::Container {
                id: "abc123".to_owned(),
                image: "alpine:3.19".to_owned(),
            },
            vec![PackageRecord::new("curl", "7.68.0", Manager::Apk)],
        );
        let json = serde_json::to_value(&report).unwrap();
        let container = &json["containers"][0];
        assert_eq!(container["i"], "abc123");
        assert_eq!(container["m"], "alpine:3.19");
        assert_eq!(container["p"][0]["n"], "curl");
    }

    #[test]
    fn scan_ids_are_unique() {
        let a = Report::new("h");
        let b = Report::new("h");
        assert_ne!(a.scan_id, b.scan_id);
    }
}
