//! Machine-readable JSON audit report.

use serde::Serialize;
use tracing::debug;

use super::{sort_by_exposure, ReportError, ReportFormatter};
use crate::model::{
    required_by, AuditRecord, PackageCoordinates, ReverseDependencyIndex, Severity,
    VulnerabilityMap, GEM_PREFIX,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    dependencies_audited: usize,
    vulnerable_dependencies: usize,
    packages: Vec<JsonPackage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPackage<'a> {
    coordinates: &'a str,
    name: String,
    version: String,
    vulnerable: bool,
    severity: Option<Severity>,
    required_by: Vec<&'a str>,
    vulnerabilities: &'a VulnerabilityMap,
}

/// Machine-readable report. Ignores quiet mode.
pub struct JsonFormatter {
    prefix: String,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            prefix: GEM_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl ReportFormatter for JsonFormatter {
    fn render(
        &self,
        records: &[AuditRecord],
        reverse_deps: &ReverseDependencyIndex,
    ) -> Result<String, ReportError> {
        let packages: Vec<JsonPackage> = sort_by_exposure(records)
            .into_iter()
            .map(|record| {
                let coords = PackageCoordinates::parse(&record.coordinates, &self.prefix);
                let required = reverse_deps
                    .lookup(&coords)
                    .map(|chains| required_by(chains, &coords.name))
                    .unwrap_or_default();

                JsonPackage {
                    coordinates: &record.coordinates,
                    vulnerable: record.is_vulnerable(),
                    severity: record
                        .vulnerabilities
                        .values()
                        .map(|v| Severity::from_cvss(v.cvss_score))
                        .max(),
                    required_by: required,
                    vulnerabilities: &record.vulnerabilities,
                    name: coords.name,
                    version: coords.version,
                }
            })
            .collect();

        let report = JsonReport {
            dependencies_audited: records.len(),
            vulnerable_dependencies: packages.iter().filter(|p| p.vulnerable).count(),
            packages,
        };
        debug!(audited = report.dependencies_audited, "rendered json report");

        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{chain, VulnerabilityDetail};
    use serde_json::Value;

    fn render(records: &[AuditRecord], index: &ReverseDependencyIndex) -> Value {
        let json = JsonFormatter::new().render(records, index).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_json_summary_counts() {
        let records = vec![
            AuditRecord::new("pkg:gem/bar@2.0")
                .with_vulnerability(VulnerabilityDetail::new("CVE-1", 8.0))
                .with_vulnerability(VulnerabilityDetail::new("CVE-2", 4.0)),
            AuditRecord::new("pkg:gem/foo@1.0"),
        ];
        let value = render(&records, &ReverseDependencyIndex::new());

        assert_eq!(value["dependenciesAudited"], 2);
        assert_eq!(value["vulnerableDependencies"], 1);
        assert_eq!(value["packages"][0]["coordinates"], "pkg:gem/foo@1.0");
        assert_eq!(value["packages"][0]["severity"], Value::Null);
        assert_eq!(value["packages"][1]["name"], "bar");
        assert_eq!(value["packages"][1]["version"], "2.0");
        assert_eq!(value["packages"][1]["severity"], "critical");
        assert_eq!(value["packages"][1]["vulnerabilities"][1]["id"], "CVE-2");
        assert_eq!(value["packages"][1]["vulnerabilities"][1]["cvssScore"], 4.0);
    }

    #[test]
    fn test_json_required_by() {
        let index: ReverseDependencyIndex =
            [("rack-2.0.1", vec![chain(["rails-6.0.0", "rack-2.0.1"])])]
                .into_iter()
                .collect();
        let value = render(&[AuditRecord::new("pkg:gem/rack@2.0.1")], &index);

        assert_eq!(value["packages"][0]["requiredBy"], serde_json::json!(["rails-6.0.0"]));
    }

    #[test]
    fn test_json_empty() {
        let value = render(&[], &ReverseDependencyIndex::new());
        assert_eq!(value["dependenciesAudited"], 0);
        assert_eq!(value["packages"], serde_json::json!([]));
    }
}
