//! Colored, human-readable audit report.

use tracing::{debug, warn};

use super::palette::{AnsiPalette, Palette, Tone};
use super::{sort_by_exposure, ReportError, ReportFormatter};
use crate::model::{
    required_by, AuditRecord, DependencyChain, PackageCoordinates, ReverseDependencyIndex,
    Severity, VulnerabilityDetail, GEM_PREFIX,
};

const HEADER: &str = "\nAudit Results\n=============\n";
const SUMMARY_HEADERS: [&str; 2] = ["Dependencies Audited", "Vulnerable Dependencies"];

/// Renders audit records as a colored, human-readable report.
pub struct ResultFormatter {
    quiet: bool,
    prefix: String,
    palette: Box<dyn Palette>,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ResultFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            prefix: GEM_PREFIX.to_string(),
            palette: Box::new(AnsiPalette),
        }
    }

    pub fn with_palette(mut self, palette: Box<dyn Palette>) -> Self {
        self.palette = palette;
        self
    }

    /// Ecosystem prefix stripped from coordinates before the name/version split.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Builds the full report.
    ///
    /// Records are listed fewest-vulnerabilities first; equal counts keep
    /// their input order. In quiet mode the header and clean packages are
    /// left out, but vulnerable packages and the summary table never are.
    pub fn produce_report(
        &self,
        records: &[AuditRecord],
        reverse_deps: &ReverseDependencyIndex,
    ) -> String {
        let mut fragments: Vec<String> = Vec::new();
        if !self.quiet {
            fragments.push(HEADER.to_string());
        }

        let count = records.len();
        let mut vulnerable_count = 0;

        for (i, record) in sort_by_exposure(records).into_iter().enumerate() {
            let position = i + 1;
            let coords = PackageCoordinates::parse(&record.coordinates, &self.prefix);
            if !coords.is_well_formed() {
                warn!(coordinates = %record.coordinates, "coordinates have no version separator");
            }
            let chains = reverse_deps.lookup(&coords);

            if record.is_vulnerable() {
                vulnerable_count += 1;
                fragments.push(self.palette.colorize(
                    &format!("[{}/{}] - {} ", position, count, record.coordinates),
                    Tone::Red,
                ));
                fragments.push(self.palette.colorize("Vulnerable.", Tone::RedBold));
                fragments.push("\n".to_string());
                if let Some(chains) = chains {
                    fragments.push(self.format_reverse_deps(chains, &coords.name));
                }
                for vuln in record.vulnerabilities.values() {
                    fragments.push(self.format_vulnerability(vuln));
                }
            } else if !self.quiet {
                fragments.push(self.palette.colorize(
                    &format!("[{}/{}] - {} ", position, count, record.coordinates),
                    Tone::White,
                ));
                fragments.push(
                    self.palette
                        .colorize("No vulnerabilities found!", Tone::GreenBold),
                );
                fragments.push("\n".to_string());
                if let Some(chains) = chains {
                    fragments.push(self.format_reverse_deps(chains, &coords.name));
                }
            }
        }

        fragments.push(self.palette.render_table(
            &SUMMARY_HEADERS,
            &[vec![count.to_string(), vulnerable_count.to_string()]],
        ));

        debug!(
            audited = count,
            vulnerable = vulnerable_count,
            quiet = self.quiet,
            "rendered text report"
        );

        fragments.concat()
    }

    fn format_vulnerability(&self, vuln: &VulnerabilityDetail) -> String {
        let lines = [
            "Vulnerability Details:".to_string(),
            format!("ID: {}", vuln.id),
            format!("Title: {}", vuln.title),
            format!("Description: {}", vuln.description),
            format!("CVSS Score: {}", vuln.score_label()),
            format!("CVSS Vector: {}", vuln.cvss_vector),
            format!("CVE: {}", vuln.cve),
            format!("Reference: {}", vuln.reference),
        ];

        let mut block: String = lines
            .iter()
            .map(|line| {
                format!(
                    "\n\t{}\n",
                    self.palette
                        .colorize(line, color_for_severity(vuln.cvss_score))
                )
            })
            .collect();
        block.push('\n');
        block
    }

    fn format_reverse_deps(&self, chains: &[DependencyChain], name: &str) -> String {
        required_by(chains, name)
            .into_iter()
            .map(|dep| format!("\tRequired by: {}\n", dep))
            .collect()
    }
}

impl ReportFormatter for ResultFormatter {
    fn render(
        &self,
        records: &[AuditRecord],
        reverse_deps: &ReverseDependencyIndex,
    ) -> Result<String, ReportError> {
        Ok(self.produce_report(records, reverse_deps))
    }
}

/// Tone for a vulnerability's detail block, by CVSS score.
pub fn color_for_severity(score: Option<f64>) -> Tone {
    match Severity::from_cvss(score) {
        Severity::Low => Tone::CyanBold,
        Severity::Medium => Tone::YellowBold,
        Severity::High => Tone::OrangeBold,
        Severity::Critical => Tone::RedBold,
    }
}
