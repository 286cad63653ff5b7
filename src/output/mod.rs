mod json;
pub mod palette;
mod text;

pub use json::JsonFormatter;
pub use palette::{palette_for, AnsiPalette, Palette, PlainPalette, Tone};
pub use text::{color_for_severity, ResultFormatter};

pub use crate::error::ReportError;
use crate::model::{AuditRecord, ReverseDependencyIndex};

/// Output format for audit reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

/// Turns audit records into a printable report.
pub trait ReportFormatter {
    fn render(
        &self,
        records: &[AuditRecord],
        reverse_deps: &ReverseDependencyIndex,
    ) -> Result<String, ReportError>;

    fn emit(&self, report: &str) {
        println!("{}", report);
    }
}

/// Settings shared by every formatter.
#[derive(Debug, Clone)]
pub struct FormatterOptions {
    pub quiet: bool,
    pub color: bool,
    pub prefix: String,
}

pub fn formatter_for(format: OutputFormat, options: &FormatterOptions) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(
            ResultFormatter::new(options.quiet)
                .with_prefix(options.prefix.clone())
                .with_palette(palette_for(options.color)),
        ),
        OutputFormat::Json => Box::new(JsonFormatter::new().with_prefix(options.prefix.clone())),
    }
}

/// Records ordered by vulnerability count, fewest first. Ties keep input order.
pub fn sort_by_exposure(records: &[AuditRecord]) -> Vec<&AuditRecord> {
    let mut sorted: Vec<&AuditRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.vulnerabilities.len());
    sorted
}
