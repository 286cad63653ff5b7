pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod output;

pub use config::Config;
pub use error::{InputError, ReportError};
pub use model::{
    AuditRecord, PackageCoordinates, ReverseDependencyIndex, Severity, VulnerabilityDetail,
};
pub use output::{ReportFormatter, ResultFormatter};
