//! Core data types for audit records, reverse dependencies, and severities.
//!
//! This module contains the fundamental types used throughout auditfmt:
//!
//! - [`AuditRecord`] - One audited package and its vulnerabilities
//! - [`VulnerabilityDetail`] - A single reported vulnerability
//! - [`PackageCoordinates`] - Name and version parsed from a coordinate string
//! - [`ReverseDependencyIndex`] - Which packages pull in a given package
//! - [`Severity`] - Classification of a CVSS score
//!
//! # Example
//!
//! ```
//! use auditfmt::{AuditRecord, PackageCoordinates};
//!
//! let record = AuditRecord::new("pkg:gem/rack@2.0.1");
//! let coords = PackageCoordinates::parse(&record.coordinates, "pkg:gem/");
//!
//! assert_eq!(coords.lookup_key(), "rack-2.0.1");
//! assert!(!record.is_vulnerable());
//! ```

mod record;
mod reverse_deps;
mod severity;

pub use record::*;
pub use reverse_deps::*;
pub use severity::*;
