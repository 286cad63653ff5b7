//! Loading of the JSON documents produced by the audit collaborators.
//!
//! Two inputs feed a report:
//!
//! - the audit service response, a JSON array of records
//!   (`[{"coordinates": "pkg:gem/rack@2.0.1", "vulnerabilities": [...]}]`)
//! - an optional reverse dependency index, a JSON object mapping
//!   `name-version` to arrays of dependency chains
//!
//! A path of `-` reads from stdin.

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::InputError;
use crate::model::{AuditRecord, ReverseDependencyIndex};

const STDIN_PATH: &str = "-";

/// Reads the audit service response.
pub fn load_records(path: &Path) -> Result<Vec<AuditRecord>, InputError> {
    let records: Vec<AuditRecord> = load_json(path)?;
    debug!(path = %path.display(), records = records.len(), "loaded audit records");
    Ok(records)
}

/// Reads the reverse dependency index, or returns an empty one when no path is given.
pub fn load_reverse_deps(path: Option<&Path>) -> Result<ReverseDependencyIndex, InputError> {
    let Some(path) = path else {
        return Ok(ReverseDependencyIndex::new());
    };

    let index: ReverseDependencyIndex = load_json(path)?;
    debug!(path = %path.display(), packages = index.len(), "loaded reverse dependencies");
    Ok(index)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = read_source(path)?;
    serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_source(path: &Path) -> Result<String, InputError> {
    let io_error = |source| InputError::Io {
        path: PathBuf::from(path),
        source,
    };

    if path == Path::new(STDIN_PATH) {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(io_error)?;
        Ok(content)
    } else {
        std::fs::read_to_string(path).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.json");
        fs::write(
            &path,
            r#"[
                {"coordinates": "pkg:gem/rack@2.0.1", "vulnerabilities": [
                    {"id": "abc", "title": "XSS", "cvssScore": 6.1}
                ]},
                {"coordinates": "pkg:gem/puma@5.0.0", "vulnerabilities": []}
            ]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_vulnerable());
        assert!(!records[1].is_vulnerable());
    }

    #[test]
    fn test_load_records_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_records(&dir.path().join("nope.json")).unwrap_err();

        assert!(matches!(err, InputError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_load_records_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.json");
        fs::write(&path, r#"{"coordinates": "not an array"}"#).unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, InputError::Parse { .. }));
    }

    #[test]
    fn test_load_reverse_deps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deps.json");
        fs::write(&path, r#"{"rack-2.0.1": [["rails-6.0.0", "rack-2.0.1"]]}"#).unwrap();

        let index = load_reverse_deps(Some(&path)).unwrap();
        assert_eq!(index.get("rack-2.0.1").map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_load_reverse_deps_absent() {
        assert!(load_reverse_deps(None).unwrap().is_empty());
    }
}
