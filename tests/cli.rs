/// End-to-end tests for the auditfmt binary
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {
        "coordinates": "pkg:gem/rack@2.0.1",
        "vulnerabilities": [
            {
                "id": "7e8cdb5c",
                "title": "[CVE-2019-16782] Session hijack",
                "description": "Possible information leak",
                "cvssScore": 6.3,
                "cvssVector": "AV:N/AC:L/PR:N/UI:N/S:U/C:L/I:L/A:L",
                "cve": "CVE-2019-16782",
                "reference": "https://ossindex.sonatype.org/vuln/7e8cdb5c"
            }
        ]
    },
    { "coordinates": "pkg:gem/puma@5.0.0", "vulnerabilities": [] }
]"#;

const REVERSE_DEPS: &str = r#"{
    "rack-2.0.1": [["rails-6.0.0", "actionpack-6.0.0", "rack-2.0.1"]]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("records.json"), RECORDS).unwrap();
        fs::write(dir.path().join("deps.json"), REVERSE_DEPS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn report(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("auditfmt");
        cmd.env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.toml"))
            .arg("report")
            .arg("--records")
            .arg(self.path("records.json"));
        cmd
    }
}

#[test]
fn test_text_report() {
    let fixture = Fixture::new();

    fixture
        .report()
        .arg("--reverse-deps")
        .arg(fixture.path("deps.json"))
        .arg("--no-color")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Audit Results"))
        .stdout(predicate::str::contains(
            "[1/2] - pkg:gem/puma@5.0.0 No vulnerabilities found!",
        ))
        .stdout(predicate::str::contains("[2/2] - pkg:gem/rack@2.0.1 Vulnerable."))
        .stdout(predicate::str::contains("\tRequired by: rails-6.0.0\n"))
        .stdout(predicate::str::contains("CVE: CVE-2019-16782"))
        .stdout(predicate::str::contains("Dependencies Audited"))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_records_from_stdin() {
    let fixture = Fixture::new();

    cargo_bin_cmd!("auditfmt")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(fixture.path("config.toml"))
        .args(["report", "--records", "-", "--no-color"])
        .write_stdin(RECORDS)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[2/2] - pkg:gem/rack@2.0.1 Vulnerable."));
}

#[test]
fn test_quiet_report() {
    let fixture = Fixture::new();

    fixture
        .report()
        .args(["--quiet", "--no-color"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Audit Results").not())
        .stdout(predicate::str::contains("puma").not())
        .stdout(predicate::str::contains("[2/2] - pkg:gem/rack@2.0.1 Vulnerable."));
}

#[test]
fn test_json_report() {
    let fixture = Fixture::new();

    fixture
        .report()
        .args(["--format", "json"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"vulnerableDependencies\": 1"));
}

#[test]
fn test_fail_on_vulnerable() {
    let fixture = Fixture::new();

    fixture
        .report()
        .args(["--fail-on-vulnerable", "--no-color"])
        .assert()
        .code(3);
}

#[test]
fn test_config_ignores_vulnerability() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path("config.toml"),
        "[ignore]\nvulnerabilities = [\"7e8cdb5c\"]\n",
    )
    .unwrap();

    fixture
        .report()
        .args(["--fail-on-vulnerable", "--no-color"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "pkg:gem/rack@2.0.1 No vulnerabilities found!",
        ));
}

#[test]
fn test_output_file() {
    let fixture = Fixture::new();
    let out = fixture.path("report.txt");

    fixture.report().arg("--output").arg(&out).assert().code(0);

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("Vulnerable."));
    assert!(!written.contains("\x1b["));
}

#[test]
fn test_missing_records_file() {
    let fixture = Fixture::new();

    cargo_bin_cmd!("auditfmt")
        .arg("--config")
        .arg(fixture.path("config.toml"))
        .args(["report", "--records"])
        .arg(fixture.path("missing.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_invalid_format() {
    let fixture = Fixture::new();

    fixture
        .report()
        .args(["--format", "xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_config_init_and_path() {
    let fixture = Fixture::new();
    let config = fixture.path("conf").join("config.toml");

    cargo_bin_cmd!("auditfmt")
        .arg("--config")
        .arg(&config)
        .args(["config", "--init"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Created config file"));
    assert!(config.exists());

    cargo_bin_cmd!("auditfmt")
        .arg("--config")
        .arg(&config)
        .args(["config", "--path"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("config.toml"));
}
