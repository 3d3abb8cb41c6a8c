//! End-to-end tests for the `hrops-export` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const ROWS: &str = r#"[
    {"id": 1, "employee": {"user": {"firstName": "Ana", "lastName": "Silva"}},
     "checkIn": "2024-03-07T08:00:00Z", "checkOut": null, "status": "PRESENT"},
    {"id": 2, "employee": {"user": {"firstName": "Bo", "lastName": "Chen"}},
     "checkIn": "2024-03-07T09:15:00Z", "checkOut": null, "status": "LATE"}
]"#;

/// Command isolated from any settings file on the host.
fn hrops(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("hrops-export");
    cmd.env_remove("HROPS_EXPORT_CONFIG")
        .env_remove("HROPS_LOG")
        .env_remove("RUST_LOG")
        .env("HROPS_CONFIG_DIR", home.join("no-config"))
        .env("XDG_CONFIG_HOME", home.join("xdg"));
    cmd
}

fn write_rows(dir: &Path) -> String {
    let path = dir.join("rows.json");
    std::fs::write(&path, ROWS).unwrap();
    path.display().to_string()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ============================================================================
// Render
// ============================================================================

mod render {
    use super::*;

    #[test]
    fn csv_file_from_preset() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("out");
        let input = write_rows(home.path());

        let output = hrops(home.path())
            .args(["render", "--input", &input, "--format", "csv", "--report", "attendance"])
            .args(["--generated-on", "2024-03-07", "--output-dir"])
            .arg(&out)
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let written = stdout_json(&output);
        assert_eq!(written[0]["content_type"], "text/csv");

        let csv = std::fs::read_to_string(out.join("attendance-report.csv")).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("\"id\",\"employee.user.firstName\""));
        assert!(lines.next().unwrap().contains("\"Mar 7, 2024, 08:00\""));
    }

    #[test]
    fn preview_prints_html_to_stdout() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["render", "--input", "-", "--format", "preview", "--title", "Shifts"])
            .write_stdin(ROWS)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
            .stdout(predicate::str::contains("Shifts"))
            .stdout(predicate::str::contains("Ana"));
    }

    #[test]
    fn preview_with_output_dir_is_saved() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("out");
        hrops(home.path())
            .args(["render", "--input", "-", "--format", "preview", "--filename", "shifts"])
            .arg("--output-dir")
            .arg(&out)
            .write_stdin(ROWS)
            .assert()
            .success();
        assert!(out.join("shifts.html").exists());
    }

    #[test]
    fn request_object_with_options() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("out");
        let request = format!(
            r#"{{"rows": {}, "options": {{"fields": ["id", "status"], "theme": "dark", "pageSize": "Letter"}}}}"#,
            ROWS
        );
        hrops(home.path())
            .args(["render", "-i", "-", "-f", "pdf", "--filename", "shifts", "-o"])
            .arg(&out)
            .write_stdin(request)
            .assert()
            .success();

        let pdf = std::fs::read(out.join("shifts.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn excel_workbook() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("out");
        hrops(home.path())
            .args(["render", "-i", "-", "-f", "excel", "--options", r#"{"fields": ["id"]}"#, "-o"])
            .arg(&out)
            .write_stdin(ROWS)
            .assert()
            .success();
        let xlsx = std::fs::read(out.join("export.xlsx")).unwrap();
        assert!(xlsx.starts_with(b"PK"));
    }

    #[test]
    fn settings_theme_reaches_preview() {
        let home = TempDir::new().unwrap();
        let settings = home.path().join("export.toml");
        std::fs::write(&settings, "[defaults]\ntheme = \"corporate\"\n").unwrap();

        hrops(home.path())
            .args(["render", "-i", "-", "-f", "preview", "--config"])
            .arg(&settings)
            .write_stdin(ROWS)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                hrops_export::theme::CORPORATE.colors.primary,
            ));
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn unsupported_format_exits_1_with_payload() {
        let home = TempDir::new().unwrap();
        let output = hrops(home.path())
            .args(["render", "-i", "-", "-f", "docx"])
            .write_stdin(ROWS)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());

        let stderr = String::from_utf8(output.stderr).unwrap();
        let payload: Value = stderr
            .lines()
            .find_map(|line| serde_json::from_str(line).ok())
            .expect("payload line on stderr");
        assert_eq!(payload["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(payload["message"], "Unsupported export format: docx");
    }

    #[test]
    fn bad_input_exits_2() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["render", "-i", "-", "-f", "csv"])
            .write_stdin("42")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("ERR_ARGS"));
    }

    #[test]
    fn unknown_report_exits_2() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["render", "-i", "-", "-f", "csv", "--report", "timesheet"])
            .write_stdin(ROWS)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Unknown report kind: timesheet"));
    }

    #[test]
    fn escaping_filename_exits_2() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["render", "-i", "-", "-f", "csv", "--filename", "../x"])
            .write_stdin(ROWS)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid filename"));
    }

    #[test]
    fn invalid_settings_exit_3() {
        let home = TempDir::new().unwrap();
        let settings = home.path().join("export.toml");
        std::fs::write(&settings, "[cache]\ncapacity = 0\n[defaults]\ntheme = \"neon\"\n").unwrap();

        hrops(home.path())
            .args(["config", "validate"])
            .arg(&settings)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("ERR_SETTINGS"))
            .stderr(predicate::str::contains("neon"));
    }

    #[test]
    fn missing_input_file_exits_2() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["render", "-i", "/nonexistent/rows.json", "-f", "csv"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Failed to read"));
    }
}

// ============================================================================
// Listings
// ============================================================================

mod listings {
    use super::*;

    #[test]
    fn themes_lists_builtins() {
        let home = TempDir::new().unwrap();
        let output = hrops(home.path()).arg("themes").output().unwrap();
        assert!(output.status.success());

        let themes = stdout_json(&output);
        let names: Vec<&str> = themes
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["default", "dark", "corporate"]);
    }

    #[test]
    fn fields_for_payroll() {
        let home = TempDir::new().unwrap();
        let output = hrops(home.path()).args(["fields", "PAYROLL"]).output().unwrap();
        assert!(output.status.success());

        let value = stdout_json(&output);
        assert_eq!(value["kind"], "payroll");
        assert_eq!(value["filename"], "payroll-report");
        assert_eq!(value["fields"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn config_show_defaults() {
        let home = TempDir::new().unwrap();
        let output = hrops(home.path()).args(["config", "show"]).output().unwrap();
        assert!(output.status.success());

        let value = stdout_json(&output);
        assert_eq!(value["source"], "builtin_default");
        assert_eq!(value["settings"]["defaults"]["theme"], "default");
        assert_eq!(value["settings"]["cache"]["capacity"], 64);
    }

    #[test]
    fn config_show_reports_env_source() {
        let home = TempDir::new().unwrap();
        let settings = home.path().join("custom.toml");
        std::fs::write(&settings, "[chart]\nwidth = 1200\n").unwrap();

        let output = hrops(home.path())
            .env("HROPS_EXPORT_CONFIG", &settings)
            .args(["config", "show"])
            .output()
            .unwrap();
        let value = stdout_json(&output);
        assert_eq!(value["source"], "environment");
        assert_eq!(value["settings"]["chart"]["width"], 1200);
    }

    #[test]
    fn help_lists_commands() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("render"))
            .stdout(predicate::str::contains("themes"))
            .stdout(predicate::str::contains("fields"));
    }
}

// ============================================================================
// Logging
// ============================================================================

mod logging {
    use super::*;

    #[test]
    fn quiet_flag_beats_rust_log() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .env("RUST_LOG", "hrops_export=debug,hrops_cli=debug")
            .args(["-q", "render", "-i", "-", "-f", "csv", "-o"])
            .arg(home.path().join("out"))
            .write_stdin(ROWS)
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn rust_log_applies_without_level_flags() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .env("RUST_LOG", "hrops_export=debug")
            .args(["render", "-i", "-", "-f", "csv", "-o"])
            .arg(home.path().join("out"))
            .write_stdin(ROWS)
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG"));
    }

    #[test]
    fn log_timestamps_prefix_lines() {
        let home = TempDir::new().unwrap();
        hrops(home.path())
            .args(["-v", "--log-timestamps", "render", "-i", "-", "-f", "csv", "-o"])
            .arg(home.path().join("out"))
            .write_stdin(ROWS)
            .assert()
            .success()
            .stderr(predicate::str::is_match(r"(?m)^\d{4}-\d{2}-\d{2}T.*INFO").unwrap());
    }
}
