//! `validate` command — check configuration files without running
//!
//! Parses and validates each file, printing every issue found. With
//! `--strict`, warnings fail validation too.

use std::path::Path;

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{VitrineConfig, validate};
use crate::error::{ConfigError, Result, Severity, ValidationIssue};

/// Validates each file, printing all issues.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` for the first file with
/// error-severity issues (or any issue under `--strict`), after every
/// file has been checked and reported.
pub fn execute(args: &ValidateArgs) -> Result<()> {
    let mut first_failure: Option<ConfigError> = None;

    for file in &args.files {
        let issues = check_file(file);
        report(file, &issues, args.format);

        let failing: Vec<ValidationIssue> = issues
            .into_iter()
            .filter(|i| args.strict || i.severity == Severity::Error)
            .collect();
        if !failing.is_empty() && first_failure.is_none() {
            first_failure = Some(ConfigError::ValidationError {
                path: file.display().to_string(),
                errors: failing,
            });
        }
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}

/// Parses and validates one file, folding read/parse failures into the
/// issue list.
fn check_file(path: &Path) -> Vec<ValidationIssue> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            return vec![ValidationIssue {
                path: path.display().to_string(),
                message: e.to_string(),
                severity: Severity::Error,
            }];
        }
    };

    match serde_yaml::from_str::<VitrineConfig>(&raw) {
        Ok(config) => validate(&config),
        Err(e) => vec![ValidationIssue {
            path: path.display().to_string(),
            message: format!("parse error: {e}"),
            severity: Severity::Error,
        }],
    }
}

fn report(path: &Path, issues: &[ValidationIssue], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let line = json!({
                "file": path.display().to_string(),
                "valid": issues.iter().all(|i| i.severity != Severity::Error),
                "issues": issues
                    .iter()
                    .map(|i| {
                        json!({
                            "path": i.path,
                            "message": i.message,
                            "severity": match i.severity {
                                Severity::Error => "error",
                                Severity::Warning => "warning",
                            },
                        })
                    })
                    .collect::<Vec<_>>(),
            });
            println!("{line}");
        }
        OutputFormat::Human => {
            if issues.is_empty() {
                println!("{}: ok", path.display());
            } else {
                println!("{}:", path.display());
                for issue in issues {
                    println!("  {issue}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn args(files: Vec<PathBuf>, strict: bool) -> ValidateArgs {
        ValidateArgs {
            files,
            format: OutputFormat::Human,
            strict,
        }
    }

    #[test]
    fn test_valid_file_passes() {
        let f = write_temp(
            r#"
catalog:
  type: http
  url: "https://shop.example/api/products"
"#,
        );
        assert!(execute(&args(vec![f.path().to_path_buf()], false)).is_ok());
    }

    #[test]
    fn test_invalid_file_fails() {
        let f = write_temp(
            r#"
presentation:
  reveal_interval: "never"
"#,
        );
        assert!(execute(&args(vec![f.path().to_path_buf()], false)).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(execute(&args(vec![PathBuf::from("/nonexistent.yaml")], false)).is_err());
    }

    #[test]
    fn test_warning_passes_unless_strict() {
        let f = write_temp(
            r#"
presentation:
  slow_timeout: "0s"
"#,
        );
        assert!(execute(&args(vec![f.path().to_path_buf()], false)).is_ok());
        assert!(execute(&args(vec![f.path().to_path_buf()], true)).is_err());
    }

    #[test]
    fn test_all_files_checked_before_failing() {
        let bad = write_temp("catalog:\n  type: http\n  url: \"\"\n");
        let good = write_temp("{}");
        // Both files are in the list; the failure reports the bad one.
        let err = execute(&args(
            vec![bad.path().to_path_buf(), good.path().to_path_buf()],
            false,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }
}
