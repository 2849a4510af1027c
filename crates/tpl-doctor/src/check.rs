#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tpl_model::validate;
use tpl_runtime::files;

use crate::error::{DoctorError, Result};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Interchange file to check.
    pub file: PathBuf,
}

/// Import and validate a file, printing every violation.
pub fn run_check(args: CheckArgs, out: &mut dyn Write) -> Result<()> {
    let imported =
        files::read_template(&args.file).map_err(|e| DoctorError::from_file(&args.file, e))?;
    let document = imported.document;

    if let Err(failed) = validate::validate(&document) {
        for message in failed.messages() {
            writeln!(out, "violation: {message}")?;
        }
        return Err(DoctorError::Validation {
            path: args.file,
            failed,
        });
    }

    writeln!(
        out,
        "ok: {} ({} blocks, {} visible)",
        document.name,
        document.blocks.len(),
        document.visible_count()
    )?;
    tracing::debug!(path = %args.file.display(), "template passed checks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn check(text: &str) -> (Result<()>, String) {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("t.json");
        std::fs::write(&file, text).expect("write");
        let mut out = Vec::new();
        let result = run_check(CheckArgs { file }, &mut out);
        (result, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn valid_file_passes() {
        let (result, out) = check(r#"{"name":"Tiny","blocks":[{"type":"totals"}]}"#);
        assert!(result.is_ok());
        assert_eq!(out, "ok: Tiny (1 blocks, 1 visible)\n");
    }

    #[test]
    fn every_violation_is_printed() {
        let (result, out) = check(
            r#"{"name":" ","blocks":[{"type":"totals","label":"","visible":false}]}"#,
        );
        let error = result.expect_err("should fail validation");
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            out,
            "violation: template name is required\n\
             violation: no visible blocks\n\
             violation: block #1 has no label\n"
        );
    }

    #[test]
    fn unparseable_file_exits_two() {
        let (result, out) = check("not json");
        let error = result.expect_err("should fail import");
        assert!(matches!(error, DoctorError::Import { .. }));
        assert_eq!(error.exit_code(), 2);
        assert!(out.is_empty());
    }
}
