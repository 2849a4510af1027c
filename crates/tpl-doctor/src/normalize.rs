#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use tpl_model::interchange::{self, RecordMeta};
use tpl_runtime::files;

use crate::error::{DoctorError, Result};

#[derive(Debug, Clone, Args)]
pub struct NormalizeArgs {
    /// Interchange file to normalize.
    pub file: PathBuf,

    /// Directory to write the normalized file into.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Import a file and export it again with every default filled in.
///
/// The record id and creation time survive when the input carried them.
pub fn run_normalize(args: NormalizeArgs, out: &mut dyn Write) -> Result<()> {
    let imported =
        files::read_template(&args.file).map_err(|e| DoctorError::from_file(&args.file, e))?;

    let generated = RecordMeta::generate();
    let meta = RecordMeta {
        id: imported.id.unwrap_or(generated.id),
        created_at: imported.created_at.unwrap_or(generated.created_at),
        updated_at: Utc::now(),
    };
    let record = interchange::export(&imported.document, &meta);

    std::fs::create_dir_all(&args.out_dir)?;
    let written = files::write_record(&record, &args.out_dir).map_err(DoctorError::File)?;
    writeln!(out, "wrote {}", written.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tpl_model::TemplateRecord;

    #[test]
    fn fills_defaults_and_keeps_identity() {
        let temp = tempdir().expect("tempdir");
        let input = temp.path().join("in.json");
        std::fs::write(
            &input,
            r#"{"id":"invoice-template-7","name":"Old Style","blocks":[{"type":"notes","order":2},{"type":"footer","order":1}]}"#,
        )
        .expect("write");
        let out_dir = temp.path().join("out");

        let mut out = Vec::new();
        run_normalize(
            NormalizeArgs {
                file: input,
                out_dir: out_dir.clone(),
            },
            &mut out,
        )
        .expect("normalize");

        let path = out_dir.join("Old-Style-template.json");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            format!("wrote {}\n", path.display())
        );

        let record: TemplateRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(record.id, "invoice-template-7");
        assert_eq!(record.blocks[0].label, "Footer");
        assert_eq!(record.blocks[1].order, 2);
        assert_eq!(record.fonts.heading, "Arial");
        assert_eq!(
            record.colors.primary,
            "linear-gradient(to right, #0ea5e9, #2563eb)"
        );
    }

    #[test]
    fn missing_input_exits_two() {
        let temp = tempdir().expect("tempdir");
        let error = run_normalize(
            NormalizeArgs {
                file: temp.path().join("absent.json"),
                out_dir: temp.path().to_path_buf(),
            },
            &mut Vec::new(),
        )
        .expect_err("missing input");
        assert!(matches!(error, DoctorError::MissingPath { .. }));
        assert_eq!(error.exit_code(), 2);
    }
}
