#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tpl_model::interchange::{self, RecordMeta};
use tpl_model::{Document, document::defaults};
use tpl_runtime::files;

use crate::error::{DoctorError, Result};

#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// Template name.
    #[arg(long, default_value = defaults::TEMPLATE_NAME)]
    pub name: String,

    /// Directory to write the new file into.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Write the default document as a fresh interchange file.
pub fn run_new(args: NewArgs, out: &mut dyn Write) -> Result<()> {
    if args.name.trim().is_empty() {
        return Err(DoctorError::invalid("template name must not be blank"));
    }

    let mut document = Document::default();
    document.name = args.name;
    let record = interchange::export(&document, &RecordMeta::generate());

    std::fs::create_dir_all(&args.out_dir)?;
    let written = files::write_record(&record, &args.out_dir).map_err(DoctorError::File)?;
    writeln!(out, "wrote {}", written.display())?;
    Ok(())
}
