#![forbid(unsafe_code)]

//! `tpl-doctor`: command-line checks for template interchange files.

pub mod check;
pub mod cli;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod scaffold;

pub use cli::run_from_env;
pub use error::{DoctorError, Result};
