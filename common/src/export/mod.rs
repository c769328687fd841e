//! Export core modules shared by the CLI.

#[cfg(feature = "excel")]
pub mod excel_core;
pub mod pdf_core;
