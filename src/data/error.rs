use thiserror::Error;

/// Structural problems with a source file. I/O and parser failures are
/// reported through `anyhow` context instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    #[error("Sheet has no header row")]
    MissingHeader,

    #[error("Required column '{canonical}' ({source_name}) not found in header row")]
    MissingColumn {
        canonical: &'static str,
        source_name: &'static str,
    },
}
