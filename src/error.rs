use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting Markdown into a worksheet.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file at {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config file at {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("layout out of range: {0}")]
    Layout(String),

    #[error("workbook generation failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// A hook or merge received content it cannot accept. This is a bug in
    /// the event driver, not malformed input.
    #[error("protocol violation: {0}")]
    Protocol(String),
}
