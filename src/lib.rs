mod block;
mod collector;
mod config;
mod error;
mod grid;
mod links;
mod parser;
mod style;
mod xlsx;

pub use block::{
    BlockAccumulator, BlockElement, BlockStyle, InlineAccumulator, InlineElement, Marker,
};
pub use collector::{Collector, Fragment};
pub use config::Config;
pub use error::Error;
pub use grid::{CellRef, GridRenderer, MAX_COLUMN, MAX_ROW, Run, Sink};
pub use links::LinkRegistry;
pub use parser::{Hooks, parse};
pub use style::{Alignment, CellStyle, Color, Fill, Font, StyleResolver};
pub use xlsx::{Cell, Sheet};

use std::fs;
use std::path::{Path, PathBuf};

/// Parse markdown into rows, link references included.
pub fn collect(markdown: &str) -> Result<BlockAccumulator, Error> {
    parser::collect(markdown)
}

/// Render markdown into an in-memory sheet.
pub fn markdown_to_sheet(markdown: &str, config: &Config) -> Result<Sheet, Error> {
    let blocks = collect(markdown)?;
    let mut sheet = Sheet::new();
    if let Some(width) = config.layout.column_width {
        sheet.set_column_width(config.layout.column, width);
    }
    let rows = GridRenderer::new(config).render(blocks, &mut sheet)?;
    log::debug!("Rendered {} rows", rows);
    Ok(sheet)
}

/// Convert markdown to `.xlsx` bytes using default config.
pub fn markdown_to_xlsx(markdown: &str) -> Result<Vec<u8>, Error> {
    markdown_to_xlsx_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to `.xlsx` bytes with custom config.
pub fn markdown_to_xlsx_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, Error> {
    markdown_to_sheet(markdown, config)?.to_bytes()
}

/// Convert a markdown file to a workbook. Without `output`, the input path
/// with an `.xlsx` extension is used. Returns the path written.
pub fn convert(input: &Path, output: Option<&Path>, config: &Config) -> Result<PathBuf, Error> {
    let markdown = fs::read_to_string(input).map_err(|source| Error::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("xlsx"));

    let mut sheet = markdown_to_sheet(&markdown, config)?;
    if sheet.is_empty() {
        log::warn!("{} has no renderable content", input.display());
    }
    sheet.save(&output)?;

    log::info!(
        "Converted {} ({} rows) to {}",
        input.display(),
        sheet.len(),
        output.display()
    );
    Ok(output)
}
