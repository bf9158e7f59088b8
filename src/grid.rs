use std::path::Path;

use crate::block::{BlockAccumulator, BlockElement, BlockStyle};
use crate::config::Config;
use crate::error::Error;
use crate::style::{Alignment, Fill, Font, StyleResolver};

/// Last row of an xlsx worksheet (1-based)
pub const MAX_ROW: u32 = 1_048_576;
/// Last column of an xlsx worksheet (1-based)
pub const MAX_COLUMN: u16 = 16_384;

/// 1-based cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub column: u16,
}

/// One rich-text run. `font: None` inherits the cell font.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: Option<Font>,
}

/// Destination grid for rendered blocks.
pub trait Sink {
    /// Get or create the cell at a 1-based position.
    fn cell_at(&mut self, row: u32, column: u16) -> CellRef;
    /// Replace the cell's content with `runs`.
    fn set_rich_text(&mut self, cell: CellRef, runs: Vec<Run>);
    fn set_font(&mut self, cell: CellRef, font: Font);
    fn set_alignment(&mut self, cell: CellRef, alignment: Alignment);
    fn set_fill(&mut self, cell: CellRef, fill: Fill);
    fn save(&mut self, path: &Path) -> Result<(), Error>;
}

/// Writes blocks one per row, top to bottom, in a single column.
pub struct GridRenderer<'a> {
    resolver: StyleResolver<'a>,
    bullet: &'a str,
    next_row: u32,
    column: u16,
}

impl<'a> GridRenderer<'a> {
    /// Renderer starting at the configured layout position.
    pub fn new(config: &'a Config) -> Self {
        Self::at(config, config.layout.start_row, config.layout.column)
    }

    pub fn at(config: &'a Config, row: u32, column: u16) -> Self {
        Self {
            resolver: StyleResolver::new(config),
            bullet: &config.layout.bullet,
            next_row: row.max(1),
            column: column.max(1),
        }
    }

    /// The row the next block will be written to.
    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    /// Render `blocks` into `sink`, returning the number of rows written.
    ///
    /// Fails without writing anything more once a block would land outside
    /// the worksheet.
    pub fn render<S: Sink>(
        &mut self,
        blocks: BlockAccumulator,
        sink: &mut S,
    ) -> Result<usize, Error> {
        if self.column > MAX_COLUMN {
            return Err(Error::Layout(format!(
                "column {} is past the last worksheet column {}",
                self.column, MAX_COLUMN
            )));
        }

        let mut written = 0;
        for block in blocks {
            let row = self.allocate_row()?;
            log::trace!("Row {}: {:?}", row, block.styles);
            let cell = sink.cell_at(row, self.column);
            self.render_cell(cell, block, sink);
            written += 1;
        }
        Ok(written)
    }

    fn allocate_row(&mut self) -> Result<u32, Error> {
        let row = self.next_row;
        if row > MAX_ROW {
            return Err(Error::Layout(format!(
                "row {} is past the last worksheet row {}",
                row, MAX_ROW
            )));
        }
        self.next_row = row + 1;
        Ok(row)
    }

    fn render_cell<S: Sink>(&self, cell: CellRef, block: BlockElement, sink: &mut S) {
        let mut runs = Vec::with_capacity(block.content.len() + 1);
        if block.has_style(BlockStyle::ListItem) {
            runs.push(Run {
                text: self.bullet.to_string(),
                font: None,
            });
        }
        for element in block.content {
            let font = self.resolver.resolve_inline(&element.markers);
            runs.push(Run {
                text: element.text,
                font,
            });
        }
        sink.set_rich_text(cell, runs);

        let style = self.resolver.resolve(&block.styles);
        if let Some(font) = style.font {
            sink.set_font(cell, font);
        }
        if let Some(alignment) = style.alignment {
            sink.set_alignment(cell, alignment);
        }
        if let Some(fill) = style.fill {
            sink.set_fill(cell, fill);
        }
    }
}
