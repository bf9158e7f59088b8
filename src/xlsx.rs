use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, FormatPattern, FormatUnderline, Workbook, Worksheet};
use tempfile::NamedTempFile;

use crate::error::Error;
use crate::grid::{CellRef, Run, Sink};
use crate::style::{Alignment, Color, Fill, Font};

/// Content and cell-wide formatting of one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub runs: Vec<Run>,
    pub font: Option<Font>,
    pub alignment: Option<Alignment>,
    pub fill: Option<Fill>,
}

impl Cell {
    /// Plain text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// An in-memory worksheet that serialises to `.xlsx`.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: BTreeMap<CellRef, Cell>,
    column_widths: BTreeMap<u16, f64>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, row: u32, column: u16) -> Option<&Cell> {
        self.cells.get(&CellRef { row, column })
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        self.cells.iter().map(|(cell, content)| (*cell, content))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set the width, in characters, of a 1-based column.
    pub fn set_column_width(&mut self, column: u16, width: f64) {
        self.column_widths.insert(column, width);
    }

    /// Build a workbook with this sheet as its only worksheet.
    pub fn to_workbook(&self) -> Result<Workbook, Error> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (&column, &width) in &self.column_widths {
            worksheet.set_column_width(column.saturating_sub(1), width)?;
        }
        for (cell, content) in &self.cells {
            write_cell(worksheet, *cell, content)?;
        }

        Ok(workbook)
    }

    /// Serialise to `.xlsx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(self.to_workbook()?.save_to_buffer()?)
    }

    fn entry(&mut self, cell: CellRef) -> &mut Cell {
        self.cells.entry(cell).or_default()
    }
}

impl Sink for Sheet {
    fn cell_at(&mut self, row: u32, column: u16) -> CellRef {
        let cell = CellRef { row, column };
        self.entry(cell);
        cell
    }

    fn set_rich_text(&mut self, cell: CellRef, runs: Vec<Run>) {
        self.entry(cell).runs = runs;
    }

    fn set_font(&mut self, cell: CellRef, font: Font) {
        self.entry(cell).font = Some(font);
    }

    fn set_alignment(&mut self, cell: CellRef, alignment: Alignment) {
        self.entry(cell).alignment = Some(alignment);
    }

    fn set_fill(&mut self, cell: CellRef, fill: Fill) {
        self.entry(cell).fill = Some(fill);
    }

    /// Write the workbook next to `path` and move it into place, so a failed
    /// save leaves no partial file behind.
    fn save(&mut self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        let write_err = |source: std::io::Error| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
        file.write_all(&bytes).map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;

        log::debug!("Saved {} cells to {}", self.cells.len(), path.display());
        Ok(())
    }
}

fn write_cell(worksheet: &mut Worksheet, cell: CellRef, content: &Cell) -> Result<(), Error> {
    let row = cell.row.saturating_sub(1);
    let column = cell.column.saturating_sub(1);

    let runs: Vec<&Run> = content.runs.iter().filter(|r| !r.text.is_empty()).collect();
    let wrap = runs.iter().any(|r| r.text.contains('\n'));

    match runs.as_slice() {
        [] => {
            worksheet.write_blank(row, column, &cell_format(content, None, wrap))?;
        }
        // A single run, or runs that all inherit the cell font, need no rich
        // text: the run font (if any) can live on the cell itself.
        [run] => {
            let format = cell_format(content, run.font.as_ref(), wrap);
            worksheet.write_string_with_format(row, column, &run.text, &format)?;
        }
        _ if runs.iter().all(|r| r.font.is_none()) => {
            let text: String = runs.iter().map(|r| r.text.as_str()).collect();
            let format = cell_format(content, None, wrap);
            worksheet.write_string_with_format(row, column, text, &format)?;
        }
        _ => {
            let formats: Vec<Format> = runs
                .iter()
                .map(|r| match r.font.as_ref().or(content.font.as_ref()) {
                    Some(font) => apply_font(Format::new(), font),
                    None => Format::new(),
                })
                .collect();
            let segments: Vec<(&Format, &str)> = formats
                .iter()
                .zip(&runs)
                .map(|(format, run)| (format, run.text.as_str()))
                .collect();
            worksheet.write_rich_string_with_format(
                row,
                column,
                &segments,
                &cell_format(content, None, wrap),
            )?;
        }
    }

    Ok(())
}

/// Cell-wide format; `font` overrides the cell's own font.
fn cell_format(content: &Cell, font: Option<&Font>, wrap: bool) -> Format {
    let mut format = Format::new();
    if let Some(font) = font.or(content.font.as_ref()) {
        format = apply_font(format, font);
    }
    if let Some(alignment) = content.alignment {
        format = format.set_indent(alignment.indent);
    }
    if let Some(fill) = content.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(fill.color.0);
    }
    if wrap {
        format = format.set_text_wrap();
    }
    format
}

fn apply_font(format: Format, font: &Font) -> Format {
    let mut format = format
        .set_font_name(font.name.as_str())
        .set_font_size(font.size)
        .set_font_family(font.family);
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if font.strike {
        format = format.set_font_strikethrough();
    }
    if let Color::Rgb(rgb) = font.color {
        format = format.set_font_color(rgb.0);
    }
    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use tempfile::TempDir;

    fn sample_sheet() -> Sheet {
        let mut sheet = Sheet::new();
        let cell = sheet.cell_at(1, 1);
        sheet.set_rich_text(
            cell,
            vec![
                Run {
                    text: "plain ".to_string(),
                    font: None,
                },
                Run {
                    text: "bold".to_string(),
                    font: Some(Font {
                        name: "Calibri".to_string(),
                        size: 11.0,
                        family: 2,
                        bold: true,
                        italic: false,
                        underline: false,
                        strike: false,
                        color: Color::Automatic,
                    }),
                },
            ],
        );
        let rule = sheet.cell_at(2, 1);
        sheet.set_rich_text(
            rule,
            vec![Run {
                text: String::new(),
                font: None,
            }],
        );
        sheet.set_fill(rule, Fill { color: Rgb(0) });
        sheet
    }

    #[test]
    fn cell_at_creates_empty_cell() {
        let mut sheet = Sheet::new();
        sheet.cell_at(4, 2);
        assert_eq!(sheet.cell(4, 2), Some(&Cell::default()));
        assert_eq!(sheet.cell(1, 1), None);
    }

    #[test]
    fn serialises_to_zip_container() {
        let bytes = sample_sheet().to_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn save_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");

        sample_sheet().save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn failed_save_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let err = sample_sheet().save(&path).unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
