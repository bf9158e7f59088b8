use std::collections::BTreeSet;

use crate::block::{BlockStyle, Marker};
use crate::config::{Config, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// The workbook's default text colour
    Automatic,
    Rgb(Rgb),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub family: u8,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    pub indent: u8,
}

/// Solid background fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub color: Rgb,
}

/// Cell-wide formatting for one block. `None` leaves the sheet default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub font: Option<Font>,
    pub alignment: Option<Alignment>,
    pub fill: Option<Fill>,
}

/// Maps block styles and inline markers onto fonts, alignment and fills.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    config: &'a Config,
}

impl<'a> StyleResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolve a block's style list, outermost first. Later headings replace
    /// the font; indentation accumulates; the first fill wins.
    pub fn resolve(&self, styles: &[BlockStyle]) -> CellStyle {
        let step = self.config.layout.indent_step;
        let mut cell = CellStyle::default();

        for style in styles {
            match *style {
                BlockStyle::Heading(level) => {
                    cell.font = Some(self.heading_font(level));
                }
                BlockStyle::List | BlockStyle::Link => {
                    indent(&mut cell, step);
                }
                BlockStyle::Quote => {
                    indent(&mut cell, step);
                    cell.fill.get_or_insert(Fill {
                        color: self.config.quote.fill,
                    });
                }
                BlockStyle::Rule => {
                    cell.fill.get_or_insert(Fill {
                        color: self.config.rule.fill,
                    });
                }
                BlockStyle::ListItem | BlockStyle::Code => {}
            }
        }

        cell
    }

    /// Font for a rich-text run, or `None` for unmarked text.
    pub fn resolve_inline(&self, markers: &BTreeSet<Marker>) -> Option<Font> {
        if markers.is_empty() {
            return None;
        }

        let font = &self.config.font;
        let links = &self.config.links;
        let code = markers.contains(&Marker::Code);
        let link = markers.contains(&Marker::Link);

        Some(Font {
            name: if code {
                font.mono_name.clone()
            } else {
                font.name.clone()
            },
            size: font.size,
            family: if code { font.mono_family } else { font.family },
            bold: markers.contains(&Marker::Bold),
            italic: markers.contains(&Marker::Italic),
            underline: link && links.underline,
            strike: markers.contains(&Marker::Strike),
            color: if link {
                Color::Rgb(links.color)
            } else {
                Color::Automatic
            },
        })
    }

    fn heading_font(&self, level: u8) -> Font {
        Font {
            name: self.config.font.name.clone(),
            size: self.config.headings.size_for_level(level),
            family: self.config.font.family,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            color: Color::Automatic,
        }
    }
}

fn indent(cell: &mut CellStyle, step: u8) {
    let alignment = cell.alignment.get_or_insert_with(Alignment::default);
    alignment.indent = alignment.indent.saturating_add(step);
}
