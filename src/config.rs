use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::grid::{MAX_COLUMN, MAX_ROW};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub headings: HeadingsConfig,
    pub links: LinksConfig,
    pub quote: QuoteConfig,
    pub rule: RuleConfig,
    pub layout: LayoutConfig,
}

/// A `#RRGGBB` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u32);

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid colour `{}`, expected #RRGGBB", value));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|e| format!("invalid colour `{}`: {}", value, e))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub name: String,
    pub size: f64,
    pub family: u8,
    pub mono_name: String,
    pub mono_family: u8,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            family: 2,
            mono_name: "Consolas".to_string(),
            mono_family: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeadingsConfig {
    pub sizes: [f64; 6],
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            sizes: [26.0, 22.0, 18.0, 16.0, 14.0, 12.0],
        }
    }
}

impl HeadingsConfig {
    /// Font size for a heading level, clamped to h1..h6.
    pub fn size_for_level(&self, level: u8) -> f64 {
        let idx = usize::from(level.clamp(1, 6)) - 1;
        self.sizes[idx]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: Rgb,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: Rgb(0x382DA0),
            underline: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuoteConfig {
    pub fill: Rgb,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            fill: Rgb(0xA09BBB),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    pub fill: Rgb,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { fill: Rgb(0x000000) }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub indent_step: u8,
    pub bullet: String,
    /// 1-based row of the first block
    pub start_row: u32,
    /// 1-based column all blocks are written to
    pub column: u16,
    pub column_width: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_step: 2,
            bullet: "• ".to_string(),
            start_row: 1,
            column: 1,
            column_width: None,
        }
    }
}

impl Config {
    /// The settings bundled with the crate.
    pub fn compiled_default() -> Self {
        match toml::from_str(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Bundled config rejected, using built-in defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from a TOML file. Keys missing from the file keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|message| Error::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Check values that parse but cannot be laid out on a worksheet.
    pub fn validate(&self) -> Result<(), String> {
        let layout = &self.layout;
        if !(1..=MAX_ROW).contains(&layout.start_row) {
            return Err(format!(
                "layout.start_row must be between 1 and {}, got {}",
                MAX_ROW, layout.start_row
            ));
        }
        if !(1..=MAX_COLUMN).contains(&layout.column) {
            return Err(format!(
                "layout.column must be between 1 and {}, got {}",
                MAX_COLUMN, layout.column
            ));
        }
        if let Some(size) = self.headings.sizes.iter().find(|size| **size <= 0.0) {
            return Err(format!("headings.sizes must be positive, got {}", size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compiled_default_matches_builtin_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[layout]\nstart_row = 5\n").unwrap();
        assert_eq!(config.layout.start_row, 5);
        assert_eq!(config.layout.column, 1);
        assert_eq!(config.font, FontConfig::default());
    }

    #[test]
    fn parses_colours() {
        let config: Config = toml::from_str("[quote]\nfill = \"#00ff80\"\n").unwrap();
        assert_eq!(config.quote.fill, Rgb(0x00FF80));
    }

    #[test]
    fn rejects_malformed_colours() {
        assert!(toml::from_str::<Config>("[links]\ncolor = \"blue\"\n").is_err());
        assert!(toml::from_str::<Config>("[links]\ncolor = \"#12345\"\n").is_err());
    }

    #[test]
    fn heading_size_is_clamped() {
        let headings = HeadingsConfig::default();
        assert_eq!(headings.size_for_level(1), 26.0);
        assert_eq!(headings.size_for_level(0), 26.0);
        assert_eq!(headings.size_for_level(9), 12.0);
    }

    #[test]
    fn compiled_default_is_valid() {
        assert_eq!(Config::compiled_default().validate(), Ok(()));
    }

    #[test]
    fn load_rejects_out_of_range_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("layout.toml");

        std::fs::write(&path, "[layout]\nstart_row = 4294967295\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains("start_row"));

        std::fs::write(&path, "[layout]\ncolumn = 0\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("layout.column"));

        std::fs::write(&path, "[layout]\nstart_row = 1048576\ncolumn = 16384\n").unwrap();
        assert!(Config::load(&path).is_ok());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
