use std::path::PathBuf;

use clap::Parser;

use mdsheet::Config;

#[derive(Parser)]
#[command(name = "mdsheet")]
#[command(version, about = "Convert Markdown files to Excel worksheets")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output workbook (defaults to input name with .xlsx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML file overriding the default styling and layout
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First row to write to (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(mdsheet::MAX_ROW)))]
    row: Option<u32>,

    /// Column to write to (1-based)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=i64::from(mdsheet::MAX_COLUMN)))]
    column: Option<u16>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            log::debug!("Using config from: {}", path.display());
            match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            log::debug!("Using default config");
            Config::compiled_default()
        }
    };
    if let Some(row) = cli.row {
        config.layout.start_row = row;
    }
    if let Some(column) = cli.column {
        config.layout.column = column;
    }

    match mdsheet::convert(&cli.input, cli.output.as_deref(), &config) {
        Ok(output) => println!("Created {}", output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
