//! CLI tool for twbdoc - documents a Tableau workbook
//!
//! Usage:
//!   twbdoc_cli <input.twb>                  # XLSX + DOCX next to the input, overview on stdout
//!   twbdoc_cli <input.twb> -f json -o out/  # JSON model into out/
//!   RUST_LOG=debug twbdoc_cli <input.twb>   # trace resolution decisions

#![allow(clippy::exit)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use twbdoc::export::{documentation_path, export_docx, export_xlsx, ExportOptions};
use twbdoc::summary::render_overview;
use twbdoc::{parse_twb, ParsedWorkbook, TwbdocError};

#[derive(Debug, Parser)]
#[command(
    name = "twbdoc_cli",
    version,
    about = "Generate documentation for a Tableau workbook (.twb)"
)]
struct Cli {
    /// Tableau workbook file (.twb)
    input: PathBuf,

    /// Directory for generated files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Which documentation to generate
    #[arg(short, long, value_enum, default_value_t = OutputFormat::All)]
    format: OutputFormat,

    /// Do not print the workbook overview to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Title of the narrative document
    #[arg(long, default_value = "Tableau Workbook Documentation")]
    title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Spreadsheet, one sheet per dashboard
    Xlsx,
    /// Word document with annotation checklists
    Docx,
    /// Full parsed model as JSON
    Json,
    /// Overview on stdout only
    Summary,
    /// XLSX and DOCX
    All,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        if e.is_invalid_input() {
            eprintln!(
                "Error parsing the XML file. Please ensure it's a valid .twb file and not corrupted."
            );
            eprintln!("Details: {e}");
        } else {
            eprintln!("An unexpected error occurred: {e}");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), TwbdocError> {
    let data = fs::read(&cli.input)?;
    let workbook = parse_twb(&data)?;
    eprintln!("Parsed '{}'", cli.input.display());

    for warning in &workbook.warnings {
        eprintln!("Warning: {warning}");
    }
    if workbook.dashboards.is_empty() {
        eprintln!("Warning: No dashboards found in the workbook");
    }

    if !cli.quiet || cli.format == OutputFormat::Summary {
        let mut stdout = io::stdout().lock();
        stdout.write_all(render_overview(&workbook).as_bytes())?;
        stdout.flush()?;
    }

    let output_dir = cli.output_dir.as_deref();
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    match cli.format {
        OutputFormat::Xlsx => write_xlsx(&cli.input, output_dir, &workbook)?,
        OutputFormat::Docx => write_docx(cli, output_dir, &workbook)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&workbook)?;
            let path = documentation_path(&cli.input, output_dir, "json");
            write_output(&path, json.as_bytes())?;
        }
        OutputFormat::Summary => {}
        OutputFormat::All => {
            write_xlsx(&cli.input, output_dir, &workbook)?;
            write_docx(cli, output_dir, &workbook)?;
        }
    }
    Ok(())
}

fn write_xlsx(
    input: &Path,
    output_dir: Option<&Path>,
    workbook: &ParsedWorkbook,
) -> Result<(), TwbdocError> {
    let bytes = export_xlsx(&workbook.dashboards)?;
    write_output(&documentation_path(input, output_dir, "xlsx"), &bytes)
}

fn write_docx(
    cli: &Cli,
    output_dir: Option<&Path>,
    workbook: &ParsedWorkbook,
) -> Result<(), TwbdocError> {
    let options = ExportOptions {
        title: cli.title.clone(),
    };
    let bytes = export_docx(&workbook.dashboards, &options)?;
    write_output(&documentation_path(&cli.input, output_dir, "docx"), &bytes)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), TwbdocError> {
    fs::write(path, bytes)?;
    eprintln!("Written: {}", path.display());
    Ok(())
}
