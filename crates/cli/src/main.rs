//! # pdftab-cli
//!
//! Command-line interface for pdftab: PDF tables in, nested JSON, Parquet
//! and answers out.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pdftab_chat::{AgentConfig, Catalog, ChatCompletionsAgent, Session};
use pdftab_core::{reconstruct, CellGrid};
use pdftab_pdf::source::GridSource;
use pdftab_pdf::{
    extract_document, pdf_stem, write_nested_json_to, JsonGridSource, PdfGridSource, PdfOptions,
};
use pdftab_sheet::{MissingPolicy, NormalizeOptions, Normalizer, NumberLocale, Translations};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// pdftab - Turn merged-header PDF tables into queryable data
#[derive(Parser)]
#[command(name = "pdftab")]
#[command(author, version, about = "Extract merged-header tables from PDFs and query them", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the nested table of every PDF page as <stem>_page<N>.json
    Extract {
        /// PDF document to read
        pdf_file_path: PathBuf,

        /// Folder for the JSON files
        output_folder: PathBuf,

        /// Read pre-extracted page grids from this JSON file instead of the PDF
        #[arg(long, value_name = "FILE")]
        grids: Option<PathBuf>,

        /// Only read these pages (1-based, inclusive)
        #[arg(long, value_name = "START-END", value_parser = parse_page_range, conflicts_with = "grids")]
        pages: Option<(usize, usize)>,
    },

    /// Print the nested table of one grid (a JSON array of rows)
    Reconstruct {
        #[arg(value_name = "GRID_JSON")]
        grid: PathBuf,
    },

    /// Flatten, type and translate a nested table JSON file
    Normalize {
        /// Nested table written by `extract`
        json_path: PathBuf,

        /// Parquet file to write; prints a preview when omitted
        output_path: Option<PathBuf>,

        /// Locale for grouped integers
        #[arg(long, env = "PDFTAB_LOCALE", default_value = "en_US.UTF-8")]
        locale: String,

        /// YAML dictionaries to use instead of the builtin ones
        #[arg(long, value_name = "FILE", conflicts_with = "no_translate")]
        translations: Option<PathBuf>,

        /// Keep headers and labels untranslated
        #[arg(long)]
        no_translate: bool,

        /// What to do with labels missing from the dictionaries
        #[arg(long, value_enum, default_value_t = MissingArg::Warn)]
        missing: MissingArg,

        /// Collapse every header level instead of just the first
        #[arg(long)]
        deep: bool,

        /// Preview format (json, csv, table)
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: OutputFormat,
    },

    /// Ask questions about the datasets in a catalog
    Chat {
        /// YAML dataset catalog
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Keep each dataset's trailing total row
        #[arg(long)]
        keep_total_row: bool,
    },
}

/// Output format for previews.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum MissingArg {
    Keep,
    Warn,
    Null,
    Error,
}

impl From<MissingArg> for MissingPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Keep => MissingPolicy::Keep,
            MissingArg::Warn => MissingPolicy::Warn,
            MissingArg::Null => MissingPolicy::Null,
            MissingArg::Error => MissingPolicy::Error,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; usage errors exit 1
            let code = i32::from(e.use_stderr());
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Extract {
            pdf_file_path,
            output_folder,
            grids,
            pages,
        } => run_extract(&pdf_file_path, &output_folder, grids, pages),
        Command::Reconstruct { grid } => run_reconstruct(&grid),
        Command::Normalize {
            json_path,
            output_path,
            locale,
            translations,
            no_translate,
            missing,
            deep,
            format,
        } => {
            let translations = if no_translate {
                Translations::empty()
            } else if let Some(path) = translations {
                Translations::from_path(&path)
                    .with_context(|| format!("Failed to load translations: {}", path.display()))?
            } else {
                Translations::builtin()?
            };
            let options = NormalizeOptions {
                locale: NumberLocale::parse(&locale)?,
                translations,
                missing_policy: missing.into(),
                deep_flatten: deep,
            };
            run_normalize(&json_path, output_path.as_deref(), options, format)
        }
        Command::Chat {
            catalog,
            keep_total_row,
        } => run_chat(&catalog, !keep_total_row).await,
    }
}

/// Parse a `START-END` page range.
fn parse_page_range(s: &str) -> Result<(usize, usize), String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{s}'"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start page '{start}'"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end page '{end}'"))?;
    if start == 0 || end < start {
        return Err(format!("invalid page range {start}-{end}"));
    }
    Ok((start, end))
}

fn run_extract(
    pdf_file_path: &Path,
    output_folder: &Path,
    grids: Option<PathBuf>,
    pages: Option<(usize, usize)>,
) -> Result<()> {
    std::fs::create_dir_all(output_folder)
        .with_context(|| format!("Failed to create folder: {}", output_folder.display()))?;

    let source: Box<dyn GridSource> = match grids {
        Some(path) => Box::new(JsonGridSource::new(path)),
        None => Box::new(PdfGridSource::new(
            pdf_file_path,
            PdfOptions {
                page_range: pages,
                ..PdfOptions::default()
            },
        )),
    };

    let stem = pdf_stem(pdf_file_path);
    let report = extract_document(source.as_ref(), &stem, output_folder)?;

    for path in &report.written {
        println!("{} {}", "Wrote".green(), path.display());
    }
    if !report.skipped.is_empty() {
        println!("No table on pages {:?}", report.skipped);
    }
    for (page, err) in &report.failed {
        eprintln!("{} page {page}: {err}", "Error:".red().bold());
    }

    if !report.is_success() {
        bail!("{} page(s) failed", report.failed.len());
    }
    Ok(())
}

fn run_reconstruct(grid_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(grid_path)
        .with_context(|| format!("Failed to read file: {}", grid_path.display()))?;
    let grid: CellGrid = serde_json::from_str(&content)
        .with_context(|| format!("Invalid grid: {}", grid_path.display()))?;
    let nested = reconstruct(&grid)?;

    let mut stdout = std::io::stdout().lock();
    write_nested_json_to(&nested, &mut stdout)?;
    writeln!(stdout)?;
    Ok(())
}

fn run_normalize(
    json_path: &Path,
    output_path: Option<&Path>,
    options: NormalizeOptions,
    format: OutputFormat,
) -> Result<()> {
    let sheet = Normalizer::new(options)
        .normalize_file(json_path)
        .with_context(|| format!("Failed to normalize {}", json_path.display()))?;

    if let Some(path) = output_path {
        println!("Writing to {}...", path.display());
        sheet.save_as_parquet(path)?;
        return Ok(());
    }

    match format {
        OutputFormat::Table => println!("{}", sheet.to_pretty_string()?),
        OutputFormat::Csv => sheet.write_csv(std::io::stdout().lock())?,
        OutputFormat::Json => {
            sheet.write_json(std::io::stdout().lock(), true)?;
            println!();
        }
    }
    Ok(())
}

/// Run the chat REPL.
async fn run_chat(catalog_path: &Path, trim_total_row: bool) -> Result<()> {
    let catalog = Catalog::load(catalog_path)?;
    let datasets = catalog.load_datasets(trim_total_row)?;
    let agent = ChatCompletionsAgent::from_env(AgentConfig::default())?;
    let mut session = Session::new(agent, datasets);

    println!("{}", catalog.title.cyan().bold());
    println!("{}", catalog.disclaimer().dimmed());
    println!(
        "Type {} to start over, {} to exit\n",
        ":reset".yellow(),
        ":quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "ask> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" | ":exit" => break,
                        ":reset" => {
                            session.reset();
                            println!("{}", "Conversation cleared".yellow());
                        }
                        _ => println!("{} Unknown command: {}", "Error:".red().bold(), line),
                    }
                    continue;
                }

                let reply = session.ask(line).await;
                if reply.failed {
                    println!("{}\n", reply.text.red());
                } else {
                    println!("{}\n", reply.text);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("pdftab");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}
