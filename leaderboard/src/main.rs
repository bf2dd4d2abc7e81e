use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app_utils::{init_tracing, Config};
use clap::Parser;
use mark_records::file_selector::MarkFileSelector;
use mark_records::mark_files::{list_mark_files, MarkFile};
use mark_records::record::StudentRecord;
use mark_records::source::MarkSource;
use rubric::grade::Breakdown;
use rubric::report::{Leaderboard, ReportFormat};
use tracing::{debug, info, warn};

/// Grades a file of summative marks and writes the class leaderboard.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Mark file to grade. If omitted, one is chosen from the marks directory.
    file: Option<PathBuf>,

    /// Directory searched for `.mark` files [env: MARKS_DIR] [default: marks]
    #[arg(long)]
    marks_dir: Option<PathBuf>,

    /// Mark file to use from the marks directory, by number or file name. Prompts if omitted.
    #[arg(short, long)]
    select: Option<String>,

    /// Where to write the report, `-` for stdout [env: OUTPUT_PATH] [default: output.txt]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format: `text` or `csv`
    #[arg(short, long, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Print every loaded record and its grade breakdown to stderr
    #[arg(long)]
    show: bool,
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let cli = Cli::parse();
    init_tracing()?;
    debug!(?cli, ?config, "initialized");

    let marks_dir = cli.marks_dir.clone().unwrap_or(config.marks_dir);
    let output = cli.output.clone().unwrap_or(config.output_path);

    let records = match choose_mark_file(&cli, &marks_dir)? {
        Some(file) => file.load_records()?,
        None => Vec::new(),
    };

    if cli.show {
        print_loaded(&records).context("could not print loaded records")?;
    }

    let leaderboard = rubric::leaderboard(records);
    write_report(&leaderboard, cli.format, &output)
        .with_context(|| format!("could not write report to {}", output.display()))?;
    info!(num_students = leaderboard.len(), output = %output.display(), "wrote leaderboard");

    Ok(())
}

/// `None` means the selection did not match any file, which gives an empty report.
fn choose_mark_file(cli: &Cli, marks_dir: &Path) -> Result<Option<MarkFile>> {
    if let Some(path) = &cli.file {
        return Ok(Some(MarkFile::new(path.clone())));
    }

    let files = list_mark_files(marks_dir)?;
    let selector = match &cli.select {
        Some(selector) => selector.clone(),
        None => prompt_selection(&files)?,
    };
    let selector = MarkFileSelector::new(selector);

    match selector.select_from(&files) {
        Some(file) => {
            info!(%file, "selected mark file");
            Ok(Some(file.clone()))
        }
        None => {
            warn!(selector = selector.as_str(), num_files = files.len(), "invalid selection");
            Ok(None)
        }
    }
}

fn prompt_selection(files: &[MarkFile]) -> Result<String> {
    let mut stderr = io::stderr().lock();
    for (number, file) in (1..).zip(files) {
        writeln!(stderr, "{number}. {file}")?;
    }
    writeln!(stderr, "Select a file by typing the number:")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("could not read selection")?;
    Ok(line)
}

fn print_loaded(records: &[StudentRecord]) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    for record in records {
        writeln!(stderr, "{record}")?;
        writeln!(stderr, "{}", Breakdown::of(record))?;
        writeln!(stderr)?;
    }
    Ok(())
}

fn write_report(leaderboard: &Leaderboard, format: ReportFormat, output: &Path) -> Result<()> {
    if output == Path::new("-") {
        let mut stdout = io::stdout().lock();
        leaderboard.write(format, &mut stdout)?;
        stdout.flush()?;
        Ok(())
    } else {
        leaderboard.write_to_path(format, output)
    }
}
