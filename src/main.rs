//! koxcbz CLI - batch conversion of Kox.moe ePub archives to CBZ

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use koxcbz::batch::{self, BatchConfig, ConversionReport, ProgressReporter};

#[derive(Parser)]
#[command(name = "koxcbz")]
#[command(version)]
#[command(about = "Convert Kox.moe ePub files to CBZ format", long_about = None)]
#[command(after_help = "\
Examples:
  koxcbz book.epub                 Convert a single file
  koxcbz book??.epub               Convert book01.epub, book02.epub, ...
  koxcbz \"book*.epub\"              Convert all matching files
  koxcbz book.epub output/         Specify an output directory
  koxcbz \"book*.epub\" -j 4         Use 4 parallel workers
  koxcbz \"book*.epub\" -j -1        Use all CPU cores

Wildcards:
  ?  Matches a numeric digit (?? for 01-99, ??? for 001-999)
  *  Matches any character sequence (standard glob pattern)")]
struct Cli {
    /// Path to ePub file(s); supports ? and * wildcards
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output directory for CBZ files (default: same as input)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of parallel jobs; use -1 for all CPU cores
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    jobs: i32,
}

/// Renders batch progress on the console: a found-files banner and a
/// per-file progress bar.
struct ConsoleReporter {
    bar: ProgressBar,
    jobs: usize,
}

impl ConsoleReporter {
    fn new(jobs: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {msg:<40} [{bar:30.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("valid progress template")
            .progress_chars("=>-"),
        );
        Self { bar, jobs }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for ConsoleReporter {
    fn batch_started(&self, total: usize) {
        if total == 0 {
            return;
        }
        let workers = if self.jobs > 1 {
            format!(" (using {} workers)", self.jobs)
        } else {
            String::new()
        };
        println!(
            "{}",
            format!("Found {} ePub file(s) to process{}", total, workers)
                .green()
                .bold()
        );
        self.bar.set_length(total as u64);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn conversion_started(&self, source: &std::path::Path) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(format!("Converting: {}", name));
    }

    fn conversion_finished(&self, _report: &ConversionReport) {
        self.bar.inc(1);
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Prints the per-file result table, sorted by input name upstream.
fn print_results(reports: &[ConversionReport]) {
    let input_header = "Input File";
    let status_header = "Status";
    let output_header = "Output File";

    let input_width = reports
        .iter()
        .map(|r| file_name(&r.source).chars().count())
        .chain([input_header.len()])
        .max()
        .unwrap_or(input_header.len());

    // Pad before colorizing; ANSI escapes would otherwise count against
    // the column width.
    println!();
    println!(
        "{}  {}  {}",
        format!("{:<input_width$}", input_header).cyan().bold(),
        format!("{:<9}", status_header).cyan().bold(),
        output_header.cyan().bold(),
    );
    for report in reports {
        let input = format!("{:<input_width$}", file_name(&report.source));
        match &report.outcome {
            Ok(output) => println!(
                "{}  {}  {}",
                input,
                format!("{:<9}", "Success").green().bold(),
                file_name(output).green(),
            ),
            Err(_) => println!("{}  {}", input, format!("{:<9}", "Failed").red().bold()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    println!("{}", "koxcbz".cyan().bold());
    println!("Convert Kox.moe ePub files to CBZ format\n");

    let mut builder = BatchConfig::builder();
    builder.pattern(cli.input.clone()).jobs(cli.jobs);
    if let Some(dir) = cli.output_dir {
        builder.destination(dir);
    }
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let reporter = ConsoleReporter::new(config.effective_jobs());
    let summary = match batch::run_batch(&config, &reporter) {
        Ok(summary) => summary,
        Err(e) => {
            reporter.finish();
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    reporter.finish();

    if summary.reports.is_empty() {
        eprintln!(
            "{} No ePub files found matching: {}",
            "Error:".red().bold(),
            cli.input
        );
        return ExitCode::FAILURE;
    }

    print_results(&summary.reports);

    println!();
    if summary.failed == 0 {
        println!(
            "{}",
            format!("All {} file(s) converted successfully!", summary.succeeded)
                .green()
                .bold()
        );
        ExitCode::SUCCESS
    } else {
        println!("{}", "Conversion complete:".yellow().bold());
        println!("  {}", format!("Success: {}", summary.succeeded).green());
        println!("  {}", format!("Failed: {}", summary.failed).red());
        ExitCode::FAILURE
    }
}
