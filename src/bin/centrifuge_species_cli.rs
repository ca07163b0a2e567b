use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use centrifuge_species::{summarise_species, InputPaths, MISSING_NODES};

/// Summarise a Centrifuge per-read classification report at the species rank
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// nodes filepath (generated by centrifuge-inspect --taxonomy-tree)
    #[arg(long = "nodes_fp", value_parser = existing_file)]
    nodes_fp: PathBuf,

    /// names filepath (generated by centrifuge-inspect --name-table)
    #[arg(long = "names_fp", value_parser = existing_file)]
    names_fp: PathBuf,

    /// Centrifuge raw input filepath
    #[arg(long = "centrifuge_fp", value_parser = existing_file)]
    centrifuge_fp: PathBuf,

    /// Write the table here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// No progress spinner, warnings and errors only
    #[arg(short, long)]
    quiet: bool,
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("Input file {} does not exist", path.display()))
    }
}

fn spinner(quiet: bool, color: &str, msg: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&format!("{{spinner:.{color}}} {{msg}}"))
    {
        spinner.set_style(style);
    }
    spinner.set_message(msg);
    spinner
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let paths = InputPaths {
        nodes: &args.nodes_fp,
        names: &args.names_fp,
        centrifuge: &args.centrifuge_fp,
    };

    // 1. Load taxonomy and summarise the report
    let progress = spinner(args.quiet, "green", "Summarising reads to species...");
    let summary = summarise_species(&paths, MISSING_NODES)?;
    progress.finish_with_message(format!(
        "{} reads, {} species.",
        summary.total_reads,
        summary.rows.len()
    ));

    // 2. Write the table
    let progress = spinner(args.quiet, "yellow", "Writing species table...");
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            summary.write_table(&mut out)?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            summary.write_table(&mut out)?;
            out.flush()?;
        }
    }
    progress.finish_and_clear();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
