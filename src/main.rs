// reset; cargo run -- --excel-file ./data/Combined_Data_File.xlsx
// reset; cargo run -- --excel-file ./data/Combined_Data_File.xlsx --output ./out/report.xlsx --stats-file ./out/stats.json

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use validator_lib::{
    ERRORS_LOG_FILE, ReportGenerator,
    upload::{REPORT_FILE_NAME, check_file_name, error_body},
    utils::write_error_to_log,
    workspace::Workspace,
};

#[derive(Parser)]
#[command(name = "compute-validator")]
#[command(about = "Audit the Compute sheet of a Combined Data File and build the missing-data report")]
#[command(version)]
struct Args {
    /// Path to the Combined Data File (.xlsx or .xls) holding the README-Glossary and Compute sheets
    #[arg(short, long)]
    excel_file: PathBuf,

    /// Where to write the report workbook
    #[arg(short, long, default_value = REPORT_FILE_NAME)]
    output: PathBuf,

    /// Optional path to also write the report statistics as JSON
    #[arg(long)]
    stats_file: Option<PathBuf>,
}

fn main() {
    let arguments = Args::parse();

    if let Err(e) = run(&arguments) {
        let message = format!("{e:#}");
        write_error_to_log("Compute Validation Error", &message);
        eprintln!("{}", error_body(&message));
        eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
        std::process::exit(1);
    }
}

fn run(arguments: &Args) -> anyhow::Result<()> {
    let file_name = arguments
        .excel_file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    check_file_name(file_name).map_err(anyhow::Error::msg)?;

    // The workspace and everything staged in it is removed when it goes out of scope
    let workspace = Workspace::acquire()?;
    let staged_input = workspace.stage_input(&arguments.excel_file)?;
    let bytes = std::fs::read(&staged_input)
        .with_context(|| format!("Failed to read {}", staged_input.display()))?;

    let outcome = ReportGenerator::default().run(&bytes);
    let (Some(report), Some(statistics)) = (outcome.report, outcome.statistics) else {
        return Err(anyhow::anyhow!(outcome.message));
    };

    workspace.publish_report(&report, &arguments.output)?;
    println!("✅ {}", outcome.message);
    println!("✅ Report written to: {}", arguments.output.display());

    let stats_json = serde_json::to_string_pretty(&statistics)?;
    if let Some(stats_file) = &arguments.stats_file {
        write_stats(stats_file, &stats_json)?;
        println!("✅ Statistics written to: {}", stats_file.display());
    }
    println!("{stats_json}");

    Ok(())
}

fn write_stats(path: &Path, stats_json: &str) -> anyhow::Result<()> {
    std::fs::write(path, stats_json)
        .with_context(|| format!("Failed to write statistics to {}", path.display()))
}
