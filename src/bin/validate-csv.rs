use std::path::{self, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "validate-csv")]
#[command(about = "Check a packet-capture CSV export against the analytics import layout")]
struct Args {
    /// CSV file to validate
    #[arg(default_value = "output/captured_packets.csv")]
    path: PathBuf,

    /// Number of row issues to print before summarizing the rest
    #[arg(long, default_value_t = 10)]
    max_issues: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // the report goes to stdout; diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    println!("=== Packet Capture CSV Validation Tool ===");
    println!("Validating generated CSV file for analytics import compatibility\n");

    let passed = capture_csv_check::validate_with(&args.path, args.max_issues);
    if passed {
        println!("\n🎉 SUCCESS: CSV file is compatible!");
        println!("You can now import this file for visualization.");
    } else {
        println!("\n❌ FAILURE: CSV file has compatibility issues.");
        println!("Please check the issues above and regenerate the file.");
    }

    let location = path::absolute(&args.path).unwrap_or_else(|_| args.path.clone());
    println!("\nFile location: {}", location.display());

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
