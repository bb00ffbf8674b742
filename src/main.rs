//! # Folio CLI
//!
//! Usage:
//!   folio report.json -o report.pdf
//!   folio report.json --landscape
//!   folio --example > report.json

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use folio::{render_report, FolioError, ReportInput};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Render an expense report to PDF")]
#[command(version)]
struct Cli {
    /// Report input (JSON)
    #[arg(required_unless_present = "example")]
    input: Option<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long, default_value = "report.pdf")]
    output: PathBuf,

    /// Print the report in landscape, overriding the input's preference
    #[arg(long)]
    landscape: bool,

    /// Print an example input file and exit
    #[arg(long)]
    example: bool,
}

fn run(cli: &Cli, input: &Path) -> Result<usize, FolioError> {
    let json = fs::read_to_string(input)?;
    let mut report: ReportInput = serde_json::from_str(&json)?;
    if cli.landscape {
        report.preferences.print_landscape = true;
    }
    let bytes = render_report(&report)?;
    fs::write(&cli.output, &bytes)?;
    Ok(bytes.len())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.example {
        print!("{}", EXAMPLE_REPORT);
        return ExitCode::SUCCESS;
    }
    let Some(input) = &cli.input else {
        return ExitCode::FAILURE;
    };

    match run(&cli, input) {
        Ok(len) => {
            eprintln!("Written {} bytes to {}", len, cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render {}: {}", input.display(), e);
            ExitCode::FAILURE
        }
    }
}

const EXAMPLE_REPORT: &str = r##"{
  "metadata": { "title": "Spring Conference", "author": "Accounts" },
  "page": { "size": "Letter", "marginHorizontal": 36, "marginVertical": 36 },
  "decorations": { "footer": "Spring Conference expense report", "pageNumbers": true },
  "trip": {
    "name": "Spring Conference",
    "startDate": "2024-03-01",
    "endDate": "2024-03-05",
    "currency": "USD",
    "costCenter": "ENG-42",
    "comment": "Booth duty and two customer visits"
  },
  "receipts": [
    { "name": "Hotel (4 nights)", "date": "2024-03-01", "price": 612.40, "tax": 68.20, "category": "Lodging", "paymentMethod": "Corporate card" },
    { "name": "Conference pass", "date": "2024-03-02", "price": 450.00, "category": "Registration", "paymentMethod": "Corporate card" },
    { "name": "Team dinner", "date": "2024-03-03", "price": 186.75, "tax": 16.10, "category": "Meals", "comment": "Four attendees" },
    { "name": "Airport taxi", "date": "2024-03-05", "price": 48.00, "category": "Travel" },
    { "name": "Phone charger", "date": "2024-03-04", "price": 24.99, "category": "Other", "reimbursable": false }
  ],
  "distances": [
    { "date": "2024-03-01", "location": "Home to airport", "distance": 32.5, "rate": 0.67 },
    { "date": "2024-03-04", "location": "Customer site", "distance": 18, "rate": 0.67 }
  ],
  "preferences": {
    "includeTaxField": true,
    "printDistanceTable": true,
    "categoricalSummation": true,
    "separateByCategory": true,
    "includeCostCenter": true,
    "dateSeparator": "-"
  },
  "purchases": { "active": ["pro_sku_3"] }
}
"##;
