// Entry point and high-level CLI flow.
//
// - Option [1] fetches the dataset if needed, then loads and classifies it.
// - Option [2] ranks the categories and writes the charts, tables, JSON
//   summary and the Markdown report.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
// `--batch` runs [1] then [2] without prompting.
use clap::Parser;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Mutex, PoisonError};
use storm_report::config::ReportConfig;
use storm_report::loader::{self, LoadReport};
use storm_report::pipeline;
use storm_report::types::StormEvent;
use storm_report::{fetch, output, util};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "storm_report", about = "Severe weather impact report over the NOAA storm database")]
struct Args {
    /// Path to the TOML config file (defaults to ./storm_report.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load the dataset and generate all reports without the interactive menu
    #[arg(long)]
    batch: bool,
}

// Loaded events are kept for the whole run so reports can be regenerated
// without re-reading the file.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    data: Option<(Vec<StormEvent>, LoadReport)>,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to the report selection menu.
///
/// Returns `true` for `Y`, `false` for `N` or when stdin is closed.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: fetch (if missing), load and classify the dataset.
fn handle_load(config: &ReportConfig) -> anyhow::Result<()> {
    let path = fetch::ensure_dataset(config)?;
    let (data, load_report) = loader::load_events(&path, config)?;
    println!(
        "Processing dataset... ({} rows read, {} events kept)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.kept_rows)
    );
    if load_report.out_of_range > 0 {
        println!(
            "Info: {} rows outside the configured year range.",
            util::format_int(load_report.out_of_range)
        );
    }
    println!(
        "Note: {} rows skipped due to parse/validation errors.\n",
        util::format_int(load_report.parse_errors)
    );
    let mut state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    state.data = Some((data, load_report));
    Ok(())
}

/// Handle option [2]: generate all charts, tables and the report document.
fn handle_generate_reports(config: &ReportConfig) -> anyhow::Result<()> {
    let state = APP_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    let Some((data, load_report)) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return Ok(());
    };

    println!("Generating reports...");
    let generated = pipeline::generate_reports(data, load_report, &config.output_dir, config.top_n)?;

    for (idx, section) in generated.sections.iter().enumerate() {
        println!("Report {}: {}", idx + 1, section.metric.title());
        println!("(Top {} categories)\n", config.top_n);
        output::preview_table_rows(&section.rows, 3);
        println!(
            "(Chart saved to {}, full table exported to {})\n",
            section.chart_path.display(),
            section.csv_path.display()
        );
    }

    println!(
        "Uncategorized events: {}% of {} events kept their raw label.",
        util::format_number(generated.summary.uncategorized_pct, 2),
        util::format_int(generated.summary.total_events)
    );
    println!("Report document: {}\n", generated.document_path.display());
    Ok(())
}

fn run_batch(config: &ReportConfig) -> anyhow::Result<()> {
    handle_load(config)?;
    handle_generate_reports(config)
}

fn run_menu(config: &ReportConfig) {
    loop {
        println!("Storm Data Report:");
        println!("[1] Load the dataset");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if let Err(e) = handle_load(config) {
                    error!("{:#}", e);
                    eprintln!("Failed to load dataset: {:#}\n", e);
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(config) {
                    error!("{:#}", e);
                    eprintln!("Failed to generate reports: {:#}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let config = ReportConfig::load(args.config.as_deref()).and_then(|mut c| {
        c.apply_env_overrides()?;
        Ok(c)
    });
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    if args.batch {
        if let Err(e) = run_batch(&config) {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    } else {
        run_menu(&config);
    }
    ExitCode::SUCCESS
}
