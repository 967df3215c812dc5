use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use label_maker_lib::collaborators::{PresetFiles, SystemOpener, TerminalPrompt};
use label_maker_lib::commands::{history, labels};
use label_maker_lib::config::{self, Settings};
use label_maker_lib::core_state::CoreState;
use label_maker_lib::models::LabelType;
use label_maker_lib::session::SelectionReport;

/// Turns chip export files into color-coded batch label sheets.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Settings file (defaults to ~/LabelMaker/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Also log to a file; without a value, ~/LabelMaker/label_maker.log
    #[arg(long, global = true)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a label PDF from chip files
    Create {
        /// Envelope chip files
        #[arg(long, num_args = 1..)]
        envelopes: Vec<PathBuf>,
        /// Letter (card) chip files
        #[arg(long, num_args = 1..)]
        letters: Vec<PathBuf>,
        /// QR payload for an order, as ORDER=PAYLOAD
        #[arg(long = "qr", value_parser = parse_qr)]
        qr: Vec<(String, String)>,
        /// Document name; `.pdf` is added
        #[arg(short, long)]
        name: String,
        /// Output directory (defaults to the exports directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Open the PDF when done
        #[arg(long)]
        open: bool,
    },
    /// Show recently used orders and their colors, newest first
    History,
    /// Set an order's color
    Recolor {
        order: String,
        /// RRGGBB, optional leading '#'
        color: String,
    },
}

fn parse_qr(arg: &str) -> Result<(String, String), String> {
    let (order, payload) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ORDER=PAYLOAD, got '{arg}'"))?;
    let order = order.trim();
    if order.is_empty() {
        return Err("order name is empty".into());
    }
    Ok((order.to_string(), payload.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = cli.log_file.map(|p| p.unwrap_or_else(config::log_path));
    label_maker_lib::init_tracing(log_file.as_deref());

    match run(cli.settings, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings_path: Option<PathBuf>, command: Command) -> Result<(), String> {
    let settings_path = settings_path.unwrap_or_else(config::settings_path);
    let settings = Settings::load(&settings_path).map_err(|e| e.to_string())?;
    let state = CoreState::new(settings);

    match command {
        Command::Create { envelopes, letters, qr, name, out, open } => {
            let mut picker = PresetFiles { envelopes, letters };
            let mut types = TerminalPrompt::stdio();
            let mut colors = TerminalPrompt::stdio();

            for label_type in LabelType::ALL {
                let report = labels::select_files(&state, label_type, &mut picker, &mut types, &mut colors)?;
                print_report(label_type, &report);
            }

            for (order, payload) in qr {
                if let Some(previous) = labels::attach_qr(&state, &order, &payload)? {
                    println!("QR for '{order}' replaced (was {previous})");
                }
            }

            let outcome = labels::create_pdf(&state, &name, out, open, &SystemOpener)?;
            println!(
                "Wrote {} labels on {} page(s) to {}",
                outcome.labels,
                outcome.pages,
                outcome.path.display()
            );
            if !outcome.history_saved {
                eprintln!("warning: order history could not be saved");
            }
        }
        Command::History => {
            let entries = history::get_history(&state)?;
            if entries.is_empty() {
                println!("No orders in history");
            }
            for entry in entries {
                println!("{}  {}", entry.color, entry.order_name);
            }
        }
        Command::Recolor { order, color } => {
            let color = history::recolor(&state, &order, &color)?;
            println!("{order} is now {color}");
        }
    }
    Ok(())
}

fn print_report(label_type: LabelType, report: &SelectionReport) {
    for (_, file) in &report.newly_shown {
        println!("{}: {file}", label_type.marker());
    }
    for file in &report.duplicates {
        println!("already listed, skipped: {file}");
    }
    for skipped in &report.skipped {
        println!("skipped ({:?}): {}", skipped.reason, skipped.file);
    }
    for order in &report.uncolored_orders {
        println!("no color for '{order}', printing in black");
    }
}
