use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use thiserror::Error;

use crate::ai::{Control, Gateway, ImageError, ReceiptImage, ReceiptScan};
use crate::finance::{self, FinanceError};
use crate::models::{NewTransaction, Task};
use crate::seed;
use crate::utils::get_current_date_string;

#[derive(Parser)]
#[command(name = "dayboard")]
#[command(about = "Dayboard - tasks, highlights, journal and finances for today, in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (separate dev config and log)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Print the daily briefing for today's agenda
    Briefing,
    /// Extract an expense from a receipt image
    ScanReceipt {
        /// Image file (png, jpg, jpeg, webp, heic, heif)
        image: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Image error: {0}")]
    ImageError(#[from] ImageError),
    #[error("{0}")]
    ReceiptRejected(#[from] FinanceError),
    #[error("{0}")]
    AiUnavailable(String),
}

/// Briefing text for `tasks`, with failures turned into the fallback message.
pub fn briefing_text(gateway: &Gateway, tasks: &[Task]) -> String {
    match gateway.daily_briefing(tasks) {
        Ok(text) => text,
        Err(e) => Control::DailyBriefing.fallback_text(&e),
    }
}

/// Handle the briefing command
pub fn handle_briefing(gateway: &Gateway) -> Result<(), CliError> {
    let tasks = seed::initial_tasks();
    println!("{}", briefing_text(gateway, &tasks));
    Ok(())
}

/// Scan a receipt and convert it into an expense record.
pub fn scan_receipt(gateway: &Gateway, image_path: &Path, today: &str) -> Result<NewTransaction, CliError> {
    let image = ReceiptImage::load(image_path)?;
    let scan = match gateway.parse_receipt(&image) {
        Ok(scan) => scan,
        Err(e) if !gateway.is_enabled() => {
            return Err(CliError::AiUnavailable(Control::ReceiptScan.fallback_text(&e)));
        }
        Err(_) => ReceiptScan::failed(),
    };
    Ok(finance::transaction_from_receipt(&scan, today)?)
}

/// Handle the scan-receipt command
pub fn handle_scan_receipt(image: &Path, gateway: &Gateway) -> Result<(), CliError> {
    let transaction = scan_receipt(gateway, image, &get_current_date_string())?;
    info!("receipt scanned from {}", image.display());
    println!(
        "{}  {}  {}  ${:.2}",
        transaction.date, transaction.category, transaction.description, transaction.amount
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use crate::ai::gateway::tests::StubClient;
    use crate::models::{Category, TransactionKind};
    use std::io::Write;

    fn receipt_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"\xFF\xD8\xFF").unwrap();
        file
    }

    #[test]
    fn default_command_is_none_so_tui_runs() {
        let cli = Cli::parse_from(["dayboard", "--dev"]);
        assert!(cli.dev);
        assert!(cli.command.is_none());
    }

    #[test]
    fn scan_receipt_takes_a_path() {
        let cli = Cli::parse_from(["dayboard", "--config", "/tmp/c.toml", "scan-receipt", "r.png"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.command, Some(Commands::ScanReceipt { image: PathBuf::from("r.png") }));
    }

    #[test]
    fn briefing_without_credential_uses_fallback() {
        let text = briefing_text(&Gateway::disabled(), &seed::initial_tasks());
        assert_eq!(text, "Could not generate your daily briefing. Please check your API key.");
    }

    #[test]
    fn scanned_receipt_becomes_an_expense() {
        let stub = StubClient::replying(Ok(r#"{"description": null, "date": null, "amount": -12.5}"#.to_string()));
        let file = receipt_file();
        let tx = scan_receipt(&Gateway::new(stub), file.path(), "2025-10-30").unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.category, Category::Receipt);
        assert_eq!(tx.amount, 12.5);
        assert_eq!(tx.date, "2025-10-30");
        assert_eq!(tx.description, "Parsed from receipt");
    }

    #[test]
    fn failed_scan_is_rejected() {
        let stub = StubClient::replying(Err(AiError::EmptyResponse));
        let file = receipt_file();
        let err = scan_receipt(&Gateway::new(stub), file.path(), "2025-10-30").unwrap_err();
        assert_eq!(err.to_string(), "Could not parse the receipt image. Please try again.");
    }

    #[test]
    fn unsupported_image_never_reaches_the_gateway() {
        let stub = StubClient::replying(Ok("{}".to_string()));
        let result = scan_receipt(&Gateway::new(stub.clone()), Path::new("receipt.gif"), "2025-10-30");
        assert!(matches!(result, Err(CliError::ImageError(ImageError::Unsupported(_)))));
        assert_eq!(stub.calls(), 0);
    }
}
