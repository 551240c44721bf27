pub mod ai;
pub mod cli;
pub mod config;
pub mod finance;
pub mod logging;
pub mod models;
pub mod progress;
pub mod seed;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Achievement, FinancialTransaction, Mood, Task, View};
pub use store::Store;
pub use utils::Profile;
