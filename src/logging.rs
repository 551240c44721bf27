//! Log setup. The TUI owns the terminal, so records go to a file in the
//! profile's data directory instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};
use log::info;

use crate::utils::{self, Profile};

pub const LOG_FILE_NAME: &str = "dayboard.log";

/// Path of the log file for a profile, if the data directory is known.
pub fn log_path(profile: Profile) -> Option<PathBuf> {
    utils::get_data_dir(profile).map(|dir| dir.join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global logger. `RUST_LOG` wins over `default_level`.
/// Logging is silently skipped when no file can be opened; the dashboard
/// still works without it.
pub fn init(profile: Profile, default_level: &str) -> Option<PathBuf> {
    let path = log_path(profile)?;
    let file = open_log_file(&path).ok()?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));
    builder.target(Target::Pipe(Box::new(file)));
    if builder.try_init().is_err() {
        return None;
    }
    info!("dayboard {} starting ({:?} profile)", env!("CARGO_PKG_VERSION"), profile);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join(LOG_FILE_NAME);
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn log_path_ends_with_file_name() {
        if let Some(path) = log_path(Profile::Dev) {
            assert!(path.ends_with(LOG_FILE_NAME));
        }
    }
}
