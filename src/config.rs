use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub color_overrides: Option<Theme>,
}

/// Which palette the dashboard uses. `System` follows the terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [ThemePreference::Light, ThemePreference::Dark, ThemePreference::System];

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
            ThemePreference::System => "System",
        }
    }

    /// Resolve `System` against a `COLORFGBG` value ("fg;bg" or "fg;x;bg").
    /// Unknown or missing values resolve to dark.
    pub fn resolve(self, colorfgbg: Option<&str>) -> ThemePreference {
        match self {
            ThemePreference::System => {
                let background = colorfgbg
                    .and_then(|v| v.rsplit(';').next())
                    .and_then(|bg| bg.trim().parse::<u8>().ok());
                match background {
                    Some(7) | Some(15) => ThemePreference::Light,
                    _ => ThemePreference::Dark,
                }
            }
            explicit => explicit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    /// Takes precedence over the environment when set
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
    #[serde(default = "default_view_1")]
    pub view_1: String,
    #[serde(default = "default_view_2")]
    pub view_2: String,
    #[serde(default = "default_view_3")]
    pub view_3: String,
    #[serde(default = "default_view_4")]
    pub view_4: String,
    #[serde(default = "default_view_5")]
    pub view_5: String,
    #[serde(default = "default_view_6")]
    pub view_6: String,
    #[serde(default = "default_view_7")]
    pub view_7: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_focus_sidebar")]
    pub focus_sidebar: String,
    #[serde(default = "default_generate")]
    pub generate: String,
    #[serde(default = "default_regenerate")]
    pub regenerate: String,
    #[serde(default = "default_copy_insight")]
    pub copy_insight: String,
    #[serde(default = "default_toggle_priority")]
    pub toggle_priority: String,
    #[serde(default = "default_toggle_completed")]
    pub toggle_completed: String,
    #[serde(default = "default_toggle_unachieved")]
    pub toggle_unachieved: String,
    #[serde(default = "default_reschedule")]
    pub reschedule: String,
    #[serde(default = "default_attach_proof")]
    pub attach_proof: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_scan_receipt")]
    pub scan_receipt: String,
    #[serde(default = "default_cycle_mood")]
    pub cycle_mood: String,
    #[serde(default = "default_save")]
    pub save: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    /// Empty means "derive from highlight_bg"
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_income")]
    pub income: String,
    #[serde(default = "default_expense")]
    pub expense: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemePreference::default(),
            sidebar_width_percent: default_sidebar_width(),
            key_bindings: KeyBindings::default(),
            ai: AiSettings::default(),
            log_level: default_log_level(),
            config_version: Some(CURRENT_CONFIG_VERSION),
            color_overrides: None,
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: default_ai_model(),
            endpoint: default_ai_endpoint(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
            view_1: default_view_1(),
            view_2: default_view_2(),
            view_3: default_view_3(),
            view_4: default_view_4(),
            view_5: default_view_5(),
            view_6: default_view_6(),
            view_7: default_view_7(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            select: default_select(),
            focus_sidebar: default_focus_sidebar(),
            generate: default_generate(),
            regenerate: default_regenerate(),
            copy_insight: default_copy_insight(),
            toggle_priority: default_toggle_priority(),
            toggle_completed: default_toggle_completed(),
            toggle_unachieved: default_toggle_unachieved(),
            reschedule: default_reschedule(),
            attach_proof: default_attach_proof(),
            edit: default_edit(),
            new: default_new(),
            scan_receipt: default_scan_receipt(),
            cycle_mood: default_cycle_mood(),
            save: default_save(),
        }
    }
}

impl KeyBindings {
    /// Bindings for the numbered view shortcuts, in navigation order.
    pub fn view_shortcuts(&self) -> [&str; 7] {
        [
            &self.view_1,
            &self.view_2,
            &self.view_3,
            &self.view_4,
            &self.view_5,
            &self.view_6,
            &self.view_7,
        ]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "cyan".to_string(),
            highlight_fg: "black".to_string(),
            tab_bg: "darkgray".to_string(),
            accent: "lightcyan".to_string(),
            income: "lightgreen".to_string(),
            expense: "lightred".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            tab_bg: "gray".to_string(),
            accent: "blue".to_string(),
            income: "green".to_string(),
            expense: "red".to_string(),
        }
    }
}

// Default value functions
fn default_sidebar_width() -> u16 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_ai_timeout() -> u64 {
    30
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_view_1() -> String {
    "1".to_string()
}

fn default_view_2() -> String {
    "2".to_string()
}

fn default_view_3() -> String {
    "3".to_string()
}

fn default_view_4() -> String {
    "4".to_string()
}

fn default_view_5() -> String {
    "5".to_string()
}

fn default_view_6() -> String {
    "6".to_string()
}

fn default_view_7() -> String {
    "7".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_focus_sidebar() -> String {
    "Tab".to_string()
}

fn default_generate() -> String {
    "g".to_string()
}

fn default_regenerate() -> String {
    "r".to_string()
}

fn default_copy_insight() -> String {
    "y".to_string()
}

fn default_toggle_priority() -> String {
    "p".to_string()
}

fn default_toggle_completed() -> String {
    "Space".to_string()
}

fn default_toggle_unachieved() -> String {
    "u".to_string()
}

fn default_reschedule() -> String {
    "t".to_string()
}

fn default_attach_proof() -> String {
    "a".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_scan_receipt() -> String {
    "s".to_string()
}

fn default_cycle_mood() -> String {
    "m".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "cyan".to_string()
}

fn default_highlight_fg() -> String {
    "black".to_string()
}

fn default_tab_bg() -> String {
    "darkgray".to_string()
}

fn default_accent() -> String {
    "lightcyan".to_string()
}

fn default_income() -> String {
    "lightgreen".to_string()
}

fn default_expense() -> String {
    "lightred".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

/// What `Config::load_from_path` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Existing,
    Created,
    /// File written by an older version (carries its `config_version`)
    Outdated(u32),
}

impl ConfigSource {
    pub fn report(self, config_path: &Path) {
        match self {
            ConfigSource::Existing => info!("loaded config from {}", config_path.display()),
            ConfigSource::Created => info!("created default config at {}", config_path.display()),
            ConfigSource::Outdated(found) => warn!(
                "config at {} is version {}, current is {}",
                config_path.display(),
                found,
                CURRENT_CONFIG_VERSION
            ),
        }
    }
}

impl Config {
    /// Load configuration from `config_path`, creating it with defaults if missing.
    /// Runs before the logger exists, so the outcome is returned for the caller
    /// to report.
    pub fn load_from_path(config_path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(format!("{}: {}", config_path.display(), e)))?;
            let config: Config = toml::from_str(&contents)?;
            let version = config.config_version.unwrap_or(0);
            let source = if version < CURRENT_CONFIG_VERSION {
                ConfigSource::Outdated(version)
            } else {
                ConfigSource::Existing
            };
            Ok((config, source))
        } else {
            let mut config = Config::default();
            config.save_to_path(config_path)?;
            Ok((config, ConfigSource::Created))
        }
    }

    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        info!("saved config to {}", config_path.display());
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Light or dark, after resolving `System` against the terminal
    pub fn effective_theme(&self) -> ThemePreference {
        self.theme.resolve(env::var("COLORFGBG").ok().as_deref())
    }

    /// Get the palette for the current preference.
    /// If highlight_fg is empty it is calculated from highlight_bg.
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = if let Some(ref overrides) = self.color_overrides {
            overrides.clone()
        } else if self.effective_theme() == ThemePreference::Light {
            Theme::light()
        } else {
            Theme::dark()
        };

        if theme.highlight_fg.is_empty() {
            let calculated_fg = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated_fg);
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let (config, source) = Config::load_from_path(&path).unwrap();
        assert_eq!(source, ConfigSource::Created);
        assert!(path.exists());
        assert_eq!(config.theme, ThemePreference::System);
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(config.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.key_bindings.quit, "q");
    }

    #[test]
    fn theme_preference_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.theme = ThemePreference::Light;
        config.save_to_path(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("theme = \"light\""));
        assert_eq!(Config::load_from_path(&path).unwrap().0.theme, ThemePreference::Light);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"dark\"\n[ai]\nmodel = \"gemini-2.0-flash\"\n[key_bindings]\nquit = \"x\"\n").unwrap();
        let (config, _) = Config::load_from_path(&path).unwrap();
        assert_eq!(config.theme, ThemePreference::Dark);
        assert_eq!(config.ai.model, "gemini-2.0-flash");
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.help, "F1");
        assert_eq!(config.sidebar_width_percent, 30);
    }

    #[test]
    fn load_reports_what_it_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::load_from_path(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap().1, ConfigSource::Existing);

        fs::write(&path, "theme = \"dark\"\n").unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap().1, ConfigSource::Outdated(0));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        assert!(matches!(Config::load_from_path(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn system_theme_follows_terminal_background() {
        let system = ThemePreference::System;
        assert_eq!(system.resolve(Some("0;15")), ThemePreference::Light);
        assert_eq!(system.resolve(Some("15;default;0")), ThemePreference::Dark);
        assert_eq!(system.resolve(Some("garbage")), ThemePreference::Dark);
        assert_eq!(system.resolve(None), ThemePreference::Dark);
        assert_eq!(ThemePreference::Light.resolve(Some("15;0")), ThemePreference::Light);
    }

    #[test]
    fn overrides_derive_missing_highlight_fg() {
        let config = Config {
            color_overrides: Some(Theme { highlight_bg: "white".to_string(), highlight_fg: String::new(), ..Theme::dark() }),
            ..Config::default()
        };
        let theme = config.get_active_theme();
        assert!(!theme.highlight_fg.is_empty());
        assert_eq!(theme.highlight_bg, "white");
    }
}
