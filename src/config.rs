use ratatui::style::{Color, Modifier};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use xdg::BaseDirectories;

use crate::formatting::BoxChars;
use crate::types::GameMode;

/// Modifier applied on top of the selection color for the active tab / cursor
pub const SELECTION_STYLE_MODIFIER: Modifier = Modifier::BOLD;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    /// Dataset JSON file; the bundled demo dataset is used when unset
    pub dataset: Option<PathBuf>,
    /// Persisted UI language code ("zh-hans", "ja", "en")
    pub language: Option<String>,
    /// Record missing translation keys (debug builds only)
    pub i18n_debug: bool,
    /// Number of records fetched per adapter page
    pub page_size: usize,
    /// Lobbies offered in the settings bar
    pub available_modes: Vec<GameMode>,
    /// Preferred lobby order used when the current selection has no records
    pub mode_preference: Vec<GameMode>,
    pub display: DisplayConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_unicode: bool,
    #[serde(skip)]
    pub box_chars: BoxChars,
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color_optional")]
    pub unfocused_selection_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub muted_fg: Color,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    /// JSON-lines file page views are appended to
    pub sink: Option<PathBuf>,
    /// Track from debug builds too (normally release only)
    pub allow_debug_builds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            dataset: None,
            language: None,
            i18n_debug: false,
            page_size: 50,
            available_modes: vec![
                GameMode::Throne4South,
                GameMode::Jade4South,
                GameMode::Gold4South,
                GameMode::Throne4East,
                GameMode::Jade4East,
                GameMode::Gold4East,
            ],
            mode_preference: vec![
                GameMode::Throne4South,
                GameMode::Jade4South,
                GameMode::Throne4East,
                GameMode::Jade4East,
                GameMode::Gold4South,
                GameMode::Gold4East,
            ],
            display: DisplayConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            use_unicode: true,
            box_chars: BoxChars::unicode(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            selection_fg: Color::Rgb(255, 165, 0), // Orange
            unfocused_selection_fg: None,
            muted_fg: Color::DarkGray,
        }
    }
}

impl ThemeConfig {
    /// Get the unfocused selection color, calculating 50% darker if not explicitly set
    pub fn unfocused_selection_fg(&self) -> Color {
        self.unfocused_selection_fg
            .unwrap_or_else(|| darken_color(self.selection_fg, 0.5))
    }
}

/// Darken a color by a given factor (0.0 = black, 1.0 = original)
fn darken_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * factor) as u8,
            (g as f32 * factor) as u8,
            (b as f32 * factor) as u8,
        ),
        other => other,
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

fn deserialize_color_optional<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    s.map(|color_str| {
        parse_color(&color_str)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", color_str)))
    })
    .transpose()
}

/// Parse a color name, "#rrggbb" / "#rgb" hex string or "r,g,b" tuple
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    let named = match s.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        "orange" => Some(Color::Rgb(255, 165, 0)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(hex) = s.strip_prefix('#') {
        // Channels are sliced by byte
        if !hex.is_ascii() {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        return match hex.len() {
            6 => Some(Color::Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => Some(Color::Rgb(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            _ => None,
        };
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if let [r, g, b] = parts.as_slice() {
        return Some(Color::Rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?));
    }

    None
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

/// Directory for files the app writes (preferences, missing translation keys)
pub fn get_data_dir() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    BaseDirectories::with_prefix(pgm).get_data_home()
}

/// Parse config text, falling back to defaults on any error
pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(mut config) => {
            config.display.box_chars = BoxChars::from_use_unicode(config.display.use_unicode);
            config
        }
        Err(e) => {
            tracing::warn!("Invalid config file, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => parse(&content),
        Err(_) => Config::default(),
    }
}
