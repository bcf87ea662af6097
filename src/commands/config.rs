use std::path::Path;

use crate::config::{self, Config};
use crate::types::GameMode;

fn format_modes(modes: &[GameMode]) -> String {
    modes
        .iter()
        .map(|m| m.id().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolved configuration, one `key: value` per line
pub fn format_config(cfg: &Config, path: Option<&Path>) -> String {
    let (path_str, exists) = match path {
        Some(path) => (path.display().to_string(), path.exists()),
        None => ("Unable to determine config path".to_string(), false),
    };
    let optional = |value: Option<String>| value.unwrap_or_else(|| "(none)".to_string());

    let mut lines = vec![
        format!(
            "Configuration File: {} (Exists: {})",
            path_str,
            if exists { "yes" } else { "no" }
        ),
        String::new(),
        "Current Configuration:".to_string(),
        "=====================".to_string(),
        format!("log_level: {}", cfg.log_level),
        format!("log_file: {}", cfg.log_file),
        format!(
            "dataset: {}",
            optional(cfg.dataset.as_ref().map(|p| p.display().to_string()))
        ),
        format!("language: {}", optional(cfg.language.clone())),
        format!("i18n_debug: {}", cfg.i18n_debug),
        format!("page_size: {}", cfg.page_size),
        format!("available_modes: [{}]", format_modes(&cfg.available_modes)),
        format!("mode_preference: [{}]", format_modes(&cfg.mode_preference)),
        String::new(),
        "[display]".to_string(),
        format!("use_unicode: {}", cfg.display.use_unicode),
        format!("selection_fg: {:?}", cfg.display.theme.selection_fg),
        format!(
            "unfocused_selection_fg: {:?}{}",
            cfg.display.theme.unfocused_selection_fg(),
            if cfg.display.theme.unfocused_selection_fg.is_none() {
                " (auto: 50% darker)"
            } else {
                ""
            }
        ),
        String::new(),
        "[analytics]".to_string(),
        format!("enabled: {}", cfg.analytics.enabled),
        format!(
            "sink: {}",
            optional(cfg.analytics.sink.as_ref().map(|p| p.display().to_string()))
        ),
        format!("allow_debug_builds: {}", cfg.analytics.allow_debug_builds),
    ];
    lines.push(String::new());
    lines.join("\n")
}

/// Handle the config command - display current configuration
pub fn run() {
    let cfg = config::read();
    print!("{}", format_config(&cfg, config::get_config_path().as_deref()));
}
