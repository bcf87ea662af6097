use crate::config::DisplayConfig;

/// Box-drawing characters for table borders
#[derive(Debug, Clone, PartialEq)]
pub struct BoxChars {
    pub horizontal: String,
    pub double_horizontal: String,
    pub vertical: String,
    pub top_junction: String,
    pub bottom_junction: String,
    pub bar: String,
    /// Point marker in the recent ranks chart
    pub marker: String,
    pub spinner: [&'static str; 4],
}

impl BoxChars {
    pub fn unicode() -> Self {
        Self {
            horizontal: "─".to_string(),
            double_horizontal: "═".to_string(),
            vertical: "│".to_string(),
            top_junction: "┬".to_string(),
            bottom_junction: "┴".to_string(),
            bar: "█".to_string(),
            marker: "●".to_string(),
            spinner: ["◐", "◓", "◑", "◒"],
        }
    }

    pub fn ascii() -> Self {
        Self {
            horizontal: "-".to_string(),
            double_horizontal: "=".to_string(),
            vertical: "|".to_string(),
            top_junction: "+".to_string(),
            bottom_junction: "+".to_string(),
            bar: "#".to_string(),
            marker: "*".to_string(),
            spinner: ["|", "/", "-", "\\"],
        }
    }

    pub fn from_use_unicode(use_unicode: bool) -> Self {
        if use_unicode {
            Self::unicode()
        } else {
            Self::ascii()
        }
    }
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::unicode()
    }
}

/// Format a rate as a percentage with two decimals ("12.34%")
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", sanitize(value) * 100.0)
}

/// Format a value with three decimals, used for turn counts and average ranks
pub fn format_fixed3(value: f64) -> String {
    format!("{:.3}", sanitize(value))
}

/// Format a point value, dropping the fraction when it is whole
pub fn format_points(value: f64) -> String {
    let value = sanitize(value);
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Format a header with text and underline
///
/// The underline matches the display width of the text, so CJK labels get
/// two columns per character.
pub fn format_header(text: &str, double_line: bool, display: &DisplayConfig) -> String {
    let separator_char = if double_line {
        &display.box_chars.double_horizontal
    } else {
        &display.box_chars.horizontal
    };
    let width = unicode_width::UnicodeWidthStr::width(text);
    format!("{}\n{}\n", text, separator_char.repeat(width))
}
