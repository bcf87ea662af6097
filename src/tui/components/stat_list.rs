use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::i18n::I18n;
use crate::stats::{PlayerExtendedStats, StatKey};
use crate::tui::component::{Component, Element, ElementWidget};

/// Gap between the label, value and description columns
const COLUMN_GAP: usize = 2;

/// One `label  value  description` row
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
}

impl StatRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Row for a named extended stat, translated
    pub fn stat(i18n: &I18n, stats: &PlayerExtendedStats, key: StatKey) -> Self {
        let row = Self::new(i18n.t(key.label_key()), stats.format(key));
        match key.description_key() {
            Some(desc) => row.with_description(i18n.t(desc)),
            None => row,
        }
    }
}

pub struct StatList;

impl Component for StatList {
    type Props = Vec<StatRow>;

    fn view(&self, props: &Self::Props) -> Element {
        if props.is_empty() {
            return Element::None;
        }
        Element::Widget(Box::new(StatListWidget { rows: props.clone() }))
    }
}

#[derive(Clone)]
struct StatListWidget {
    rows: Vec<StatRow>,
}

impl StatListWidget {
    fn column_widths(&self) -> (usize, usize) {
        let label = self.rows.iter().map(|r| r.label.width()).max().unwrap_or(0);
        let value = self.rows.iter().map(|r| r.value.width()).max().unwrap_or(0);
        (label, value)
    }
}

/// Pad to a display width; CJK glyphs count double
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

impl ElementWidget for StatListWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        let (label_width, value_width) = self.column_widths();
        let muted = Style::default().fg(config.theme.muted_fg);

        for (i, row) in self.rows.iter().enumerate().take(area.height as usize) {
            let y = area.y + i as u16;
            let mut line = format!(
                "{}{}",
                pad(&row.label, label_width + COLUMN_GAP),
                pad(&row.value, value_width)
            );
            let (x, _) = buf.set_stringn(area.x, y, &line, area.width as usize, Style::default());

            if let Some(description) = &row.description {
                line = format!("{}{}", " ".repeat(COLUMN_GAP), description);
                let used = x - area.x;
                buf.set_stringn(x, y, &line, area.width.saturating_sub(used) as usize, muted);
            }
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(self.rows.len() as u16)
    }
}
