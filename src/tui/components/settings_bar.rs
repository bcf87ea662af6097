use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::config::{DisplayConfig, SELECTION_STYLE_MODIFIER};
use crate::tui::component::{Component, Element, ElementWidget};

/// One lobby checkbox
#[derive(Debug, Clone, PartialEq)]
pub struct ModeToggle {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsBarProps {
    pub mode_label: String,
    pub modes: Vec<ModeToggle>,
    pub cursor: usize,
    pub focused: bool,
    pub date_label: String,
    pub date_value: String,
    pub language_label: String,
    pub language_value: String,
}

/// Lobby toggles, date preset and language under the stats
pub struct SettingsBar;

impl Component for SettingsBar {
    type Props = SettingsBarProps;

    fn view(&self, props: &Self::Props) -> Element {
        Element::Widget(Box::new(SettingsBarWidget {
            props: props.clone(),
        }))
    }
}

#[derive(Clone)]
struct SettingsBarWidget {
    props: SettingsBarProps,
}

impl SettingsBarWidget {
    fn segments(&self, config: &DisplayConfig) -> Vec<(String, Style)> {
        let props = &self.props;
        let muted = Style::default().fg(config.theme.muted_fg);
        let separator = format!(" {} ", config.box_chars.vertical);

        let mut segments = vec![(format!("{}: ", props.mode_label), Style::default())];
        for (i, mode) in props.modes.iter().enumerate() {
            if i > 0 {
                segments.push((" ".to_string(), Style::default()));
            }
            let mark = if mode.selected { "[x]" } else { "[ ]" };
            let style = if props.focused && i == props.cursor {
                Style::default()
                    .fg(config.theme.selection_fg)
                    .add_modifier(SELECTION_STYLE_MODIFIER)
            } else if mode.selected {
                Style::default()
            } else {
                muted
            };
            segments.push((format!("{}{}", mark, mode.label), style));
        }
        segments.push((separator.clone(), muted));
        segments.push((format!("{}: {}", props.date_label, props.date_value), Style::default()));
        segments.push((separator, muted));
        segments.push((
            format!("{}: {}", props.language_label, props.language_value),
            Style::default(),
        ));
        segments
    }
}

impl ElementWidget for SettingsBarWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.height < 2 || area.width == 0 {
            return;
        }
        let muted = Style::default().fg(config.theme.muted_fg);
        let rule = config.box_chars.horizontal.repeat(area.width as usize);
        buf.set_stringn(area.x, area.y, &rule, area.width as usize, muted);

        let right = area.x + area.width;
        let mut x = area.x;
        for (text, style) in self.segments(config) {
            if x >= right {
                break;
            }
            let (next, _) = buf.set_stringn(x, area.y + 1, &text, (right - x) as usize, style);
            x = next;
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2)
    }
}
