use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use unicode_width::UnicodeWidthStr;

use crate::config::{DisplayConfig, SELECTION_STYLE_MODIFIER};
use crate::tui::component::{vertical, Component, Constraint, Element, ElementWidget};

/// A single tab item containing its label and content
#[derive(Clone)]
pub struct TabItem {
    /// Unique key identifying this tab
    pub key: String,
    /// Display title for the tab
    pub title: String,
    /// Content to show when this tab is active
    pub content: Element,
}

impl TabItem {
    pub fn new(key: impl Into<String>, title: impl Into<String>, content: Element) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            content,
        }
    }
}

/// Props for TabbedPanel component
#[derive(Clone)]
pub struct TabbedPanelProps {
    /// Currently active tab key
    pub active_key: String,
    pub tabs: Vec<TabItem>,
    /// Whether the tab bar has keyboard focus (affects styling)
    pub focused: bool,
}

/// TabbedPanel component - renders a tab bar above the active tab's content
///
/// Only the active tab's content is part of the element tree; the others
/// are dropped.
pub struct TabbedPanel;

impl Component for TabbedPanel {
    type Props = TabbedPanelProps;

    fn view(&self, props: &Self::Props) -> Element {
        let active_content = props
            .tabs
            .iter()
            .find(|tab| tab.key == props.active_key)
            .map(|tab| tab.content.clone())
            .unwrap_or(Element::None);

        let labels = props
            .tabs
            .iter()
            .map(|tab| TabLabel {
                title: tab.title.clone(),
                active: tab.key == props.active_key,
            })
            .collect();

        vertical(
            [
                Constraint::Length(2), // Tab bar (2 lines: labels + separator)
                Constraint::Min(0),    // Content area
            ],
            vec![
                Element::Widget(Box::new(TabBarWidget {
                    labels,
                    focused: props.focused,
                })),
                active_content,
            ],
        )
    }
}

#[derive(Clone)]
struct TabLabel {
    title: String,
    active: bool,
}

/// Widget that renders the tab labels and the line under them
#[derive(Clone)]
struct TabBarWidget {
    labels: Vec<TabLabel>,
    focused: bool,
}

impl TabBarWidget {
    fn box_char_style(&self, config: &DisplayConfig) -> Style {
        Style::default().fg(config.theme.muted_fg)
    }

    fn label_style(&self, label: &TabLabel, config: &DisplayConfig) -> Style {
        if !label.active {
            return Style::default();
        }
        let fg = if self.focused {
            config.theme.selection_fg
        } else {
            config.theme.unfocused_selection_fg()
        };
        Style::default().fg(fg).add_modifier(SELECTION_STYLE_MODIFIER)
    }

    /// Build segments for the tab line with separators
    fn build_tab_line(&self, config: &DisplayConfig) -> Vec<(String, Style)> {
        let box_style = self.box_char_style(config);
        let separator = format!(" {} ", config.box_chars.vertical);
        let mut segments = Vec::new();

        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                segments.push((separator.clone(), box_style));
            }
            segments.push((label.title.clone(), self.label_style(label, config)));
        }

        segments
    }

    /// Build the separator line with connectors under tab gaps
    fn build_separator_line(&self, area_width: usize, config: &DisplayConfig) -> Vec<(String, Style)> {
        let horizontal = &config.box_chars.horizontal;
        let connector = &config.box_chars.bottom_junction;
        let box_style = self.box_char_style(config);

        let mut segments = Vec::new();
        let mut pos = 0;

        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                segments.push((horizontal.clone(), box_style));
                segments.push((connector.clone(), box_style));
                segments.push((horizontal.clone(), box_style));
                pos += 3; // " │ "
            }
            let tab_width = label.title.width();
            segments.push((horizontal.repeat(tab_width), box_style));
            pos += tab_width;
        }

        if pos < area_width {
            segments.push((horizontal.repeat(area_width - pos), box_style));
        }

        segments
    }
}

fn render_segments(segments: Vec<(String, Style)>, area: Rect, y: u16, buf: &mut Buffer) {
    let mut x = area.x;
    let right = area.x + area.width;
    for (text, style) in segments {
        if x >= right {
            break;
        }
        let (next, _) = buf.set_stringn(x, y, &text, (right - x) as usize, style);
        x = next;
    }
}

impl ElementWidget for TabBarWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if self.labels.is_empty() || area.width == 0 || area.height < 2 {
            return;
        }

        render_segments(self.build_tab_line(config), area, area.y, buf);
        render_segments(
            self.build_separator_line(area.width as usize, config),
            area,
            area.y + 1,
            buf,
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2)
    }
}
