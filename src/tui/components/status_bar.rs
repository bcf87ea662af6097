use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::tui::component::{Component, Element, ElementWidget};
use crate::tui::state::AppState;

/// StatusBar component - renders the status line under the page
///
/// Left side: status or error message
/// Right side: key hints
pub struct StatusBar;

impl Component for StatusBar {
    type Props = AppState;

    fn view(&self, props: &Self::Props) -> Element {
        let i18n = &props.system.i18n;
        let hints = [
            ("1-7", "视图"),
            ("s", "设置"),
            ("d", "日期"),
            ("l", "语言"),
            ("r", "刷新"),
            ("q", "退出"),
        ]
        .iter()
        .map(|(key, label)| format!("{} {}", key, i18n.t(label)))
        .collect::<Vec<_>>()
        .join("  ");

        // A failed load on the latest adapter outranks informational messages
        let load_error = props.player.reconciler.latest().error();
        let (message, is_error) = match (&load_error, &props.system.status_message) {
            (Some(error), _) => (Some(error.clone()), true),
            (None, Some(message)) => (Some(message.clone()), props.system.status_is_error),
            (None, None) => (None, false),
        };

        Element::Widget(Box::new(StatusBarWidget {
            message,
            is_error,
            hints,
        }))
    }
}

#[derive(Clone)]
struct StatusBarWidget {
    message: Option<String>,
    is_error: bool,
    hints: String,
}

impl ElementWidget for StatusBarWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.height < 2 || area.width == 0 {
            return;
        }
        let muted = Style::default().fg(config.theme.muted_fg);

        // Where the vertical bar sits, leaving "│ hints " on its right
        let right_width = self.hints.width() as u16 + 3;
        let bar_position = area.width.saturating_sub(right_width);

        // First line: horizontal separator with connector
        let line1 = format!(
            "{}{}{}",
            config.box_chars.horizontal.repeat(bar_position as usize),
            config.box_chars.top_junction,
            config
                .box_chars
                .horizontal
                .repeat(area.width.saturating_sub(bar_position + 1) as usize)
        );
        buf.set_stringn(area.x, area.y, &line1, area.width as usize, muted);

        // Second line: message on the left, hints on the right
        let y = area.y + 1;
        if let Some(message) = &self.message {
            let style = if self.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            let text = format!(" {}", message);
            let room = bar_position.saturating_sub(1) as usize;
            buf.set_stringn(area.x, y, &text, room, style);
        }
        let right = format!("{} {}", config.box_chars.vertical, self.hints);
        buf.set_stringn(
            area.x + bar_position,
            y,
            &right,
            area.width.saturating_sub(bar_position) as usize,
            muted,
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2) // Separator line + status line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::{assert_buffer, buffer_lines, test_display, ScriptedAdapter};

    fn render(widget: &StatusBarWidget, width: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, width, 2));
        widget.render(buf.area, &mut buf, &test_display());
        buf
    }

    fn widget_for(state: &AppState) -> Box<dyn ElementWidget> {
        match StatusBar.view(state) {
            Element::Widget(widget) => widget,
            _ => panic!("Expected widget element"),
        }
    }

    #[test]
    fn test_status_bar_renders_2_lines() {
        let widget = StatusBarWidget {
            message: Some("Loaded".to_string()),
            is_error: false,
            hints: "q quit".to_string(),
        };
        let buf = render(&widget, 30);
        assert_buffer(
            &buf,
            &[
                "─────────────────────┬────────",
                " Loaded              │ q quit",
            ],
        );
    }

    #[test]
    fn test_error_message_is_red() {
        let widget = StatusBarWidget {
            message: Some("boom".to_string()),
            is_error: true,
            hints: "q".to_string(),
        };
        let buf = render(&widget, 20);
        assert_eq!(buf[(1, 1)].fg, Color::Red);
    }

    #[test]
    fn test_hints_are_translated() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 2));
        widget_for(&AppState::default()).render(buf.area, &mut buf, &test_display());
        let line = &buffer_lines(&buf)[1];
        assert!(line.contains("1-7 视图"));
        assert!(line.contains("q 退出"));
    }

    #[test]
    fn test_latest_adapter_error_wins() {
        let mut state = AppState::default();
        state.system.set_status_message("hello".to_string());

        let mut buf = Buffer::empty(Rect::new(0, 0, 120, 2));
        widget_for(&state).render(buf.area, &mut buf, &test_display());
        assert!(buffer_lines(&buf)[1].contains("hello"));

        let adapter = ScriptedAdapter::with_metadata("someone", 1);
        adapter.fail("source offline");
        let _ = state.player.reconciler.set_latest(adapter.shared());

        let mut buf = Buffer::empty(Rect::new(0, 0, 120, 2));
        widget_for(&state).render(buf.area, &mut buf, &test_display());
        let line = &buffer_lines(&buf)[1];
        assert!(line.contains("source offline"));
        assert!(!line.contains("hello"));
    }
}
