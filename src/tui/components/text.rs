use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::config::{DisplayConfig, SELECTION_STYLE_MODIFIER};
use crate::tui::component::{Component, Element, ElementWidget};

/// Theme role of a line, resolved against the display config at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Muted,
    Accent,
    Error,
}

impl Tone {
    fn style(self, config: &DisplayConfig) -> Style {
        match self {
            Tone::Normal => Style::default(),
            Tone::Muted => Style::default().fg(config.theme.muted_fg),
            Tone::Accent => Style::default()
                .fg(config.theme.selection_fg)
                .add_modifier(SELECTION_STYLE_MODIFIER),
            Tone::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub tone: Tone,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Normal,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Plain lines of text, truncated to the area
pub struct Text;

impl Component for Text {
    type Props = Vec<TextLine>;

    fn view(&self, props: &Self::Props) -> Element {
        Element::Widget(Box::new(TextWidget {
            lines: props.clone(),
        }))
    }
}

#[derive(Clone)]
struct TextWidget {
    lines: Vec<TextLine>,
}

impl ElementWidget for TextWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        for (i, line) in self.lines.iter().enumerate().take(area.height as usize) {
            buf.set_stringn(
                area.x,
                area.y + i as u16,
                &line.text,
                area.width as usize,
                line.tone.style(config),
            );
        }
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(self.lines.len() as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::{assert_buffer, test_display};

    #[test]
    fn test_lines_render_with_tones() {
        let props = vec![
            TextLine::new("plain"),
            TextLine::toned("muted", Tone::Muted),
            TextLine::toned("失败", Tone::Error),
        ];
        let Element::Widget(widget) = Text.view(&props) else {
            panic!("expected widget");
        };
        assert_eq!(widget.preferred_height(), Some(3));

        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 2));
        let config = test_display();
        widget.render(buf.area, &mut buf, &config);

        assert_buffer(&buf, &["plain", "muted"]);
        assert_eq!(buf[(0, 1)].fg, config.theme.muted_fg);
    }
}
