use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::DisplayConfig;
use crate::tui::component::{Component, Element, ElementWidget};

/// Milliseconds each spinner glyph stays on screen
const FRAME_MS: u128 = 150;

/// Spinner glyph followed by a message; the glyph advances with wall time
pub struct Spinner;

impl Component for Spinner {
    type Props = String;

    fn view(&self, props: &Self::Props) -> Element {
        Element::Widget(Box::new(SpinnerWidget {
            message: props.clone(),
        }))
    }
}

fn frame_index(now: SystemTime, frames: usize) -> usize {
    let millis = now.duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    ((millis / FRAME_MS) % frames as u128) as usize
}

#[derive(Clone)]
struct SpinnerWidget {
    message: String,
}

impl ElementWidget for SpinnerWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig) {
        if area.height == 0 {
            return;
        }
        let frames = &config.box_chars.spinner;
        let glyph = frames[frame_index(SystemTime::now(), frames.len())];
        let line = format!("{} {}", glyph, self.message);
        buf.set_stringn(
            area.x,
            area.y,
            &line,
            area.width as usize,
            Style::default().fg(config.theme.muted_fg),
        );
    }

    fn clone_box(&self) -> Box<dyn ElementWidget> {
        Box::new(self.clone())
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(1)
    }
}
