use std::sync::Arc;

use crate::i18n::I18n;
use crate::records::GameRecord;
use crate::stats::{format_fan_summary, LargestLoss};
use crate::tui::component::{stack, Component, Element};

use super::stat_list::{StatList, StatRow};
use super::text::{Text, TextLine, Tone};

pub struct LargestLostProps {
    pub loss: Option<LargestLoss>,
    /// Seat the record link opens from
    pub player_id: u32,
    pub i18n: Arc<I18n>,
}

/// "最近大铳": the latest deal-in of mangan or more, yaku by yaku
pub struct LargestLost;

impl Component for LargestLost {
    type Props = LargestLostProps;

    fn view(&self, props: &Self::Props) -> Element {
        let i18n = &props.i18n;
        let Some(loss) = &props.loss else {
            return Text.view(&vec![TextLine::toned(i18n.t("无超过满贯大铳"), Tone::Muted)]);
        };

        let header = vec![
            TextLine::toned(format_fan_summary(&loss.fans), Tone::Accent),
            TextLine::new(GameRecord::format_full_start_time(loss.start_time)),
            TextLine::toned(
                format!(
                    "{}: {}",
                    i18n.t("查看牌谱"),
                    GameRecord::record_link(&loss.id, props.player_id)
                ),
                Tone::Muted,
            ),
            TextLine::new(""),
        ];
        let fans: Vec<StatRow> = loss
            .fans
            .iter()
            .map(|fan| StatRow::new(fan.label.clone(), fan.format_fan()))
            .collect();

        stack(vec![Text.view(&header), StatList.view(&fans)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::stats::FanStatEntry;
    use crate::tui::renderer::Renderer;
    use crate::tui::testing::{buffer_contains, buffer_lines, test_i18n};
    use ratatui::{buffer::Buffer, layout::Rect};

    fn render(props: &LargestLostProps) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 10));
        Renderer::new().render(LargestLost.view(props), buf.area, &mut buf, &DisplayConfig::default());
        buf
    }

    fn fan(label: &str, count: u32) -> FanStatEntry {
        FanStatEntry {
            label: label.to_string(),
            count,
            yakuman: 0,
        }
    }

    #[test]
    fn test_no_loss_shows_placeholder() {
        let props = LargestLostProps {
            loss: None,
            player_id: 1,
            i18n: test_i18n(),
        };
        let buf = render(&props);
        assert_eq!(buffer_lines(&buf)[0].trim_end(), "无超过满贯大铳");
    }

    #[test]
    fn test_loss_lists_summary_link_and_fans() {
        let props = LargestLostProps {
            loss: Some(LargestLoss {
                id: "240301-abc".to_string(),
                start_time: 1_709_290_000,
                fans: vec![fan("立直", 1), fan("断幺九", 1), fan("宝牌", 4)],
            }),
            player_id: 77,
            i18n: test_i18n(),
        };
        let buf = render(&props);
        let lines = buffer_lines(&buf);

        assert_eq!(lines[0].trim_end(), "跳满 6番");
        assert!(lines[2].contains(&GameRecord::record_link("240301-abc", 77)));
        assert!(buffer_contains(&buf, "断幺九  1番"));
        assert!(buffer_contains(&buf, "宝牌    4番"));
    }
}
