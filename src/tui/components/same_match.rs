use std::sync::Arc;

use crate::formatting::format_percent;
use crate::i18n::I18n;
use crate::tui::component::{stack, Component, Element};
use crate::tui::state::SameMatchState;
use crate::types::account_zone_tag;

use super::stat_list::{StatList, StatRow};
use super::text::{Text, TextLine, Tone};

pub struct SameMatchProps {
    pub same_match: SameMatchState,
    pub i18n: Arc<I18n>,
}

/// "最常同桌": accounts the player shared the most tables with
pub struct SameMatch;

impl Component for SameMatch {
    type Props = SameMatchProps;

    fn view(&self, props: &Self::Props) -> Element {
        let i18n = &props.i18n;
        let state = &props.same_match;

        if let Some(error) = &state.error {
            return Text.view(&vec![TextLine::toned(error.clone(), Tone::Error)]);
        }
        let Some(entries) = &state.entries else {
            return Text.view(&vec![TextLine::toned(i18n.t("加载中..."), Tone::Muted)]);
        };
        if entries.is_empty() {
            return Text.view(&vec![TextLine::toned(i18n.t("无数据"), Tone::Muted)]);
        }

        let header = vec![TextLine::toned(
            format!("{} / {} / {}", i18n.t("对手"), i18n.t("同桌次数"), i18n.t("同桌率")),
            Tone::Muted,
        )];
        let rows: Vec<StatRow> = entries
            .iter()
            .map(|entry| {
                StatRow::new(
                    format!("{} {}", account_zone_tag(entry.account_id), entry.nickname),
                    entry.count.to_string(),
                )
                .with_description(format_percent(entry.rate))
            })
            .collect();

        stack(vec![Text.view(&header), StatList.view(&rows)])
    }
}
