use std::sync::Arc;
use tracing::trace;

use crate::metadata::PlayerMetadata;
use crate::stats::PlayerExtendedStats;
use crate::tui::component::{horizontal, stack, vertical, Component, Constraint, Element};
use crate::tui::state::AppState;
use crate::tui::types::SubView;

use super::bar_chart::{rank_rate_props, win_lose_props, BarChart};
use super::largest_lost::{LargestLost, LargestLostProps};
use super::player_header::{PlayerHeader, PlayerHeaderProps};
use super::recent_ranks::{RecentRanks, RecentRanksProps};
use super::same_match::{SameMatch, SameMatchProps};
use super::settings_bar::{ModeToggle, SettingsBar, SettingsBarProps};
use super::spinner::Spinner;
use super::stat_list::StatList;
use super::stat_views::{basic_rows, extended_rows, luck_rows, riichi_rows};
use super::tabbed_panel::{TabItem, TabbedPanel, TabbedPanelProps};
use super::text::{Text, TextLine, Tone};
use super::StatusBar;

/// Root App component
///
/// Renders the player details page from the global AppState: header, the
/// two stat columns over the settings bar, and the status bar.
pub struct App;

impl Component for App {
    type Props = AppState;

    fn view(&self, props: &Self::Props) -> Element {
        trace!("APP: App.view() for {}", props.page_path());
        vertical(
            [
                Constraint::Length(2), // Header (nickname + spinner line)
                Constraint::Min(0),    // Stats and settings bar
                Constraint::Length(2), // StatusBar (separator + content)
            ],
            vec![
                PlayerHeader.view(&self.header_props(props)),
                self.render_body(props),
                StatusBar.view(props),
            ],
        )
    }
}

impl App {
    fn header_props(&self, state: &AppState) -> PlayerHeaderProps {
        let i18n = &state.system.i18n;
        let player = state
            .player
            .displayed_metadata()
            .filter(|m| !m.nickname().is_empty())
            .map(|m| (m.id(), m.nickname().to_string()));
        let placeholder = if state.player.model.player().is_some() {
            i18n.t("加载中...")
        } else {
            i18n.t("未选择玩家")
        };
        PlayerHeaderProps {
            player,
            placeholder: placeholder.to_string(),
            changing: state
                .player
                .is_changing_settings()
                .then(|| i18n.t("正在切换...").to_string()),
        }
    }

    fn render_body(&self, state: &AppState) -> Element {
        if state.player.model.player().is_none() {
            return Element::None;
        }
        let i18n = &state.system.i18n;

        let content = match state.player.displayed_metadata() {
            Some(metadata) if state.player.has_metadata() => self.render_columns(state, &metadata),
            // Loaded, but nothing matches the current filters
            Some(_) => Text.view(&vec![TextLine::toned(i18n.t("无数据"), Tone::Muted)]),
            None => Spinner.view(&i18n.t("加载中...").to_string()),
        };

        vertical(
            [Constraint::Min(0), Constraint::Length(2)],
            vec![content, SettingsBar.view(&self.settings_props(state))],
        )
    }

    fn render_columns(&self, state: &AppState, metadata: &PlayerMetadata) -> Element {
        let i18n = &state.system.i18n;
        let recent = RecentRanksProps::from_adapter(
            state.player.reconciler.displayed().as_ref(),
            metadata.id(),
            i18n.t("最近走势"),
            i18n.t("无数据"),
        );

        let active = state.navigation.sub_view;
        let tabs = SubView::ALL
            .iter()
            .map(|&view| {
                let content = if view == active {
                    self.render_sub_view(state, metadata, view)
                } else {
                    Element::None
                };
                TabItem::new(view.title_key(), i18n.t(view.title_key()), content)
            })
            .collect();

        let left = stack(vec![
            RecentRanks.view(&recent),
            TabbedPanel.view(&TabbedPanelProps {
                active_key: active.title_key().to_string(),
                tabs,
                focused: !state.navigation.settings_focused,
            }),
        ]);
        let right = BarChart.view(&rank_rate_props(i18n, &metadata.summary));

        horizontal(
            [Constraint::Percentage(60), Constraint::Percentage(40)],
            vec![left, right],
        )
    }

    /// Content of one sub-view; views built from extended stats render
    /// nothing until the stats resolve
    fn render_sub_view(&self, state: &AppState, metadata: &PlayerMetadata, view: SubView) -> Element {
        let i18n = &state.system.i18n;
        let stats: Option<Arc<PlayerExtendedStats>> = metadata.extended_stats.peek();

        match view {
            SubView::Basic => StatList.view(&basic_rows(i18n, metadata)),
            SubView::Extended => StatList.view(&extended_rows(i18n, metadata, stats.as_deref())),
            SubView::SameMatch => {
                if state.player.is_changing_settings() {
                    Element::None
                } else {
                    SameMatch.view(&SameMatchProps {
                        same_match: state.player.same_match.clone(),
                        i18n: i18n.clone(),
                    })
                }
            }
            _ => {
                let Some(stats) = stats else {
                    return Element::None;
                };
                match view {
                    SubView::Riichi => StatList.view(&riichi_rows(i18n, &stats)),
                    SubView::WinLose => BarChart.view(&win_lose_props(i18n, &stats)),
                    SubView::Luck => StatList.view(&luck_rows(i18n, &stats)),
                    SubView::LargestLost => LargestLost.view(&LargestLostProps {
                        loss: stats.largest_loss.clone(),
                        player_id: metadata.id(),
                        i18n: i18n.clone(),
                    }),
                    _ => Element::None,
                }
            }
        }
    }

    fn settings_props(&self, state: &AppState) -> SettingsBarProps {
        let i18n = &state.system.i18n;
        let selected = state
            .player
            .model
            .player()
            .map(|p| p.selected_modes.as_slice())
            .unwrap_or_default();
        SettingsBarProps {
            mode_label: i18n.t("模式").to_string(),
            modes: state
                .offered_modes()
                .iter()
                .map(|mode| ModeToggle {
                    label: i18n.t(mode.label_key()).to_string(),
                    selected: selected.contains(mode),
                })
                .collect(),
            cursor: state.navigation.mode_cursor,
            focused: state.navigation.settings_focused,
            date_label: i18n.t("日期").to_string(),
            date_value: i18n.t(state.player.date_preset.label_key()).to_string(),
            language_label: i18n.t("语言").to_string(),
            language_value: i18n.language().native_name().to_string(),
        }
    }
}
