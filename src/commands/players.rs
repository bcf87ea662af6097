use anyhow::{Context, Result};
use unicode_width::UnicodeWidthStr;

use crate::config::DisplayConfig;
use crate::data_provider::{PlayerListing, RecordSource};
use crate::formatting::format_header;
use crate::i18n::I18n;
use crate::types::account_zone_tag;

/// Width of the account id column
const ID_COL_WIDTH: usize = 11;

/// Width of the record count column
const COUNT_COL_WIDTH: usize = 6;

/// Pad `text` to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

pub fn format_players(players: &[PlayerListing], i18n: &I18n, display: &DisplayConfig) -> String {
    let mut output = format_header(i18n.t("玩家"), true, display);
    if players.is_empty() {
        output.push_str(i18n.t("无数据"));
        output.push('\n');
        return output;
    }

    let name_width = players
        .iter()
        .map(|p| p.nickname.width() + 2)
        .max()
        .unwrap_or(0)
        .max(i18n.t("昵称").width());

    output.push_str(&format!(
        "{:>id$}  {}  {:>count$}  {}\n",
        "ID",
        pad(i18n.t("昵称"), name_width),
        i18n.t("场数"),
        i18n.t("等级"),
        id = ID_COL_WIDTH,
        count = COUNT_COL_WIDTH,
    ));
    for player in players {
        let name = format!("{} {}", account_zone_tag(player.account_id), player.nickname);
        output.push_str(&format!(
            "{:>id$}  {}  {:>count$}  {}\n",
            player.account_id,
            pad(&name, name_width),
            player.count,
            player.level.tag(),
            id = ID_COL_WIDTH,
            count = COUNT_COL_WIDTH,
        ));
    }
    output
}

pub async fn run(source: &dyn RecordSource, i18n: &I18n, display: &DisplayConfig) -> Result<()> {
    let players = source.players().await.context("Failed to list players")?;
    print!("{}", format_players(&players, i18n, display));
    Ok(())
}
