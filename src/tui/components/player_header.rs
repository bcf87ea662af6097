use crate::tui::component::{vertical, Component, Constraint, Element};
use crate::types::account_zone_tag;

use super::spinner::Spinner;
use super::text::{Text, TextLine, Tone};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHeaderProps {
    /// Account id and nickname, once the metadata is known
    pub player: Option<(u32, String)>,
    /// Title shown when no player is known yet
    pub placeholder: String,
    /// Set while a settings change is loading; shown next to a spinner
    pub changing: Option<String>,
}

/// Zone tag and nickname, with a spinner line while settings change
pub struct PlayerHeader;

impl Component for PlayerHeader {
    type Props = PlayerHeaderProps;

    fn view(&self, props: &Self::Props) -> Element {
        let title = match &props.player {
            Some((id, nickname)) => {
                TextLine::toned(format!("{} {}", account_zone_tag(*id), nickname), Tone::Accent)
            }
            None => TextLine::toned(props.placeholder.clone(), Tone::Muted),
        };
        let status = match &props.changing {
            Some(message) => Spinner.view(message),
            None => Element::None,
        };

        vertical(
            [Constraint::Length(1), Constraint::Length(1)],
            vec![Text.view(&vec![title]), status],
        )
    }
}
