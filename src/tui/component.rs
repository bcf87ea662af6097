use ratatui::{buffer::Buffer, layout::Rect};
use std::future::Future;
use std::pin::Pin;

use super::action::Action;
use crate::config::DisplayConfig;
use crate::data_provider::PlayerQuery;
use crate::i18n::Language;
use crate::metadata::ExtendedStats;
use crate::types::GameMode;

/// Core component trait - like React.Component
///
/// Components receive a slice of state as props and render to an Element
/// tree. None of the player view's components keep local state.
pub trait Component {
    type Props;

    /// Render component given props (pure function)
    fn view(&self, props: &Self::Props) -> Element;
}

/// Element in virtual component tree
#[derive(Clone)]
pub enum Element {
    /// A widget that can be directly rendered to ratatui buffer
    Widget(Box<dyn ElementWidget>),

    /// A container with layout and children
    Container {
        children: Vec<Element>,
        layout: ContainerLayout,
    },

    /// Nothing to render
    None,
}

impl Element {
    pub fn is_none(&self) -> bool {
        matches!(self, Element::None)
    }

    /// Height the element asks for, summing vertical children
    pub fn preferred_height(&self) -> Option<u16> {
        match self {
            Element::Widget(widget) => widget.preferred_height(),
            Element::Container {
                children,
                layout: ContainerLayout::Vertical(_),
            } => children
                .iter()
                .map(Element::preferred_height)
                .try_fold(0u16, |acc, h| h.map(|h| acc.saturating_add(h))),
            Element::Container {
                children,
                layout: ContainerLayout::Horizontal(_),
            } => children
                .iter()
                .map(Element::preferred_height)
                .try_fold(0u16, |acc, h| h.map(|h| acc.max(h))),
            Element::None => Some(0),
        }
    }
}

/// Layout for container elements
#[derive(Clone, Debug, PartialEq)]
pub enum ContainerLayout {
    Vertical(Vec<Constraint>),
    Horizontal(Vec<Constraint>),
}

/// Constraint for layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constraint {
    Length(u16),
    Min(u16),
    Max(u16),
    Percentage(u16),
    Ratio(u32, u32),
}

/// Side effects returned by the reducer
///
/// `Action`, `Batch` and `Async` go straight to the effect executor. The
/// remaining variants need the runtime's `DataEffects` and are turned into
/// async effects by `Runtime::execute_effect`.
pub enum Effect {
    None,
    Action(Action),
    Batch(Vec<Effect>),
    Async(Pin<Box<dyn Future<Output = Action> + Send>>),
    /// Hand the view the adapter for `query`; `fresh` discards the reused one
    LoadAdapter {
        query: Option<PlayerQuery>,
        fresh: bool,
    },
    /// Wait for a deferred switch's extended stats
    AwaitStats { epoch: u64, stats: ExtendedStats },
    FetchSameMatch(PlayerQuery),
    SaveModePreference {
        player_id: u32,
        modes: Vec<GameMode>,
    },
    SaveLanguage(Language),
}

impl Effect {
    /// Combine two effects, dropping `None`s
    pub fn and(self, other: Effect) -> Effect {
        match (self, other) {
            (Effect::None, other) => other,
            (effect, Effect::None) => effect,
            (Effect::Batch(mut effects), other) => {
                effects.push(other);
                Effect::Batch(effects)
            }
            (effect, other) => Effect::Batch(vec![effect, other]),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "None"),
            Effect::Action(action) => write!(f, "Action({:?})", action),
            Effect::Batch(effects) => f.debug_list().entries(effects).finish(),
            Effect::Async(_) => write!(f, "Async(..)"),
            Effect::LoadAdapter { query, fresh } => f
                .debug_struct("LoadAdapter")
                .field("query", query)
                .field("fresh", fresh)
                .finish(),
            Effect::AwaitStats { epoch, .. } => write!(f, "AwaitStats({})", epoch),
            Effect::FetchSameMatch(query) => write!(f, "FetchSameMatch({:?})", query),
            Effect::SaveModePreference { player_id, modes } => {
                write!(f, "SaveModePreference({}, {:?})", player_id, modes)
            }
            Effect::SaveLanguage(language) => write!(f, "SaveLanguage({})", language),
        }
    }
}

/// Trait for widgets that can be wrapped in the Element tree
pub trait ElementWidget: Send + Sync {
    /// Render this widget into the provided buffer
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig);

    /// Clone this widget into a boxed trait object
    fn clone_box(&self) -> Box<dyn ElementWidget>;

    /// Returns None if the widget can adapt to any height
    fn preferred_height(&self) -> Option<u16> {
        None
    }
}

impl Clone for Box<dyn ElementWidget> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Helper to create a container with vertical layout
pub fn vertical<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Vertical(constraints.to_vec()),
    }
}

/// Helper to create a container with horizontal layout
pub fn horizontal<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Horizontal(constraints.to_vec()),
    }
}

/// Stack children vertically, each at its preferred height; the last one
/// takes the remaining space
pub fn stack(children: Vec<Element>) -> Element {
    let children: Vec<Element> = children.into_iter().filter(|c| !c.is_none()).collect();
    let last = children.len().saturating_sub(1);
    let constraints = children
        .iter()
        .enumerate()
        .map(|(i, child)| match child.preferred_height() {
            Some(h) if i != last => Constraint::Length(h),
            _ => Constraint::Min(0),
        })
        .collect();
    Element::Container {
        children,
        layout: ContainerLayout::Vertical(constraints),
    }
}
