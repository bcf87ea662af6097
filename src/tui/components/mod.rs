// Component library exports

pub mod app;
pub mod bar_chart;
pub mod largest_lost;
pub mod player_header;
pub mod recent_ranks;
pub mod same_match;
pub mod settings_bar;
pub mod spinner;
pub mod stat_list;
pub mod stat_views;
pub mod status_bar;
pub mod tabbed_panel;
pub mod text;

pub use app::App;
pub use bar_chart::{BarChart, BarChartProps};
pub use largest_lost::{LargestLost, LargestLostProps};
pub use player_header::{PlayerHeader, PlayerHeaderProps};
pub use recent_ranks::{RecentRanks, RecentRanksProps};
pub use same_match::{SameMatch, SameMatchProps};
pub use settings_bar::{ModeToggle, SettingsBar, SettingsBarProps};
pub use spinner::Spinner;
pub use stat_list::{StatList, StatRow};
pub use status_bar::StatusBar;
pub use tabbed_panel::{TabItem, TabbedPanel, TabbedPanelProps};
pub use text::{Text, TextLine, Tone};
