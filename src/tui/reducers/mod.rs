pub mod navigation;
pub mod player;
pub mod settings;

pub use navigation::reduce_navigation;
pub use player::reduce_player;
pub use settings::reduce_settings;
