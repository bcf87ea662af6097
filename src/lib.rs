pub mod adapter;
pub mod cache;
pub mod commands;
pub mod config;
pub mod data_provider;
pub mod fixtures;
pub mod formatting;
pub mod i18n;
pub mod metadata;
pub mod model;
pub mod preference;
pub mod records;
pub mod reconcile;
pub mod stats;
pub mod tracker;
pub mod tui;
pub mod types;
