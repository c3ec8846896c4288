pub mod api;
pub mod config;
pub mod demo_feed;
pub mod difficulty;
pub mod entry_store;
pub mod fixture_map;
pub mod grid_export;
pub mod http_client;
pub mod provider;
pub mod rating;
pub mod session;
pub mod state;
pub mod view;
