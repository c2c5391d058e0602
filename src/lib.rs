pub mod admin;
pub mod app;
pub mod config;
pub mod content;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod recorder;
pub mod routes;
pub mod sections;
pub mod state;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
