pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod seed;
pub mod state;
pub mod templates;
pub mod views;

pub use router::app_router;
pub use state::AppState;
