pub mod app;
pub mod config;
pub mod errors;
pub mod firestore;
pub mod gateway;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use gateway::PersistenceGateway;
pub use state::AppState;
pub use storage::{DocumentStore, build_store};
