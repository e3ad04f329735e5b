pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod store;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;
pub use store::ReviewStore;
