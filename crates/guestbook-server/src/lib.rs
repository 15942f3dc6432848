pub mod config;
pub mod page;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use server::{build_router, start, AppState, ServerHandle};
