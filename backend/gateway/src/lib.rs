pub mod health_api;
pub mod server;
pub mod vision_api;

pub use server::{build_router, start_server, GatewayState};
