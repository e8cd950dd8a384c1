//! The service boundary: per-table serializers, the subscription hub,
//! view projection, sessions and the transport adapters.

pub mod dispatch;
pub mod http;
pub mod hub;
pub mod run;
pub mod session;
pub mod state;
pub mod table;
pub mod views;
pub mod ws;

pub use dispatch::dispatch_client_message;
pub use run::{build_router, run_server};
pub use state::AppState;
