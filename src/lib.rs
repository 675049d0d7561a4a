//! CodeTribe: a collaborative code editor session core served over WebSocket.

pub mod api;
pub mod app;
pub mod executor;
pub mod languages;
pub mod preview;
pub mod protocol;
pub mod session;
pub mod state;
pub mod transport;
pub mod types;
pub mod ws;
