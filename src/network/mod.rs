//! Network Module
//!
//! TCP server, request handling and client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - Commands routed through `Handler` into the shared `RecordStore`

mod server;
mod connection;
mod handler;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use handler::Handler;
pub use client::Client;
