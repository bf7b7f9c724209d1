//! # kasir-server: HTTP API for Kasir POS
//!
//! axum service wiring the kasir-db repositories to JSON endpoints.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier UI / back office ──► HTTP+JSON ──► kasir-server (THIS CRATE)  │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                   kasir-db ──► SQLite                   │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                   kasir-core (pure business logic)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library exposes [`routes::router`] so integration tests drive the
//! exact same router the binary serves.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
