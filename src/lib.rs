//! # Badgeboard
//!
//! A small team achievement board with:
//! - An in-memory record store for members and their badges
//! - Referential integrity between achievements and members
//! - CSV mirrors rewritten on every mutation
//! - Single-writer/multi-reader concurrency model
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Worker Thread Pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Request Handler                            │
//! │          (Input Validation, Upload Naming, JSON)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Record Store                              │
//! │     (RwLock: members + achievements + id allocators)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  full rewrite per mutation
//!                       ▼
//!               ┌───────────────┐
//!               │ Durable Codec │
//!               │     (CSV)     │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod codec;
pub mod store;
pub mod uploads;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BoardError, Result};
pub use config::Config;
pub use model::{Achievement, Member};
pub use store::RecordStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Badgeboard
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
