//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Configuration validation
//! - Rate limiter (per-location suppression decisions)
//! - Limiter reset task (periodic wholesale reset)
//! - Message formatter (text and JSON lines)
//! - Output sink (serialized writes)
//! - Terminal severity actions
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod config;
pub mod formatter;
pub mod limiter;
pub mod ports;
pub mod reset;
pub mod sink;
pub mod terminal;
