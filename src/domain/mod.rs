//! Domain layer - pure logging concepts with no I/O.
//!
//! This layer contains the core vocabulary of the logger:
//! - Severities and their ordering
//! - Call site capture and rendering
//! - The per-window suppression policy
//! - Log records and counter identities
//!
//! All types in this layer are pure and easily testable.

pub mod counter;
pub mod location;
pub mod policy;
pub mod record;
pub mod severity;
