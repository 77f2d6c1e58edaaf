//! Services layer (ports + adapters).
//!
//! - `ports`: data contracts shared by the engine and its consumers.
//! - `adapters`: filesystem/runtime implementations.

pub mod adapters;
pub mod ports;
