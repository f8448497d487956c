//! Core types and constants for the bus tracking system

pub mod types;
pub mod constants;
pub mod network;

pub use types::*;
pub use constants::*;
pub use network::operator_label;
