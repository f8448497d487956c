//! Persistent tower storage

pub mod towers;

pub use towers::TowerStore;
