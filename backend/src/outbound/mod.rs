//! Outbound adapters for the hexagonal boundary.

pub mod persistence;
