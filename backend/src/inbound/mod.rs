//! Inbound adapters for the hexagonal boundary.

pub mod http;
