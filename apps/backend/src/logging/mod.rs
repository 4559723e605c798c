//! Logging helpers shared by the infra layer.

pub mod pii;
