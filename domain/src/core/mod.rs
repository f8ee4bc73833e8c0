//! Core domain primitives: provider identity and configuration.

pub mod provider;
