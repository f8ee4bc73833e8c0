//! Idea records and lenient extraction from freeform answers.

pub mod extract;
pub mod record;
