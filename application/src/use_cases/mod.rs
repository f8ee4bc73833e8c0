//! Application use cases.

pub mod brainstorm;
pub mod dispatch;
pub mod reconcile;
