//! Generation request/result value objects.

pub mod request;
pub mod result;
