//! Usage telemetry sinks.

pub mod jsonl;

pub use jsonl::JsonlUsageLogger;
