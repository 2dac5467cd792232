pub mod clock;
pub mod scheduler;

/// Milliseconds on whatever monotonic timeline the adapter drives the core with.
pub type Millis = u64;
