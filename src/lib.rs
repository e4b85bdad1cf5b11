// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod calculator;
pub mod config;
pub mod convert;
pub mod preset;
pub mod runtime;
pub mod theme;
