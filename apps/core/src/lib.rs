//! Whisper service core: free text in, a four-part whisper out.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod fs_manager;
pub mod telemetry;
pub mod whisper;

#[cfg(test)]
mod tests;
