//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the process.
//!
//! # Tasks
//! - Reaper: physically removes dead cache and lock entries at a fixed
//!   short interval

mod reaper;

pub use reaper::spawn_reaper;
