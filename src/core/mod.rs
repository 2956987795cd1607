//! Core library components.
//!
//! Each pipeline stage lives in its own module and talks to the outside
//! world only through [`process::Runner`].

pub mod catalog;
pub mod config;
pub mod constants;
pub mod delivery;
pub mod entry;
pub mod menu;
pub mod pipeline;
pub mod process;
pub mod types;
