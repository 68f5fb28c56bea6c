//! Task view-derivation engine and the front ends built on it.
//!
//! [`view`] turns a task collection plus search/filter/sort parameters into the
//! ordered rows to display and the badge counts. [`board`] and [`sharing`] are
//! the only mutators of the collection. Everything else (store, config, CLI
//! commands, terminal dashboard) consumes those.

pub mod board;
pub mod commands;
pub mod config;
pub mod models;
pub mod sharing;
pub mod storage;
pub mod tui;
pub mod view;
