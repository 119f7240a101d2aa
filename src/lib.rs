//! Single-screen terminal to-do list with local persistence.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod store;
pub mod task;
pub mod task_list;
pub mod ui;
