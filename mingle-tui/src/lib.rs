// Library interface for the mingle crate (for testing purposes)

#[macro_use]
pub mod logging;

pub mod api;
pub mod app;
pub mod config;
pub mod form;
pub mod session;
pub mod terminal;
pub mod ui;
