pub mod commands;
pub mod interactive;
pub mod render;
pub mod setup;
pub mod ui;
