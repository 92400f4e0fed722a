pub mod browse;
pub mod clear;
pub mod config;
pub mod library;
pub mod prompts;
pub mod ui;
pub mod watch;
