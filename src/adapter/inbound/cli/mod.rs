//! CLI module graph.

pub mod command;
pub mod config;
pub mod contests;
pub mod output;
pub mod run;
pub mod session;
