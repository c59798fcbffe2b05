// Command-line front end: argument model, command table and handlers.

pub mod adjust;
pub mod args;
pub mod commands;
pub mod error;
