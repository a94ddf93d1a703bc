// CLI module for oggpull
//
// Command-line front end for the streaming driver. It is only compiled into
// the binary, not the library.

pub mod commands;
pub mod config;
pub mod output;

pub use config::Config;
pub use output::OutputFormatter;
