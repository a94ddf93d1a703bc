// CLI binary entry point for oggpull

mod cli;

use clap::Parser;
use std::process;

use cli::{commands, Config, OutputFormatter};

fn init_logging(config: &Config) {
    let level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let config = Config::parse();
    init_logging(&config);

    let formatter = OutputFormatter::new(config.format, config.quiet, config.verbose);
    if let Err(e) = commands::command_encode(&config, &formatter) {
        formatter.print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
