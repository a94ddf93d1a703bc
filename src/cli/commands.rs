// CLI command implementations
use std::io::{self, Write};

use anyhow::Context;

use oggpull::encoder::{self, EncoderBackend};
use oggpull::sink::FileSink;
use oggpull::{Driver, DriverError, SessionReport};

use crate::cli::output::{ConsoleSink, OutputFormatter};
use crate::cli::Config;

/// Encode the configured input and print what the encoder produced
pub fn command_encode(config: &Config, formatter: &OutputFormatter) -> anyhow::Result<SessionReport> {
    let mut stdout = io::stdout().lock();
    encode_with(encoder::default_backend(), config, formatter, &mut stdout)
}

/// Run one encoding session on `backend`, printing page lines and the
/// report to `out`
pub fn encode_with<B: EncoderBackend, W: Write>(
    backend: B,
    config: &Config,
    formatter: &OutputFormatter,
    out: &mut W,
) -> anyhow::Result<SessionReport> {
    let comments = config.comments();
    let mut driver = Driver::new(backend, config.stream_settings())
        .with_frames_per_read(config.frames_per_read as usize);

    let console = ConsoleSink::new(formatter, out);
    let file = config.output.as_ref().map(FileSink::new);
    let mut sink = (console, file);

    let result = driver.run(&config.input, &comments, &mut sink);
    let (console, file) = sink;
    drop(console);
    let report = result.map_err(|err| match err {
        DriverError::Open { .. } => anyhow::Error::new(err),
        other => anyhow::Error::new(other)
            .context(format!("error encoding from file {}", config.input.display())),
    })?;

    if let Some(file) = &file {
        log::info!("wrote {} bytes to {}", file.written(), file.path().display());
    }

    formatter
        .output_report(&report, out)
        .context("cannot write report")?;
    Ok(report)
}
