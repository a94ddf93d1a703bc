// Error types for the encoder boundary and the streaming driver

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures at the encoder boundary.
///
/// `Native` carries the description the opusenc bindings give for a failed
/// libopusenc call. `BadArg` is raised before any native call, for settings
/// or tags the library would refuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("invalid argument")]
    BadArg,
    #[error("{0}")]
    Native(String),
}

impl From<opusenc::Error> for EncoderError {
    fn from(err: opusenc::Error) -> Self {
        EncoderError::Native(err.to_string())
    }
}

/// Errors surfaced by a streaming session.
///
/// Messages carry no cause text; print the chain (e.g. `{:#}` through anyhow)
/// to see the underlying error.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot open input file: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot build stream comments")]
    Comments(#[source] EncoderError),

    #[error("cannot create encoder")]
    Create(#[source] EncoderError),

    #[error("failed to read samples")]
    Read(#[source] io::Error),

    #[error("encoder rejected samples")]
    Submit(#[source] EncoderError),

    #[error("failed to poll encoder for a page")]
    Poll(#[source] EncoderError),

    #[error("failed to drain encoder")]
    Drain(#[source] EncoderError),

    #[error("page sink failed")]
    Sink(#[source] io::Error),
}

impl DriverError {
    /// The encoder code behind this error, if any
    pub fn encoder_error(&self) -> Option<EncoderError> {
        match self {
            DriverError::Comments(e)
            | DriverError::Create(e)
            | DriverError::Submit(e)
            | DriverError::Poll(e)
            | DriverError::Drain(e) => Some(e.clone()),
            _ => None,
        }
    }
}
