//! oggpull - stream raw PCM through a pull-mode Ogg Opus encoder
//!
//! The crate does no encoding of its own. It reads fixed-size blocks of
//! interleaved 16-bit PCM, hands them to an external encoder through the
//! [`encoder::PullEncoder`] trait, polls for finished OGG pages and passes
//! each one to a [`sink::PageSink`].
//!
//! ```no_run
//! use std::path::Path;
//! use oggpull::{encoder, Comments, Driver, StreamSettings};
//! use oggpull::sink::NullSink;
//!
//! let mut driver = Driver::new(encoder::default_backend(), StreamSettings::default());
//! let report = driver.run(Path::new("input.pcm"), &Comments::with_defaults(), &mut NullSink)?;
//! println!("{} pages", report.pages.len());
//! # Ok::<(), oggpull::DriverError>(())
//! ```

pub mod driver;
pub mod encoder;
pub mod error;
pub mod ogg;
pub mod opus;
pub mod pcm;
pub mod sink;
mod utils;

pub use driver::{Driver, PageRecord, SessionReport, SessionState};
pub use error::{DriverError, EncoderError};
pub use opus::{CommentEntry, Comments, MappingFamily, StreamSettings};
