// Pull-mode encoder boundary
//
// The encoder is an external collaborator. Samples are pushed in, completed
// OGG pages are pulled out one poll at a time. Handles are released by `Drop`.

pub mod native;

use crate::error::EncoderError;
use crate::opus::{Comments, StreamSettings};

/// A live encoder instance
pub trait PullEncoder {
    /// Submit interleaved samples. The sample count must be a whole number of frames.
    fn write(&mut self, pcm: &[i16]) -> Result<(), EncoderError>;

    /// Take one completed page if the encoder has one.
    ///
    /// With `flush` set, buffered data is forced out as a page even if it is
    /// not naturally page-aligned. The returned bytes stay owned by the
    /// encoder and are only valid until the next call.
    fn get_page(&mut self, flush: bool) -> Result<Option<&[u8]>, EncoderError>;

    /// Finalize the stream. Pages produced by the drain stay available to
    /// `get_page` until it returns `None`.
    fn drain(&mut self) -> Result<(), EncoderError>;
}

/// Creates metadata and encoder handles
pub trait EncoderBackend {
    /// Native metadata handle, released on drop
    type Comments;
    type Encoder: PullEncoder;

    /// Build the native metadata handle from stream comments
    fn comments(&mut self, comments: &Comments) -> Result<Self::Comments, EncoderError>;

    /// Create a pull-mode encoder
    fn create_pull(
        &mut self,
        comments: &mut Self::Comments,
        settings: &StreamSettings,
    ) -> Result<Self::Encoder, EncoderError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

impl<B: EncoderBackend + ?Sized> EncoderBackend for &mut B {
    type Comments = B::Comments;
    type Encoder = B::Encoder;

    fn comments(&mut self, comments: &Comments) -> Result<Self::Comments, EncoderError> {
        (**self).comments(comments)
    }

    fn create_pull(
        &mut self,
        comments: &mut Self::Comments,
        settings: &StreamSettings,
    ) -> Result<Self::Encoder, EncoderError> {
        (**self).create_pull(comments, settings)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Backend used by the command line tool
pub type DefaultBackend = native::OpusEnc;

pub fn default_backend() -> DefaultBackend {
    DefaultBackend::default()
}
