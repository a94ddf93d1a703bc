// OPUS stream parameters (in OGG container)
//
// The encoder produces an Ogg Opus stream:
// - Identification header: "OpusHead" (8 bytes) in first page
// - Comment header: "OpusTags" (8 bytes) followed by Vorbis Comment in second page
// - Audio data pages
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

pub mod comments;

use std::fmt;

use serde::Serialize;

use crate::error::EncoderError;
use crate::ogg::PageHeader;

pub use comments::{CommentEntry, CommentError, Comments, RecommendedTags};

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Channel mapping family passed to the encoder at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingFamily {
    /// Family 0: mono or stereo, no mapping table
    #[default]
    MonoStereo,
    /// Family 1: Vorbis channel order, up to 8 channels
    Surround,
}

impl MappingFamily {
    /// Highest channel count the family can carry
    pub fn max_channels(self) -> u8 {
        match self {
            MappingFamily::MonoStereo => 2,
            MappingFamily::Surround => 8,
        }
    }
}

impl fmt::Display for MappingFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingFamily::MonoStereo => write!(f, "mono/stereo"),
            MappingFamily::Surround => write!(f, "surround"),
        }
    }
}

/// Parameters of the PCM handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamSettings {
    /// Input sample rate in Hz
    pub rate: u32,
    /// Interleaved channel count
    pub channels: u8,
    pub family: MappingFamily,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            rate: 48_000,
            channels: 2,
            family: MappingFamily::MonoStereo,
        }
    }
}

impl StreamSettings {
    pub fn new(rate: u32, channels: u8, family: MappingFamily) -> Self {
        Self { rate, channels, family }
    }

    /// Reject parameters the encoder would refuse at creation
    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.rate == 0 || self.rate > i32::MAX as u32 {
            return Err(EncoderError::BadArg);
        }
        if self.channels == 0 || self.channels > self.family.max_channels() {
            return Err(EncoderError::BadArg);
        }
        Ok(())
    }
}

/// What the first packet on a page carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketKind {
    Head,
    Tags,
    Audio,
}

impl PacketKind {
    /// Classify a page by the packet that starts on it.
    ///
    /// Continuation pages start mid-packet and always count as audio.
    pub fn of_page(header: &PageHeader, data: &[u8]) -> Self {
        if header.is_continuation() {
            return PacketKind::Audio;
        }
        match header.body(data) {
            Some(body) if body.starts_with(OPUS_SIGNATURE) => PacketKind::Head,
            Some(body) if body.starts_with(OPUS_TAGS) => PacketKind::Tags,
            _ => PacketKind::Audio,
        }
    }
}
