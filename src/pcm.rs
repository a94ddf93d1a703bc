// Raw PCM input
//
// Input is interleaved signed 16-bit little-endian samples with no header.
// Blocks are read a fixed number of sample-frames at a time into a reusable
// buffer.

use std::io::{self, Read};

use crate::utils::io::read_full;

/// Bytes per 16-bit sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Sample-frames requested per read
pub const DEFAULT_FRAMES_PER_READ: usize = 256;

/// Reusable block of interleaved samples
#[derive(Debug, Clone)]
pub struct SampleBlock {
    channels: usize,
    samples: Vec<i16>,
    frames: usize,
}

impl SampleBlock {
    pub fn new(channels: usize, frames_per_read: usize) -> Self {
        let channels = channels.max(1);
        SampleBlock {
            channels,
            samples: vec![0; channels * frames_per_read.max(1)],
            frames: 0,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Sample-frames the block can hold
    pub fn capacity_frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Sample-frames filled by the last read
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Valid interleaved samples from the last read
    pub fn samples(&self) -> &[i16] {
        &self.samples[..self.frames * self.channels]
    }

    fn fill_le(&mut self, bytes: &[u8]) {
        let count = bytes.len() / BYTES_PER_SAMPLE;
        for (sample, chunk) in self.samples[..count]
            .iter_mut()
            .zip(bytes.chunks_exact(BYTES_PER_SAMPLE))
        {
            *sample = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
        self.frames = count / self.channels;
    }
}

/// Reads sample blocks from any byte source
pub struct SampleReader<R> {
    inner: R,
    channels: usize,
    bytes: Vec<u8>,
    discarded: usize,
}

impl<R: Read> SampleReader<R> {
    pub fn new(inner: R, channels: usize) -> Self {
        SampleReader {
            inner,
            channels: channels.max(1),
            bytes: Vec::new(),
            discarded: 0,
        }
    }

    /// Fill `block` with up to its capacity of sample-frames.
    ///
    /// Returns the number of frames read. Fewer than requested means the input
    /// ended; zero means there was nothing left. A trailing partial frame is
    /// dropped.
    pub fn read_block(&mut self, block: &mut SampleBlock) -> io::Result<usize> {
        debug_assert_eq!(block.channels(), self.channels);
        let frame_bytes = self.channels * BYTES_PER_SAMPLE;
        let wanted = block.capacity_frames() * frame_bytes;
        self.bytes.resize(wanted, 0);

        let filled = read_full(&mut self.inner, &mut self.bytes[..wanted])?;
        let usable = filled - filled % frame_bytes;
        if usable < filled {
            let dropped = filled - usable;
            self.discarded += dropped;
            log::warn!(
                "input ended mid-frame, dropping {} trailing byte(s)",
                dropped
            );
        }

        block.fill_le(&self.bytes[..usable]);
        Ok(block.frames())
    }

    /// Trailing bytes dropped because they did not make up a whole frame
    pub fn discarded_bytes(&self) -> usize {
        self.discarded
    }
}
