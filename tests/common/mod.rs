// Shared helpers for integration tests
//
// `ScriptedBackend` stands in for the native encoder. It buffers submitted
// frames and emits a page each time a full page worth of frames is buffered,
// or whatever is left when polled with flush. Draining an encoder that saw
// any samples leaves one end-of-stream page behind, handed out by the next
// poll. Every call and release is recorded in a shared log so tests can check
// ordering.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

use oggpull::encoder::{EncoderBackend, PullEncoder};
use oggpull::opus::{Comments, StreamSettings};
use oggpull::EncoderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BuildComments(usize),
    Create,
    Write(usize),
    Poll { flush: bool, page: Option<usize> },
    Drain,
    /// Poll made after the drain
    Collect { page: Option<usize> },
    DestroyEncoder,
    DestroyComments,
    CloseInput,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Position of the first call matching `pred`
pub fn position(log: &CallLog, pred: impl Fn(&Call) -> bool) -> Option<usize> {
    log.borrow().iter().position(pred)
}

pub fn count(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
    log.borrow().iter().filter(|c| pred(c)).count()
}

/// Interleaved stereo PCM with `frames` sample-frames
pub fn stereo_pcm(frames: usize) -> Vec<u8> {
    (0..frames * 2)
        .flat_map(|i| ((i as i16).wrapping_mul(37)).to_le_bytes())
        .collect()
}

/// Build a minimal OGG page with a body of `body_len` bytes
pub fn ogg_page(sequence: u32, granule: u64, header_type: u8, body: &[u8]) -> Vec<u8> {
    let mut segments = Vec::new();
    let mut remaining = body.len();
    loop {
        let lace = remaining.min(255);
        segments.push(lace as u8);
        remaining -= lace;
        if lace < 255 {
            break;
        }
    }

    let mut page = Vec::new();
    page.extend_from_slice(b"OggS");
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&0x0bad_cafeu32.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&0u32.to_le_bytes());
    page.push(segments.len() as u8);
    page.extend_from_slice(&segments);
    page.extend_from_slice(body);
    page
}

pub struct ScriptedBackend {
    pub log: CallLog,
    pub frames_per_page: usize,
    pub fail_comments: Option<EncoderError>,
    pub fail_create: Option<EncoderError>,
    pub fail_write: Option<EncoderError>,
}

impl ScriptedBackend {
    pub fn new(log: &CallLog) -> Self {
        ScriptedBackend {
            log: log.clone(),
            frames_per_page: 960,
            fail_comments: None,
            fail_create: None,
            fail_write: None,
        }
    }
}

pub struct ScriptedComments {
    log: CallLog,
}

impl Drop for ScriptedComments {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::DestroyComments);
    }
}

pub struct ScriptedEncoder {
    log: CallLog,
    channels: usize,
    frames_per_page: usize,
    buffered: usize,
    granule: u64,
    sequence: u32,
    fail_write: Option<EncoderError>,
    written: u64,
    drained: bool,
    trailer: Option<Vec<u8>>,
    page: Vec<u8>,
}

impl ScriptedEncoder {
    fn take_page(&mut self, frames: usize) -> &[u8] {
        self.buffered -= frames;
        self.granule += frames as u64;
        let body = vec![0x5a; frames / 8 + 1];
        self.page = ogg_page(self.sequence, self.granule, 0, &body);
        self.sequence += 1;
        &self.page
    }
}

impl PullEncoder for ScriptedEncoder {
    fn write(&mut self, pcm: &[i16]) -> Result<(), EncoderError> {
        let frames = pcm.len() / self.channels;
        self.log.borrow_mut().push(Call::Write(frames));
        if let Some(err) = &self.fail_write {
            return Err(err.clone());
        }
        self.buffered += frames;
        self.written += frames as u64;
        Ok(())
    }

    fn get_page(&mut self, flush: bool) -> Result<Option<&[u8]>, EncoderError> {
        if self.drained {
            return Ok(match self.trailer.take() {
                Some(page) => {
                    self.log.borrow_mut().push(Call::Collect {
                        page: Some(page.len()),
                    });
                    self.page = page;
                    Some(&self.page)
                }
                None => {
                    self.log.borrow_mut().push(Call::Collect { page: None });
                    None
                }
            });
        }

        let frames = if self.buffered >= self.frames_per_page {
            Some(self.frames_per_page)
        } else if flush && self.buffered > 0 {
            Some(self.buffered)
        } else {
            None
        };

        let log = self.log.clone();
        match frames {
            Some(frames) => {
                let page = self.take_page(frames);
                log.borrow_mut().push(Call::Poll {
                    flush,
                    page: Some(page.len()),
                });
                Ok(Some(page))
            }
            None => {
                log.borrow_mut().push(Call::Poll { flush, page: None });
                Ok(None)
            }
        }
    }

    fn drain(&mut self) -> Result<(), EncoderError> {
        self.log.borrow_mut().push(Call::Drain);
        if self.written > 0 {
            self.trailer = Some(ogg_page(self.sequence, self.granule, 0x04, &[]));
            self.sequence += 1;
        }
        self.drained = true;
        Ok(())
    }
}

impl Drop for ScriptedEncoder {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::DestroyEncoder);
    }
}

impl EncoderBackend for ScriptedBackend {
    type Comments = ScriptedComments;
    type Encoder = ScriptedEncoder;

    fn comments(&mut self, comments: &Comments) -> Result<ScriptedComments, EncoderError> {
        self.log.borrow_mut().push(Call::BuildComments(comments.len()));
        if let Some(err) = &self.fail_comments {
            return Err(err.clone());
        }
        Ok(ScriptedComments {
            log: self.log.clone(),
        })
    }

    fn create_pull(
        &mut self,
        _comments: &mut ScriptedComments,
        settings: &StreamSettings,
    ) -> Result<ScriptedEncoder, EncoderError> {
        self.log.borrow_mut().push(Call::Create);
        if let Some(err) = &self.fail_create {
            return Err(err.clone());
        }
        Ok(ScriptedEncoder {
            log: self.log.clone(),
            channels: settings.channels as usize,
            frames_per_page: self.frames_per_page,
            buffered: 0,
            granule: 0,
            sequence: 0,
            fail_write: self.fail_write.clone(),
            written: 0,
            drained: false,
            trailer: None,
            page: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Reader that records when it is dropped
pub struct TrackedInput<R> {
    inner: R,
    log: CallLog,
}

impl<R> TrackedInput<R> {
    pub fn new(inner: R, log: &CallLog) -> Self {
        TrackedInput {
            inner,
            log: log.clone(),
        }
    }
}

impl<R: Read> Read for TrackedInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R> Drop for TrackedInput<R> {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::CloseInput);
    }
}
