// Streaming encoder driver
//
// Reads PCM blocks, pushes them into a pull-mode encoder and forwards every
// page the encoder hands back to a sink. One session runs start to finish on
// the calling thread:
//
//   Uninitialized -> Streaming -> Draining -> Closing
//   Uninitialized -> Failed
//
// Resources are acquired in the order input, comments, encoder and released
// in reverse on every exit path. Pages still held by the encoder after the
// drain are collected in Closing and only reach the sink's `drained_page`.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::encoder::{EncoderBackend, PullEncoder};
use crate::error::DriverError;
use crate::ogg::PageHeader;
use crate::opus::{Comments, PacketKind, StreamSettings};
use crate::pcm::{SampleBlock, SampleReader, DEFAULT_FRAMES_PER_READ};
use crate::sink::{PageEvent, PageSink};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Streaming,
    Draining,
    Closing,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Streaming => "streaming",
            SessionState::Draining => "draining",
            SessionState::Closing => "closing",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of one emitted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub index: usize,
    pub size: usize,
    pub final_flush: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PacketKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<PageHeader>,
}

/// What a completed session did
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub backend: &'static str,
    pub settings: StreamSettings,
    pub comments: Comments,
    pub frames_per_read: usize,
    pub blocks_submitted: usize,
    pub frames_submitted: u64,
    pub discarded_bytes: usize,
    pub pages: Vec<PageRecord>,
    pub bytes_emitted: u64,
    /// Pages collected after the drain, not part of `pages`
    pub drained_pages: usize,
    pub drained_bytes: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SessionReport {
    /// `(final_flush, size)` of every emitted page, in emission order
    pub fn page_sizes(&self) -> Vec<(bool, usize)> {
        self.pages.iter().map(|p| (p.final_flush, p.size)).collect()
    }
}

/// Runs encoding sessions against one backend
pub struct Driver<B: EncoderBackend> {
    backend: B,
    settings: StreamSettings,
    frames_per_read: usize,
    state: SessionState,
}

impl<B: EncoderBackend> Driver<B> {
    pub fn new(backend: B, settings: StreamSettings) -> Self {
        Driver {
            backend,
            settings,
            frames_per_read: DEFAULT_FRAMES_PER_READ,
            state: SessionState::Uninitialized,
        }
    }

    /// Sample-frames requested per read (at least 1)
    pub fn with_frames_per_read(mut self, frames: usize) -> Self {
        self.frames_per_read = frames.max(1);
        self
    }

    pub fn frames_per_read(&self) -> usize {
        self.frames_per_read
    }

    /// State reached by the last session
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Encode the raw PCM file at `path`
    pub fn run<S: PageSink>(
        &mut self,
        path: &Path,
        comments: &Comments,
        sink: &mut S,
    ) -> Result<SessionReport, DriverError> {
        self.state = SessionState::Uninitialized;
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) => {
                self.transition(SessionState::Failed);
                return Err(DriverError::Open {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        log::debug!("opened input {}", path.display());

        let mut report = self.run_reader(file, comments, sink)?;
        report.input = Some(path.display().to_string());
        Ok(report)
    }

    /// Encode raw PCM from an already opened source.
    ///
    /// `input` is dropped before this returns, after the encoder and the
    /// comments handle.
    pub fn run_reader<R: Read, S: PageSink>(
        &mut self,
        input: R,
        comments: &Comments,
        sink: &mut S,
    ) -> Result<SessionReport, DriverError> {
        self.state = SessionState::Uninitialized;
        let started_at = Utc::now();
        let clock = Instant::now();
        let channels = self.settings.channels as usize;

        let mut reader = SampleReader::new(input, channels);

        let mut native_comments = match self.backend.comments(comments) {
            Ok(c) => c,
            Err(err) => {
                self.transition(SessionState::Failed);
                drop(reader);
                return Err(DriverError::Comments(err));
            }
        };

        let created = self
            .settings
            .validate()
            .and_then(|()| self.backend.create_pull(&mut native_comments, &self.settings));
        let mut encoder = match created {
            Ok(encoder) => encoder,
            Err(err) => {
                log::debug!("{} backend refused to create encoder: {}", self.backend.name(), err);
                self.transition(SessionState::Failed);
                drop(native_comments);
                drop(reader);
                return Err(DriverError::Create(err));
            }
        };
        log::debug!(
            "created {} encoder: {} Hz, {} channel(s), {}",
            self.backend.name(),
            self.settings.rate,
            self.settings.channels,
            self.settings.family
        );

        let mut report = SessionReport {
            input: None,
            backend: self.backend.name(),
            settings: self.settings,
            comments: comments.clone(),
            frames_per_read: self.frames_per_read,
            blocks_submitted: 0,
            frames_submitted: 0,
            discarded_bytes: 0,
            pages: Vec::new(),
            bytes_emitted: 0,
            drained_pages: 0,
            drained_bytes: 0,
            started_at,
            elapsed_ms: 0,
        };

        self.transition(SessionState::Streaming);
        let mut block = SampleBlock::new(channels, self.frames_per_read);
        loop {
            let frames = reader.read_block(&mut block).map_err(DriverError::Read)?;
            if frames == 0 {
                break;
            }

            encoder.write(block.samples()).map_err(DriverError::Submit)?;
            report.blocks_submitted += 1;
            report.frames_submitted += frames as u64;

            if let Some(page) = encoder.get_page(false).map_err(DriverError::Poll)? {
                emit(sink, &mut report, page, false)?;
            }
        }

        self.transition(SessionState::Draining);
        if let Some(page) = encoder.get_page(true).map_err(DriverError::Poll)? {
            emit(sink, &mut report, page, true)?;
        }
        encoder.drain().map_err(DriverError::Drain)?;

        self.transition(SessionState::Closing);
        while let Some(page) = encoder.get_page(false).map_err(DriverError::Poll)? {
            log::debug!("drained page: {} bytes", page.len());
            sink.drained_page(page).map_err(DriverError::Sink)?;
            report.drained_pages += 1;
            report.drained_bytes += page.len() as u64;
        }
        sink.finish().map_err(DriverError::Sink)?;
        report.discarded_bytes = reader.discarded_bytes();
        drop(encoder);
        drop(native_comments);
        drop(reader);

        report.elapsed_ms = clock.elapsed().as_millis() as u64;
        log::info!(
            "encoded {} frame(s) in {} block(s) into {} page(s), {} bytes",
            report.frames_submitted,
            report.blocks_submitted,
            report.pages.len(),
            report.bytes_emitted
        );
        Ok(report)
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("session {} -> {}", self.state, next);
        self.state = next;
    }
}

fn emit<S: PageSink>(
    sink: &mut S,
    report: &mut SessionReport,
    data: &[u8],
    final_flush: bool,
) -> Result<(), DriverError> {
    let header = PageHeader::parse(data);
    match &header {
        Some(h) => {
            log::debug!(
                "page {}: {} bytes, seq {}, granule {}{}",
                report.pages.len(),
                data.len(),
                h.page_sequence,
                h.granule_position,
                if h.is_eos() { ", eos" } else { "" }
            );
            if h.page_len() != data.len() {
                log::warn!(
                    "page header describes {} bytes but encoder returned {}",
                    h.page_len(),
                    data.len()
                );
            }
        }
        None => log::warn!("encoder returned {} bytes that are not an OGG page", data.len()),
    }

    let event = PageEvent {
        index: report.pages.len(),
        data,
        final_flush,
        header,
    };
    sink.page_ready(&event).map_err(DriverError::Sink)?;

    report.bytes_emitted += data.len() as u64;
    report.pages.push(PageRecord {
        index: event.index,
        size: data.len(),
        final_flush,
        kind: event.header.as_ref().map(|h| PacketKind::of_page(h, data)),
        header: event.header,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder;
    use crate::sink::NullSink;

    #[test]
    fn test_missing_input_fails_before_encoder() {
        let mut driver = Driver::new(encoder::default_backend(), StreamSettings::default());
        let err = driver
            .run(
                Path::new("/nonexistent/input.pcm"),
                &Comments::with_defaults(),
                &mut NullSink,
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/input.pcm"));
        assert_eq!(driver.state(), SessionState::Failed);
    }

    #[test]
    fn test_frames_per_read_has_floor() {
        let driver =
            Driver::new(encoder::default_backend(), StreamSettings::default()).with_frames_per_read(0);
        assert_eq!(driver.frames_per_read(), 1);
        assert_eq!(driver.state(), SessionState::Uninitialized);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Draining.to_string(), "draining");
        assert_eq!(
            serde_json::to_string(&SessionState::Closing).unwrap(),
            "\"closing\""
        );
    }
}
