// Page sinks
//
// A sink receives every page the driver pulls out of the encoder. Page bytes
// are borrowed from the encoder and must be consumed before the call returns.
// Pages the encoder still holds after it has been drained (the end-of-stream
// page) go to `drained_page`; only sinks that store the stream take them.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::ogg::PageHeader;

/// One page pulled out of the encoder
#[derive(Debug)]
pub struct PageEvent<'a> {
    /// Position of the page in the session, starting at 0
    pub index: usize,
    /// Page bytes, valid only for the duration of the sink call
    pub data: &'a [u8],
    /// Produced by the flush poll at end of input
    pub final_flush: bool,
    /// Parsed header, `None` if the bytes are not an OGG page
    pub header: Option<PageHeader>,
}

impl PageEvent<'_> {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

pub trait PageSink {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()>;

    /// A page retrieved after drain. Ignored unless the sink keeps the stream.
    fn drained_page(&mut self, _data: &[u8]) -> io::Result<()> {
        Ok(())
    }

    /// Called once after the encoder has been drained
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: PageSink + ?Sized> PageSink for &mut S {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        (**self).page_ready(event)
    }

    fn drained_page(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).drained_page(data)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

impl<S: PageSink> PageSink for Option<S> {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        match self {
            Some(sink) => sink.page_ready(event),
            None => Ok(()),
        }
    }

    fn drained_page(&mut self, data: &[u8]) -> io::Result<()> {
        match self {
            Some(sink) => sink.drained_page(data),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        match self {
            Some(sink) => sink.finish(),
            None => Ok(()),
        }
    }
}

impl<A: PageSink, B: PageSink> PageSink for (A, B) {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        self.0.page_ready(event)?;
        self.1.page_ready(event)
    }

    fn drained_page(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.drained_page(data)?;
        self.1.drained_page(data)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.0.finish()?;
        self.1.finish()
    }
}

/// Discards pages
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl PageSink for NullSink {
    fn page_ready(&mut self, _event: &PageEvent<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Appends page bytes to a writer
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer, written: 0 }
    }

    /// Bytes written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> WriterSink<W> {
    fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }
}

impl<W: Write> PageSink for WriterSink<W> {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        self.append(event.data)
    }

    fn drained_page(&mut self, data: &[u8]) -> io::Result<()> {
        self.append(data)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes pages to a file created when the first page arrives
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    inner: Option<WriterSink<BufWriter<File>>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink {
            path: path.into(),
            inner: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> u64 {
        self.inner.as_ref().map_or(0, WriterSink::written)
    }

    fn writer(&mut self) -> io::Result<&mut WriterSink<BufWriter<File>>> {
        let writer = match self.inner.take() {
            Some(writer) => writer,
            None => {
                let file = File::create(&self.path)?;
                log::debug!("writing pages to {}", self.path.display());
                WriterSink::new(BufWriter::new(file))
            }
        };
        Ok(self.inner.insert(writer))
    }
}

impl PageSink for FileSink {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        self.writer()?.page_ready(event)
    }

    fn drained_page(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer()?.drained_page(data)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.finish()
    }
}
