// Output formatting for CLI

use std::io::{self, Write};

use oggpull::sink::{PageEvent, PageSink};
use oggpull::SessionReport;

use crate::cli::config::OutputFormat;

/// Format and output session results
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
        }
    }

    /// Per-page lines are printed in text mode only
    pub fn shows_pages(&self) -> bool {
        self.format == OutputFormat::Text && !self.quiet
    }

    /// The line printed for one page
    pub fn page_line(&self, event: &PageEvent<'_>) -> String {
        if event.final_flush {
            format!("Found final page! size:{}", event.size())
        } else {
            format!("Found page! size:{}", event.size())
        }
    }

    /// Output the session report
    pub fn output_report(&self, report: &SessionReport, writer: &mut impl Write) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.verbose && !self.quiet {
                    writeln!(
                        writer,
                        "{} frames in {} blocks -> {} pages, {} bytes ({} ms)",
                        report.frames_submitted,
                        report.blocks_submitted,
                        report.pages.len(),
                        report.bytes_emitted,
                        report.elapsed_ms
                    )?;
                }
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(report)?)?;
            }
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
            }
        }
        Ok(())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Prints one line per page
pub struct ConsoleSink<'a, W: Write> {
    formatter: &'a OutputFormatter,
    out: &'a mut W,
}

impl<'a, W: Write> ConsoleSink<'a, W> {
    pub fn new(formatter: &'a OutputFormatter, out: &'a mut W) -> Self {
        Self { formatter, out }
    }
}

impl<W: Write> PageSink for ConsoleSink<'_, W> {
    fn page_ready(&mut self, event: &PageEvent<'_>) -> io::Result<()> {
        if self.formatter.shows_pages() {
            writeln!(self.out, "{}", self.formatter.page_line(event))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use oggpull::{Comments, PageRecord, StreamSettings};

    fn event(data: &[u8], final_flush: bool) -> PageEvent<'_> {
        PageEvent {
            index: 0,
            data,
            final_flush,
            header: None,
        }
    }

    fn report() -> SessionReport {
        SessionReport {
            input: Some("in.pcm".to_string()),
            backend: "test",
            settings: StreamSettings::default(),
            comments: Comments::with_defaults(),
            frames_per_read: 256,
            blocks_submitted: 1,
            frames_submitted: 256,
            discarded_bytes: 0,
            pages: vec![PageRecord {
                index: 0,
                size: 47,
                final_flush: true,
                kind: None,
                header: None,
            }],
            bytes_emitted: 47,
            drained_pages: 0,
            drained_bytes: 0,
            started_at: Utc::now(),
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_page_lines() {
        let formatter = OutputFormatter::new(OutputFormat::Text, false, false);
        assert_eq!(formatter.page_line(&event(&[0; 19], false)), "Found page! size:19");
        assert_eq!(formatter.page_line(&event(&[0; 3], true)), "Found final page! size:3");
        assert!(formatter.shows_pages());
        assert!(!OutputFormatter::new(OutputFormat::Text, true, false).shows_pages());
        assert!(!OutputFormatter::new(OutputFormat::Json, false, false).shows_pages());
    }

    #[test]
    fn test_console_sink_ignores_drained_pages() {
        let formatter = OutputFormatter::new(OutputFormat::Text, false, false);
        let mut out = Vec::new();
        let mut sink = ConsoleSink::new(&formatter, &mut out);
        sink.page_ready(&event(&[0; 5], true)).unwrap();
        sink.drained_page(&[0; 28]).unwrap();
        sink.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Found final page! size:5\n");
    }

    #[test]
    fn test_json_report() {
        let formatter = OutputFormatter::new(OutputFormat::Json, false, false);
        let mut out = Vec::new();
        formatter.output_report(&report(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["input"], "in.pcm");
        assert_eq!(value["settings"]["family"], "mono-stereo");
        assert_eq!(value["comments"][0]["tag"], "ARTIST");
        assert_eq!(value["pages"][0]["size"], 47);
        assert_eq!(value["pages"][0]["final_flush"], true);
    }

    #[test]
    fn test_text_report_only_when_verbose() {
        let mut out = Vec::new();
        OutputFormatter::new(OutputFormat::Text, false, false)
            .output_report(&report(), &mut out)
            .unwrap();
        assert!(out.is_empty());

        OutputFormatter::new(OutputFormat::Text, false, true)
            .output_report(&report(), &mut out)
            .unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("256 frames in 1 blocks -> 1 pages, 47 bytes"));
    }
}
