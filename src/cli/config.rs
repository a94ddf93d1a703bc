// CLI configuration
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use oggpull::{CommentEntry, Comments, MappingFamily, StreamSettings};

/// oggpull - stream raw PCM through a pull-mode Ogg Opus encoder
#[derive(Parser, Debug)]
#[command(name = "oggpull")]
#[command(about = "Encode raw 16-bit PCM to Ogg Opus pages and report each page", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Raw PCM input (interleaved signed 16-bit little-endian)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Also write the encoded pages to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Input sample rate in Hz
    #[arg(short, long, default_value_t = 48_000, value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: u32,

    /// Interleaved channel count
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
    pub channels: u8,

    /// Channel mapping family
    #[arg(long, value_enum, default_value = "mono-stereo")]
    pub family: Family,

    /// Stream comment, repeatable (defaults to ARTIST=Someone, TITLE=Some track)
    #[arg(short = 't', long = "tag", value_name = "KEY=VALUE")]
    pub tags: Vec<CommentEntry>,

    /// Sample-frames read per block
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..))]
    pub frames_per_read: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress per-page messages)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging and a summary line)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Channel mapping family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Family {
    /// Mono or stereo
    #[default]
    MonoStereo,
    /// Surround, up to 8 channels
    Surround,
}

impl From<Family> for MappingFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::MonoStereo => MappingFamily::MonoStereo,
            Family::Surround => MappingFamily::Surround,
        }
    }
}

/// Output format for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per page
    #[default]
    Text,
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    Pretty,
}

impl Config {
    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings::new(self.rate, self.channels, self.family.into())
    }

    /// Comments from `--tag`, or the default pair when none were given
    pub fn comments(&self) -> Comments {
        if self.tags.is_empty() {
            Comments::with_defaults()
        } else {
            self.tags.iter().cloned().collect()
        }
    }
}
