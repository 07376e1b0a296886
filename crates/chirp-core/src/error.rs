use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while rendering a clip.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A clip parameter is outside its valid range. Raised before any output is touched.
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("could not write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A caller-supplied writer failed.
    #[error("could not write WAV stream")]
    Stream(#[source] io::Error),

    #[error("could not encode WAV data")]
    Encoding(#[from] hound::Error),

    /// The waveform produced NaN or an infinity. The clip is rejected outright.
    #[error("non-finite sample {value} at index {index} (t = {time}s)")]
    NonFiniteSample { index: usize, time: f64, value: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Maps a `hound` failure, keeping plain I/O errors tied to the destination.
    pub(crate) fn from_hound(path: impl Into<PathBuf>, err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(source) => Self::io(path, source),
            other => Self::Encoding(other),
        }
    }

    /// Maps a `hound` failure on a writer with no known path.
    pub(crate) fn from_stream(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(source) => Self::Stream(source),
            other => Self::Encoding(other),
        }
    }
}

/// Failures while loading an asset table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse asset table")]
    Parse(#[from] toml::de::Error),

    #[error("invalid asset table: {0}")]
    Invalid(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
