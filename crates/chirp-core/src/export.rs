//! WAV file sink.

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use hound::{WavSpec, WavWriter};

use crate::{error::RenderError, Result};

/// A WAV file being written.
///
/// Creating the sink creates any missing parent directories and truncates the
/// destination. The file only survives if [`WavSink::finalize`] succeeds: a
/// sink dropped before that removes whatever it wrote, so a failed render
/// never leaves a truncated file that still looks like valid audio.
pub struct WavSink {
    path: PathBuf,
    writer: Option<WavWriter<BufWriter<File>>>,
    written: usize,
}

impl WavSink {
    pub fn create(path: impl AsRef<Path>, spec: WavSpec) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
        }

        let writer = WavWriter::create(&path, spec).map_err(|e| RenderError::from_hound(&path, e))?;

        Ok(Self {
            path,
            writer: Some(writer),
            written: 0,
        })
    }

    /// Number of samples written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_sample(&mut self, sample: i16) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .write_sample(sample)
                .map_err(|e| RenderError::from_hound(&self.path, e))?;
            self.written += 1;
        }
        Ok(())
    }

    /// Patches the header sizes, flushes and closes the file.
    pub fn finalize(mut self) -> Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                self.discard();
                return Err(RenderError::from_hound(&self.path, e));
            }
        }
        Ok(std::mem::take(&mut self.path))
    }

    fn discard(&mut self) {
        // Close the handle before unlinking.
        self.writer = None;
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("could not remove partial file {}: {}", self.path.display(), e);
        } else {
            tracing::debug!("removed partial file {}", self.path.display());
        }
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        if self.writer.is_some() {
            self.discard();
        }
    }
}
