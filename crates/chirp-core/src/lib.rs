pub mod clip;
pub mod config;
pub mod effects;
pub mod error;
pub mod export;
pub mod music;
pub mod render;
pub mod source;

use std::path::Path;

pub use hound;

pub use crate::clip::{AudioClipSpec, DEFAULT_SAMPLE_RATE};
pub use crate::config::{AssetEntry, AssetTable, Effect};
pub use crate::effects::{DropEffect, MergeEffect, Sweep};
pub use crate::error::{ConfigError, RenderError, Result};
pub use crate::music::MusicLoop;
pub use crate::render::{quantize, render_samples, render_to_file, render_to_writer, RenderSummary};
pub use crate::source::{from_fn, WaveformSource};

/// Renders every entry of `table` into `out_dir`.
///
/// The table is checked first, so entry names can only land inside `out_dir`.
/// Stops at the first failing clip; files already written stay in place.
pub fn render_assets(
    table: &AssetTable,
    out_dir: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<Vec<RenderSummary>> {
    table.validate()?;
    let out_dir = out_dir.as_ref();

    table
        .assets
        .iter()
        .map(|entry| {
            tracing::debug!("{} -> {}", entry.effect, entry.name);
            render_to_file(entry.clip(table.sample_rate, seed), out_dir.join(&entry.name))
        })
        .collect()
}
