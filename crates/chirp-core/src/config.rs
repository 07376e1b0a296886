//! The table of clips to generate.
//!
//! ```toml
//! sample_rate = 44100
//!
//! [[asset]]
//! name = "drop.wav"
//! effect = "drop"
//! duration = 0.3
//! volume = 0.5
//! ```

use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    clip::{AudioClipSpec, DEFAULT_SAMPLE_RATE},
    effects::{DropEffect, MergeEffect},
    error::ConfigError,
    music::MusicLoop,
    source::WaveformSource,
};

/// The generators an asset can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    Drop,
    Merge,
    MusicLoop,
}

impl Effect {
    pub const ALL: [Effect; 3] = [Effect::Drop, Effect::Merge, Effect::MusicLoop];

    pub fn name(self) -> &'static str {
        match self {
            Effect::Drop => "drop",
            Effect::Merge => "merge",
            Effect::MusicLoop => "music-loop",
        }
    }

    /// Builds the generator. `seed` only affects [`Effect::MusicLoop`];
    /// without one the loop draws fresh noise on every run.
    pub fn source(self, seed: Option<u64>) -> Box<dyn WaveformSource + Send> {
        match self {
            Effect::Drop => Box::new(DropEffect::new()),
            Effect::Merge => Box::new(MergeEffect::new()),
            Effect::MusicLoop => match seed {
                Some(seed) => Box::new(MusicLoop::seeded(seed)),
                None => Box::new(MusicLoop::new()),
            },
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Effect::ALL.iter().map(|e| e.name()).collect();
                format!("unknown effect '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// One clip of the asset set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Output file name, relative to the output directory
    pub name: String,
    pub effect: Effect,
    /// Length in seconds
    pub duration: f64,
    pub volume: f64,
}

impl AssetEntry {
    pub fn new(name: impl Into<String>, effect: Effect, duration: f64, volume: f64) -> Self {
        Self {
            name: name.into(),
            effect,
            duration,
            volume,
        }
    }

    /// The clip this entry describes.
    pub fn clip(
        &self,
        sample_rate: u32,
        seed: Option<u64>,
    ) -> AudioClipSpec<Box<dyn WaveformSource + Send>> {
        AudioClipSpec::new(self.effect.source(seed), self.duration, self.volume)
            .with_sample_rate(sample_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTable {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(rename = "asset", default)]
    pub assets: Vec<AssetEntry>,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for AssetTable {
    /// The game's sound set: a drop thud, a merge sweep and the background loop.
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            assets: vec![
                AssetEntry::new("drop.wav", Effect::Drop, 0.3, 0.5),
                AssetEntry::new("merge.wav", Effect::Merge, 0.5, 0.6),
                AssetEntry::new("bgm.wav", Effect::MusicLoop, 8.0, 0.4),
            ],
        }
    }
}

impl AssetTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn to_toml(&self) -> String {
        // Only plain strings, numbers and arrays of tables; serialization cannot fail.
        toml::to_string(self).unwrap_or_default()
    }

    /// The built-in entry for `effect`, if any.
    pub fn entry_for(&self, effect: Effect) -> Option<&AssetEntry> {
        self.assets.iter().find(|entry| entry.effect == effect)
    }

    /// Checks the table shape. Clip parameters themselves are checked by the renderer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("no assets defined".into()));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.assets {
            let name = entry.name.as_str();
            let plain = !name.is_empty()
                && name != "."
                && name != ".."
                && !name.contains(|c: char| c == '/' || c == '\\');
            if !plain {
                return Err(ConfigError::Invalid(format!(
                    "asset name '{}' must be a plain file name",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!("duplicate asset name '{}'", name)));
            }
        }

        Ok(())
    }
}

impl FromStr for AssetTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let table: AssetTable = toml::from_str(s)?;
        table.validate()?;
        Ok(table)
    }
}
