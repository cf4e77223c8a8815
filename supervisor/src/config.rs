//! Engine configuration stored as TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::core::progress::ProgressPolicy;

/// Supervision engine configuration (TOML).
///
/// Missing fields default to the dashboard's expected pacing: one tick every
/// two seconds, 10–25 points per tick, narration on every other tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval between progression worker ticks, in milliseconds.
    pub tick_interval_ms: u64,

    /// Smallest progress increment per tick.
    pub min_increment: u8,

    /// Largest progress increment per tick (inclusive).
    pub max_increment: u8,

    /// Narrate every n-th tick while a subtask is in progress.
    pub flavor_every: u32,

    /// Fixed RNG seed. When set, each run's timeline is reproducible.
    pub seed: Option<u64>,

    /// Capacity of the state change broadcast channel.
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            min_increment: 10,
            max_increment: 25,
            flavor_every: 2,
            seed: None,
            event_buffer: 64,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(anyhow!("tick_interval_ms must be > 0"));
        }
        if self.min_increment == 0 {
            return Err(anyhow!("min_increment must be > 0"));
        }
        if self.min_increment > self.max_increment {
            return Err(anyhow!(
                "min_increment {} exceeds max_increment {}",
                self.min_increment,
                self.max_increment
            ));
        }
        if self.max_increment > 100 {
            return Err(anyhow!("max_increment must be <= 100"));
        }
        if self.flavor_every == 0 {
            return Err(anyhow!("flavor_every must be > 0"));
        }
        if self.event_buffer == 0 {
            return Err(anyhow!("event_buffer must be > 0"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn progress_policy(&self) -> ProgressPolicy {
        ProgressPolicy {
            min_increment: self.min_increment,
            max_increment: self.max_increment,
            flavor_every: self.flavor_every,
        }
    }

    /// RNG for the worker of run `generation`.
    ///
    /// Seeded runs derive a distinct but reproducible stream per generation.
    pub fn worker_rng(&self, generation: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(generation)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EngineConfig::default()`.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        let cfg = EngineConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EngineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &EngineConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
