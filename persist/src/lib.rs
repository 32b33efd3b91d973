use anyhow::Context;
use serde::{Deserialize, Serialize};
use siren_core::{AudioConfig, ConfigError, OscillatorKind, PortRatio};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Written when no config file exists yet.
pub const DEFAULT_DOCUMENT: &str = "\
sample_rate = 44100
volume = 0.3
wail_cycle = 3
port_ratio_n = 5
port_ratio_d = 6
low_freq = 100
high_freq = 800
winddown_time = 10000
wavetype = 1
";

/// The config file exactly as it appears on disk. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub sample_rate: i64,
    pub volume: f64,
    pub wail_cycle: i64,
    pub port_ratio_n: i64,
    pub port_ratio_d: i64,
    pub low_freq: f64,
    pub high_freq: f64,
    pub winddown_time: f64,
    /// 0 for sine, 1 for sawtooth
    pub wavetype: i64,
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|&value| value > 0)
}

impl ConfigFile {
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_audio_config(config: &AudioConfig) -> Self {
        Self {
            sample_rate: config.sample_rate_hz as i64,
            volume: config.volume,
            wail_cycle: config.wail_cycle_count as i64,
            port_ratio_n: config.port_ratio.numer as i64,
            port_ratio_d: config.port_ratio.denom as i64,
            low_freq: config.low_freq_hz,
            high_freq: config.high_freq_hz,
            winddown_time: config.winddown_time_ms,
            wavetype: config.oscillator_kind.wavetype(),
        }
    }

    pub fn to_audio_config(&self) -> Result<AudioConfig, ConfigError> {
        let sample_rate_hz = positive_u32(self.sample_rate)
            .ok_or(ConfigError::SampleRate(self.sample_rate))?;
        let wail_cycle_count = positive_u32(self.wail_cycle)
            .ok_or(ConfigError::WailCycle(self.wail_cycle))?;
        let port_ratio = match (
            positive_u32(self.port_ratio_n),
            positive_u32(self.port_ratio_d),
        ) {
            (Some(numer), Some(denom)) => PortRatio::new(numer, denom),
            _ => {
                return Err(ConfigError::PortRatio {
                    numer: self.port_ratio_n,
                    denom: self.port_ratio_d,
                });
            }
        };
        let config = AudioConfig {
            sample_rate_hz,
            volume: self.volume,
            wail_cycle_count,
            port_ratio,
            low_freq_hz: self.low_freq,
            high_freq_hz: self.high_freq,
            winddown_time_ms: self.winddown_time,
            oscillator_kind: OscillatorKind::from_wavetype(self.wavetype)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::from_audio_config(&AudioConfig::default())
    }
}

/// The config file at a particular path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AudioConfig> {
        let text = fs::read_to_string(&self.path).with_context(|| {
            format!("failed to read config file {}", self.path.display())
        })?;
        let file = ConfigFile::from_toml(&text).with_context(|| {
            format!("malformed config file {}", self.path.display())
        })?;
        let config = file.to_audio_config().with_context(|| {
            format!("invalid config file {}", self.path.display())
        })?;
        log::info!("loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Like `load`, but writes the default config first if the file doesn't exist.
    pub fn load_or_create(&self) -> anyhow::Result<AudioConfig> {
        if !self.path.exists() {
            log::info!("creating default config at {}", self.path.display());
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
            fs::write(&self.path, DEFAULT_DOCUMENT).with_context(|| {
                format!("failed to create config file {}", self.path.display())
            })?;
        }
        self.load()
    }

    pub fn save(&self, config: &AudioConfig) -> anyhow::Result<()> {
        let text = ConfigFile::from_audio_config(config).to_toml()?;
        fs::write(&self.path, text).with_context(|| {
            format!("failed to write config file {}", self.path.display())
        })?;
        log::info!("saved config to {}", self.path.display());
        Ok(())
    }

    /// Like `save` but logs a warning on failure rather than returning an error value.
    pub fn save_(&self, config: &AudioConfig) {
        if let Err(e) = self.save(config) {
            log::warn!("Failed to save config to {}: {:#}", self.path.display(), e);
        }
    }
}
