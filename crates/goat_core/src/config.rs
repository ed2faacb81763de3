use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Top-level config
// ============================================================================

/// Every option the agent recognises. Unknown keys are rejected at load time.
///
/// Keys are snake_case; the camelCase spellings used by older config files
/// (`aiName`, `maxGoals`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoatConfig {
    #[serde(alias = "aiName")]
    pub ai_name: String,
    #[serde(alias = "useVoice")]
    pub use_voice: bool,
    #[serde(alias = "voiceEngine")]
    pub voice_engine: VoiceEngine,
    /// Scales learning-session rewards. 0.25 reproduces the baseline magnitudes.
    #[serde(alias = "learningRate")]
    pub learning_rate: f64,
    /// FIFO bound on the memory store. 0 = unbounded.
    #[serde(alias = "memorySize")]
    pub memory_size: usize,
    #[serde(alias = "toolsEnabled")]
    pub tools_enabled: bool,
    #[serde(alias = "maxGoals")]
    pub max_goals: usize,
    pub safety: SafetyConfig,
}

impl Default for GoatConfig {
    fn default() -> Self {
        Self {
            ai_name: "THINKER-GOAT".to_string(),
            use_voice: true,
            voice_engine: VoiceEngine::Espeak,
            learning_rate: 0.25,
            memory_size: 1000,
            tools_enabled: true,
            max_goals: 5,
            safety: SafetyConfig::default(),
        }
    }
}

impl GoatConfig {
    /// Load config from a TOML file. Unknown keys are an error.
    /// After loading, env var overrides are applied and the result validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: GoatConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; if the file does not exist yet, write the defaults
    /// there and return them. A file that exists but is invalid is an error.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let defaults = Self::default();
        match defaults.save(path) {
            Ok(()) => tracing::info!("Wrote default config to {}", path.display()),
            Err(e) => tracing::warn!("Could not write default config ({:#}), continuing", e),
        }

        let mut config = defaults;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML at `path`, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let body = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_goals >= 1, "max_goals must be at least 1");
        ensure!(
            self.learning_rate.is_finite() && self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            "learning_rate must be in (0, 1], got {}",
            self.learning_rate
        );
        ensure!(!self.ai_name.trim().is_empty(), "ai_name must not be empty");
        Ok(())
    }

    /// Apply environment variable overrides on top of file-based config.
    /// Unparseable values are logged and ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GOAT_AI_NAME") {
            self.ai_name = v;
        }
        override_parsed("GOAT_USE_VOICE", &mut self.use_voice);
        override_parsed("GOAT_VOICE_ENGINE", &mut self.voice_engine);
        override_parsed("GOAT_MAX_GOALS", &mut self.max_goals);
        override_parsed("GOAT_MEMORY_SIZE", &mut self.memory_size);
        override_parsed("GOAT_TOOLS_ENABLED", &mut self.tools_enabled);
    }
}

fn override_parsed<T>(var: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if let Ok(raw) = std::env::var(var) {
        match raw.trim().parse() {
            Ok(v) => *slot = v,
            Err(e) => tracing::warn!("Ignoring {}={:?}: {}", var, raw, e),
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceEngine {
    #[default]
    Espeak,
    Pyttsx3,
    Gtts,
}

impl VoiceEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceEngine::Espeak => "espeak",
            VoiceEngine::Pyttsx3 => "pyttsx3",
            VoiceEngine::Gtts => "gtts",
        }
    }
}

impl FromStr for VoiceEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "espeak" => Ok(VoiceEngine::Espeak),
            "pyttsx3" => Ok(VoiceEngine::Pyttsx3),
            "gtts" => Ok(VoiceEngine::Gtts),
            other => Err(format!("unknown voice engine '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyConfig {
    pub tier: CapabilityTier,
    /// Roots the file tools may touch. Empty = workspace-relative paths only.
    pub allowed_paths: Vec<PathBuf>,
    /// `read_file` output is truncated past this many bytes.
    pub max_read_bytes: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            tier: CapabilityTier::Restricted,
            allowed_paths: vec![],
            max_read_bytes: 8000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTier {
    /// Reads inside the allowed roots, no writes.
    ReadOnly,
    /// Reads and writes inside the allowed roots.
    #[default]
    Restricted,
    /// Unrestricted file access (must be explicitly enabled)
    Full,
}

// ============================================================================
// Tests
// ============================================================================
