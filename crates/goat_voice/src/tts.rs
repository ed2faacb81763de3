//! Text-to-Speech sinks backed by local command-line engines.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use goat_core::config::{GoatConfig, VoiceEngine};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tempfile::TempPath;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Anything that can say a line of text out loud.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Speak `text`, returning once playback has finished.
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Speak in the background. Failures are logged, never returned.
pub fn say(sink: Arc<dyn SpeechSink>, text: impl Into<String>) -> JoinHandle<()> {
    let text = text.into();
    tokio::spawn(async move {
        if let Err(e) = sink.speak(&text).await {
            tracing::warn!(provider = sink.provider_name(), "speech failed: {:#}", e);
        }
    })
}

/// Pick a sink for the configured engine. `use_voice = false` yields silence.
pub fn from_config(config: &GoatConfig) -> Arc<dyn SpeechSink> {
    if config.use_voice {
        Arc::new(CommandSpeaker::new(config.voice_engine))
    } else {
        Arc::new(SilentSpeaker)
    }
}

// ============================================================================
// Command plans
// ============================================================================

/// One external program run. Text always travels as an argument, never
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &'static str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program,
            args: args.into_iter().collect(),
        }
    }
}

/// The programs, in order, that speak `text` with `engine`.
pub fn plan(engine: VoiceEngine, text: &str, scratch: &Path) -> Vec<Invocation> {
    match engine {
        VoiceEngine::Espeak => vec![Invocation::new("espeak", [text.to_string()])],
        // pyttsx3 drives speech-dispatcher on Linux; talk to it directly
        VoiceEngine::Pyttsx3 => vec![Invocation::new("spd-say", ["--wait".to_string(), text.to_string()])],
        VoiceEngine::Gtts => {
            let file = scratch.to_string_lossy().to_string();
            vec![
                Invocation::new(
                    "gtts-cli",
                    [text.to_string(), "--output".to_string(), file.clone()],
                ),
                Invocation::new("mpg123", ["--quiet".to_string(), file]),
            ]
        }
    }
}

// ============================================================================
// CommandSpeaker
// ============================================================================

/// Speaks through a local engine. Utterances from one speaker play one at a
/// time, in the order they were requested.
pub struct CommandSpeaker {
    engine: VoiceEngine,
    turn: Mutex<()>,
}

impl CommandSpeaker {
    pub fn new(engine: VoiceEngine) -> Self {
        Self {
            engine,
            turn: Mutex::new(()),
        }
    }
}

/// A fresh audio file for one utterance, removed when dropped.
fn scratch_file() -> Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix("goat-tts-")
        .suffix(".mp3")
        .tempfile()
        .context("Failed to create speech scratch file")?;
    Ok(file.into_temp_path())
}

#[async_trait]
impl SpeechSink for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let _turn = self.turn.lock().await;
        let scratch = match self.engine {
            VoiceEngine::Gtts => Some(scratch_file()?),
            _ => None,
        };
        let steps = plan(self.engine, text, scratch.as_deref().unwrap_or(Path::new("")));

        for step in steps {
            let status = Command::new(step.program)
                .args(&step.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status()
                .await
                .with_context(|| format!("Failed to launch {}", step.program))?;
            if !status.success() {
                bail!("{} exited with {}", step.program, status);
            }
        }

        tracing::debug!(engine = self.engine.as_str(), chars = text.len(), "spoke");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        self.engine.as_str()
    }
}

// ============================================================================
// SilentSpeaker
// ============================================================================

/// Swallows all speech. Used when voice is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

#[async_trait]
impl SpeechSink for SilentSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::trace!(chars = text.len(), "speech muted");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "silent"
    }
}
