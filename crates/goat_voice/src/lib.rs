//! Voice output for the Thinker-Goat shell.
//!
//! Speech is fire-and-forget: a sink that fails only logs a warning, it
//! never interrupts the conversation.

mod tts;

pub use tts::{from_config, plan, say, CommandSpeaker, Invocation, SilentSpeaker, SpeechSink};
