//! Live dictation core: folds a stream of overlapping, revisable speech
//! hypotheses into stable per-field text.
//!
//! Two pieces collaborate:
//!
//! - [`adapter::RecognitionAdapter`] wraps a [`engine::SpeechEngine`] and
//!   normalizes its raw hypothesis batches into [`Signal`]s, owning the
//!   start/stop/auto-restart policy.
//! - [`merger::TranscriptMerger`] consumes those signals and maintains the
//!   authoritative text for whichever target field is active, replacing stale
//!   interim text and appending final commits exactly once.
//!
//! [`session::DictationSession`] wires the two together for callers that want
//! a single handle: feed it engine events, read back field text.

pub mod adapter;
pub mod engine;
pub mod merger;
pub mod session;

pub use adapter::RecognitionAdapter;
pub use engine::{EngineEvent, Hypothesis, ScriptedEngine, SpeechEngine};
pub use merger::{Field, TranscriptMerger};
pub use session::DictationSession;

use serde::{Deserialize, Serialize};

/// Normalized error codes surfaced to the caller.
///
/// `NoSpeech` and `Aborted` are the engine interruptions the adapter recovers
/// from by restarting; everything else is forwarded for the caller to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    NoSpeech,
    Aborted,
    /// No engine is available in this runtime.
    NotSupported,
    /// The consecutive auto-restart bound was exceeded.
    RestartLimit,
    Other(String),
}

impl ErrorCode {
    pub fn from_engine(code: &str) -> Self {
        match code {
            "no-speech" => ErrorCode::NoSpeech,
            "aborted" => ErrorCode::Aborted,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    /// Whether the adapter may transparently restart the engine after this.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorCode::NoSpeech | ErrorCode::Aborted)
    }
}

/// A normalized signal emitted by the adapter, in strict arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    /// Full replacement for the active field's interim overlay.
    Interim(String),
    /// Text to append permanently to the active field.
    Final(String),
    ListeningChanged(bool),
    Error(ErrorCode),
}
