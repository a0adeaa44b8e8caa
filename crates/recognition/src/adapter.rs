use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::engine::{EngineEvent, Hypothesis, SpeechEngine};
use crate::{ErrorCode, Signal};

/// Consecutive transparent restarts allowed before escalating to
/// [`ErrorCode::RestartLimit`]. Any delivered result batch resets the count.
pub const DEFAULT_MAX_RESTARTS: u32 = 5;

/// Engine-agnostic stream interface over a continuous recognition capability.
///
/// Normalizes raw hypothesis batches into at most one aggregated `Interim`
/// and one aggregated `Final` per cycle, and owns the start/stop/auto-restart
/// policy. The `listening` flag records the *caller's* intent: it flips
/// synchronously inside `start`/`stop`, which is what distinguishes an
/// engine-initiated interruption (restart) from a caller-intended halt
/// (confirm and stay idle).
pub struct RecognitionAdapter {
    engine: Arc<dyn SpeechEngine>,
    listening: bool,
    restart_attempts: u32,
    max_restarts: u32,
    signal_tx: broadcast::Sender<Signal>,
}

impl RecognitionAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self::with_restart_limit(engine, DEFAULT_MAX_RESTARTS)
    }

    pub fn with_restart_limit(engine: Arc<dyn SpeechEngine>, max_restarts: u32) -> Self {
        let (signal_tx, _) = broadcast::channel(64);
        Self {
            engine,
            listening: false,
            restart_attempts: 0,
            max_restarts,
            signal_tx,
        }
    }

    /// New receiver for the normalized signal stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.signal_tx.subscribe()
    }

    /// Pure capability query; callers should check this before `start`.
    pub fn is_supported(&self) -> bool {
        self.engine.is_available()
    }

    /// Caller intent, not engine truth: stays `true` across transparent
    /// restarts and flips to `false` the moment `stop` is called.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Requests the engine begin listening.
    ///
    /// No-op if already listening. Unsupported runtimes get
    /// `Error(NotSupported)` and no state change.
    pub async fn start(&mut self) {
        if !self.engine.is_available() {
            self.emit(Signal::Error(ErrorCode::NotSupported));
            return;
        }
        if self.listening {
            return;
        }

        self.listening = true;
        self.restart_attempts = 0;
        self.emit(Signal::ListeningChanged(true));

        if let Err(e) = self.engine.start().await {
            warn!(engine = self.engine.name(), error = %e, "engine failed to start");
            self.listening = false;
            self.emit(Signal::Error(ErrorCode::Other(e.to_string())));
            self.emit(Signal::ListeningChanged(false));
        }
    }

    /// Requests a clean halt. No-op if already idle.
    ///
    /// Intent flips before the engine call returns, so any event arriving
    /// afterward is handled as engine-initiated shutdown confirmation.
    pub async fn stop(&mut self) {
        if !self.listening {
            return;
        }

        self.listening = false;
        self.emit(Signal::ListeningChanged(false));

        if let Err(e) = self.engine.stop().await {
            warn!(engine = self.engine.name(), error = %e, "engine failed to stop");
        }
    }

    /// Folds one raw engine event into the normalized signal stream.
    pub async fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Started => {
                debug!(engine = self.engine.name(), "recognition cycle started");
            }
            EngineEvent::Results(batch) => {
                self.restart_attempts = 0;
                self.emit_batch(&batch);
            }
            EngineEvent::Error(code) => {
                let code = ErrorCode::from_engine(&code);
                self.emit(Signal::Error(code.clone()));
                if code.is_recoverable() && self.listening {
                    self.restart().await;
                }
            }
            EngineEvent::Ended => {
                if self.listening {
                    // Engine gave up on its own; bring it back without
                    // telling the caller.
                    self.restart().await;
                }
                // Already idle: confirmation of a caller-intended stop,
                // ListeningChanged(false) went out when stop() was called.
            }
        }
    }

    /// Partitions one cycle's hypotheses into aggregated signals.
    ///
    /// Final hypotheses each get a trailing separator. A cycle that produced
    /// a final also emits `Interim("")` right after it, a clearing override
    /// for whatever stale interim text is still displayed.
    fn emit_batch(&self, batch: &[Hypothesis]) {
        let mut interim = String::new();
        let mut final_text = String::new();

        for hypothesis in batch {
            if hypothesis.is_final {
                final_text.push_str(&hypothesis.text);
                final_text.push(' ');
            } else {
                interim.push_str(&hypothesis.text);
            }
        }

        if !final_text.is_empty() {
            self.emit(Signal::Final(final_text));
            self.emit(Signal::Interim(String::new()));
        } else if !interim.is_empty() {
            self.emit(Signal::Interim(interim));
        }
    }

    /// Guarded transparent restart: only while caller intent is still
    /// listening, and bounded to avoid a restart storm when the capability
    /// is persistently broken.
    async fn restart(&mut self) {
        self.restart_attempts += 1;
        if self.restart_attempts > self.max_restarts {
            warn!(
                engine = self.engine.name(),
                attempts = self.restart_attempts,
                "restart limit reached, giving up"
            );
            self.listening = false;
            self.restart_attempts = 0;
            self.emit(Signal::Error(ErrorCode::RestartLimit));
            self.emit(Signal::ListeningChanged(false));
            return;
        }

        debug!(
            engine = self.engine.name(),
            attempt = self.restart_attempts,
            "restarting engine"
        );
        if let Err(e) = self.engine.start().await {
            warn!(engine = self.engine.name(), error = %e, "engine restart failed");
            self.emit(Signal::Error(ErrorCode::Other(e.to_string())));
        }
    }

    fn emit(&self, signal: Signal) {
        // Nobody subscribed yet is fine.
        let _ = self.signal_tx.send(signal);
    }
}
