use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::adapter::RecognitionAdapter;
use crate::engine::{EngineEvent, SpeechEngine};
use crate::merger::{Field, TranscriptMerger};
use crate::Signal;

/// One dictation session: an adapter and a merger wired together.
///
/// Created once per editing surface and fed engine events by the host's
/// event loop. Every call pumps pending signals through the merger before
/// returning, so field text is consistent the moment a method comes back.
/// UI bindings that want the raw signal stream can [`subscribe`] as well.
///
/// [`subscribe`]: DictationSession::subscribe
pub struct DictationSession {
    adapter: RecognitionAdapter,
    merger: TranscriptMerger,
    signal_rx: broadcast::Receiver<Signal>,
}

impl DictationSession {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let adapter = RecognitionAdapter::new(engine);
        let signal_rx = adapter.subscribe();
        Self {
            adapter,
            merger: TranscriptMerger::new(),
            signal_rx,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.adapter.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.adapter.is_listening()
    }

    pub fn active_field(&self) -> Option<Field> {
        self.merger.active_field()
    }

    /// Raw normalized signal stream, for UI bindings.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.adapter.subscribe()
    }

    /// Routes engine input to a different field (or to none).
    ///
    /// Stops the adapter first when it is listening, so only one field ever
    /// accepts engine input; any pending overlay on the old field is
    /// discarded, never committed.
    pub async fn select_field(&mut self, field: Option<Field>) {
        if self.merger.active_field() != field && self.adapter.is_listening() {
            self.adapter.stop().await;
            self.pump();
        }
        self.merger.select_field(field);
    }

    pub async fn start(&mut self) {
        self.adapter.start().await;
        self.pump();
    }

    pub async fn stop(&mut self) {
        self.adapter.stop().await;
        self.pump();
    }

    /// Feeds one raw engine event through the adapter and the merger.
    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        self.adapter.handle_event(event).await;
        self.pump();
    }

    /// Manual (keyboard) edit of a field's committed text; refused while an
    /// interim overlay is pending for that field.
    pub fn set_committed(&mut self, field: Field, text: impl Into<String>) -> bool {
        self.merger.set_committed(field, text)
    }

    pub fn committed(&self, field: Field) -> &str {
        self.merger.committed(field)
    }

    pub fn visible(&self, field: Field) -> String {
        self.merger.visible(field)
    }

    /// Drops all field text, e.g. after the entry was saved.
    pub fn clear_fields(&mut self) {
        self.merger.clear();
    }

    /// Applies every signal the adapter has emitted so far.
    fn pump(&mut self) {
        loop {
            match self.signal_rx.try_recv() {
                Ok(signal) => self.merger.apply(&signal),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "dictation session lagged behind adapter signals");
                }
                Err(_) => break,
            }
        }
    }
}
