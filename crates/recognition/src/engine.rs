use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One candidate transcription unit for a span of audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub text: String,
    pub is_final: bool,
}

impl Hypothesis {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn committed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Raw event delivered by a speech engine, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// One recognition cycle's ordered batch of hypotheses.
    Results(Vec<Hypothesis>),
    Started,
    /// The engine stopped, either on request or on its own.
    Ended,
    /// Engine error code, e.g. `"no-speech"` or `"aborted"`.
    Error(String),
}

/// A continuous speech-recognition capability.
///
/// Implementations deliver [`EngineEvent`]s on a channel handed out at
/// construction time; `start`/`stop` are requests, not guarantees; the
/// engine confirms through its event stream.
#[async_trait]
pub trait SpeechEngine: Send + Sync + 'static {
    async fn start(&self) -> anyhow::Result<()>;
    async fn stop(&self) -> anyhow::Result<()>;

    /// Capability query; `false` when no engine exists in this runtime.
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Deterministic in-memory engine that plays back one scripted event batch
/// per `start()` call. Counts start/stop requests so tests can assert the
/// adapter's restart policy.
pub struct ScriptedEngine {
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    cycles: Mutex<VecDeque<Vec<EngineEvent>>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    available: bool,
}

impl ScriptedEngine {
    /// One inner `Vec<EngineEvent>` is drained per `start()` call (the next
    /// recognition cycle); `stop()` always emits a trailing `Ended`.
    pub fn new(
        cycles: Vec<Vec<EngineEvent>>,
    ) -> (std::sync::Arc<Self>, mpsc::UnboundedReceiver<EngineEvent>) {
        Self::build(cycles, true)
    }

    /// An engine that reports itself as unavailable.
    pub fn unavailable() -> (std::sync::Arc<Self>, mpsc::UnboundedReceiver<EngineEvent>) {
        Self::build(Vec::new(), false)
    }

    fn build(
        cycles: Vec<Vec<EngineEvent>>,
        available: bool,
    ) -> (std::sync::Arc<Self>, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let engine = std::sync::Arc::new(Self {
            events_tx,
            cycles: Mutex::new(cycles.into()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            available,
        });
        (engine, events_rx)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events_tx.send(event);
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    async fn start(&self) -> anyhow::Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.emit(EngineEvent::Started);
        let cycle = self
            .cycles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(events) = cycle {
            for event in events {
                self.emit(event);
            }
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.emit(EngineEvent::Ended);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
