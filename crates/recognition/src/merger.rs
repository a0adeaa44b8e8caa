use serde::{Deserialize, Serialize};

use crate::Signal;

/// A target text field eligible to receive engine signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Title,
    Content,
}

/// Committed text plus the transient interim overlay for one field.
///
/// The two are held as separate values on purpose: the visible string is
/// recomputed as `committed + overlay`, never by splicing rendered output,
/// so a coincidental overlap between interim text and trailing committed
/// characters can't corrupt the committed text.
#[derive(Debug, Default, Clone)]
struct FieldBuffer {
    committed: String,
    overlay: String,
}

/// Deterministically folds the adapter's signal stream into stable per-field
/// text with exactly-once commit semantics.
///
/// Owns its own active-field selector, so independent merger instances never
/// cross-talk. Processes one signal at a time; never raises errors; invalid
/// signal sequences degrade to no-ops.
#[derive(Debug, Default)]
pub struct TranscriptMerger {
    title: FieldBuffer,
    content: FieldBuffer,
    active: Option<Field>,
}

impl TranscriptMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_field(&self) -> Option<Field> {
        self.active
    }

    /// Sets the field that receives committed/interim text.
    ///
    /// Switching away from a field with a pending overlay discards that
    /// overlay: unconfirmed speech is never silently committed. Callers
    /// coordinating with an adapter should also stop it, so at most one
    /// field accepts engine input at a time (see `DictationSession`).
    pub fn select_field(&mut self, field: Option<Field>) {
        if self.active == field {
            return;
        }
        if let Some(previous) = self.active {
            self.buffer_mut(previous).overlay.clear();
        }
        self.active = field;
    }

    /// Folds one signal into the active field's buffer.
    pub fn apply(&mut self, signal: &Signal) {
        let Some(field) = self.active else {
            // No field selected: text signals are dropped, never an error.
            return;
        };

        match signal {
            Signal::Interim(text) => {
                // Full replacement, not append.
                let buffer = self.buffer_mut(field);
                buffer.overlay.clear();
                buffer.overlay.push_str(text);
            }
            Signal::Final(text) => {
                // Append exactly once; identical repeats append again by
                // contract: the adapter finalizes each hypothesis at most
                // once, so deduplication here would drop real speech.
                let buffer = self.buffer_mut(field);
                buffer.committed.push_str(text);
                buffer.overlay.clear();
            }
            Signal::ListeningChanged(false) => {
                // Listening stopped: no unconfirmed speech stays visible.
                // The active field is kept so the caller can re-start into it.
                self.buffer_mut(field).overlay.clear();
            }
            Signal::ListeningChanged(true) | Signal::Error(_) => {}
        }
    }

    /// Direct overwrite of a field's committed text (e.g. keyboard input).
    ///
    /// Trust boundary: rejected while that field has a pending overlay:
    /// reconciling a manual edit against in-flight interim text is unsound,
    /// so the edit is refused instead. Returns whether the edit was applied.
    pub fn set_committed(&mut self, field: Field, text: impl Into<String>) -> bool {
        let buffer = self.buffer_mut(field);
        if !buffer.overlay.is_empty() {
            return false;
        }
        buffer.committed = text.into();
        true
    }

    pub fn committed(&self, field: Field) -> &str {
        &self.buffer(field).committed
    }

    /// The text a UI should render for a field right now:
    /// committed text, plus the overlay when the field is active.
    pub fn visible(&self, field: Field) -> String {
        let buffer = self.buffer(field);
        if self.active == Some(field) {
            format!("{}{}", buffer.committed, buffer.overlay)
        } else {
            buffer.committed.clone()
        }
    }

    /// Drops both buffers, e.g. when the editing UI closes.
    pub fn clear(&mut self) {
        self.title = FieldBuffer::default();
        self.content = FieldBuffer::default();
    }

    fn buffer(&self, field: Field) -> &FieldBuffer {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
        }
    }

    fn buffer_mut(&mut self, field: Field) -> &mut FieldBuffer {
        match field {
            Field::Title => &mut self.title,
            Field::Content => &mut self.content,
        }
    }
}
