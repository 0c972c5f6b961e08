//! Script timeline.
//!
//! Sorted script events plus a single forward-only cursor. The cursor moves past
//! an event *before* the event is applied, so a replay re-entered from inside
//! that event's own writes resumes with the next one and nothing runs twice.

use super::script::ScriptEvent;

/// Events sorted by due sample, and the replay cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptTimeline {
    events: Vec<ScriptEvent>,
    cursor: usize,
}

impl ScriptTimeline {
    /// Builds a timeline from events in file order.
    ///
    /// The sort is stable: events sharing a due sample keep their input order.
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by_key(|event| event.due);
        Self { events, cursor: 0 }
    }

    /// Claims the next event if it is due at `samples`.
    ///
    /// Returns its index and advances the cursor, or `None` when the next event
    /// lies in the future or the timeline is exhausted.
    pub fn next_due(&mut self, samples: u64) -> Option<usize> {
        let event = self.events.get(self.cursor)?;
        if u64::from(event.due) > samples {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        Some(index)
    }

    /// Returns the event at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Indices from [`next_due`](Self::next_due)
    /// are always valid.
    #[inline]
    pub fn event(&self, index: usize) -> &ScriptEvent {
        &self.events[index]
    }

    /// All events in replay order.
    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    /// Index of the next unprocessed event.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of events not yet processed.
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    /// Total number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the timeline holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
