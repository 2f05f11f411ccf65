use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::sync::event::PlaybackEvent;

pub mod error;
pub mod script;

/// Something that raises playback events, one at a time.
pub trait PlaybackEventSource {
    /// Next pending event, or `None` when nothing is pending right now.
    fn next_event(&mut self) -> Option<PlaybackEvent>;
}

/// FIFO of events pushed in by the caller.
///
/// Clones share the same queue, so one clone can be handed to a session
/// while another keeps feeding it.
#[derive(Debug, Clone, Default)]
pub struct QueueSource {
    pending: Arc<Mutex<VecDeque<PlaybackEvent>>>,
}

impl QueueSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: PlaybackEvent) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(event),
            Err(poisoned) => poisoned.into_inner().push_back(event),
        }
    }
}

impl PlaybackEventSource for QueueSource {
    fn next_event(&mut self) -> Option<PlaybackEvent> {
        match self.pending.lock() {
            Ok(mut pending) => pending.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        }
    }
}
