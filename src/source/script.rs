//! Replays playback events from a TOML script.
//!
//! ```toml
//! version = 1
//!
//! [[event]]
//! kind = "metadata-changed"
//! artist = "Joni Mitchell"
//! title = "Big Yellow Taxi"
//!
//! [[event]]
//! kind = "artwork-changed"
//! address = "covers/big-yellow-taxi.jpg"
//! ```

use std::{collections::VecDeque, path::Path};

use serde::Deserialize;

use super::{PlaybackEventSource, error::SourceError};
use crate::sync::event::PlaybackEvent;

const SCRIPT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, rename = "event")]
    events: Vec<PlaybackEvent>,
}

fn default_version() -> u32 {
    SCRIPT_VERSION
}

#[derive(Debug)]
pub struct ScriptSource {
    pending: VecDeque<PlaybackEvent>,
}

impl ScriptSource {
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let script: Script = toml::from_str(&contents).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if script.version != SCRIPT_VERSION {
            return Err(SourceError::UnsupportedVersion(script.version));
        }
        Ok(Self {
            pending: script.events.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl PlaybackEventSource for ScriptSource {
    fn next_event(&mut self) -> Option<PlaybackEvent> {
        self.pending.pop_front()
    }
}
