use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::descriptor::NowPlayingDescriptor;

/// Receives every freshly computed descriptor.
///
/// Display failures stay inside the sink; the synchronizer never learns
/// about them.
pub trait NowPlayingSink {
    fn publish(&mut self, descriptor: &NowPlayingDescriptor);
}

/// Writes each descriptor to the log at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl NowPlayingSink for LogSink {
    fn publish(&mut self, descriptor: &NowPlayingDescriptor) {
        info!(
            "Now playing: {} / {} / artwork {}",
            descriptor.title,
            descriptor.artist.as_deref().unwrap_or("-"),
            descriptor
                .artwork
                .as_ref()
                .map(|art| art.id.to_hex())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

/// Serializable view of a descriptor; artwork is reduced to its id, MIME
/// type and size.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorRecord {
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<ArtworkRecord>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtworkRecord {
    pub id: String,
    pub mime: String,
    pub size: usize,
}

impl DescriptorRecord {
    pub fn from_domain(descriptor: &NowPlayingDescriptor) -> Self {
        Self {
            title: descriptor.title.clone(),
            artist: descriptor.artist.clone(),
            artwork: descriptor.artwork.as_ref().map(|art| ArtworkRecord {
                id: art.id.to_hex(),
                mime: art.mime(),
                size: art.len(),
            }),
        }
    }
}

/// Writes one JSON object per descriptor to the wrapped writer.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NowPlayingSink for JsonLinesSink<W> {
    fn publish(&mut self, descriptor: &NowPlayingDescriptor) {
        let record = DescriptorRecord::from_domain(descriptor);
        let result = serde_json::to_writer(&mut self.out, &record)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Could not write now-playing descriptor: {e}");
        }
    }
}

/// Last published descriptor and when it was published.
#[derive(Debug, Clone)]
pub struct Published {
    pub descriptor: NowPlayingDescriptor,
    pub published_at: DateTime<Local>,
}

/// Keeps the last published descriptor where other threads can read it.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedSink {
    last: Arc<Mutex<Option<Published>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Published> {
        match self.last.lock() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NowPlayingSink for SharedSink {
    fn publish(&mut self, descriptor: &NowPlayingDescriptor) {
        let published = Published {
            descriptor: descriptor.clone(),
            published_at: Local::now(),
        };
        match self.last.lock() {
            Ok(mut last) => *last = Some(published),
            Err(poisoned) => *poisoned.into_inner() = Some(published),
        }
    }
}

/// Forwards every descriptor to each inner sink in order.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn NowPlayingSink + Send>>,
}

impl FanOutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl NowPlayingSink + Send + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl NowPlayingSink for FanOutSink {
    fn publish(&mut self, descriptor: &NowPlayingDescriptor) {
        for sink in &mut self.sinks {
            sink.publish(descriptor);
        }
    }
}
