//! The now-playing synchronizer: keeps the current track and pushes a fresh
//! descriptor to the sink whenever the track changes.

use log::debug;
use serde::Deserialize;

use crate::domain::{
    artwork::Artwork,
    descriptor::NowPlayingDescriptor,
    track::{Station, Track},
};

pub mod event;
pub mod sink;

use event::{ArtworkTicket, TrackUpdate};
use sink::NowPlayingSink;

/// What to do with artwork that arrives after the track it was fetched for
/// has been replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LateArtworkPolicy {
    /// Attach it to whatever track is current.
    #[default]
    Apply,
    /// Drop it.
    Discard,
}

pub struct Synchronizer {
    station: Station,
    track: Track,
    sink: Box<dyn NowPlayingSink + Send>,
    late_artwork: LateArtworkPolicy,
    // bumped on every track boundary
    generation: u64,
    published: usize,
}

impl Synchronizer {
    pub fn new(station: Station, sink: impl NowPlayingSink + Send + 'static) -> Self {
        Self {
            station,
            track: Track::default(),
            sink: Box::new(sink),
            late_artwork: LateArtworkPolicy::default(),
            generation: 0,
            published: 0,
        }
    }

    pub fn with_late_artwork(mut self, policy: LateArtworkPolicy) -> Self {
        self.late_artwork = policy;
        self
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Number of descriptors handed to the sink so far.
    pub fn published(&self) -> usize {
        self.published
    }

    /// Single entry point for track updates. Returns whether a descriptor was
    /// published.
    pub fn handle(&mut self, update: TrackUpdate) -> bool {
        match update {
            TrackUpdate::Metadata { artist, title } => {
                self.on_metadata_changed(artist, title);
                true
            }
            TrackUpdate::ItemChanged { address } => {
                self.on_item_changed(address.as_deref());
                true
            }
            TrackUpdate::ArtworkFetched {
                ticket: Some(ticket),
                image,
            } => self.on_artwork_fetched_for(ticket, image),
            TrackUpdate::ArtworkFetched {
                ticket: None,
                image,
            } => self.on_artwork_fetched(image),
        }
    }

    pub fn on_metadata_changed(&mut self, artist: Option<String>, title: Option<String>) {
        debug!("Metadata changed: artist={artist:?}, title={title:?}");
        self.track = Track::from_metadata(artist, title);
        self.generation += 1;
        self.publish();
    }

    /// Crossing an item boundary forgets the whole track. The address is only
    /// logged.
    pub fn on_item_changed(&mut self, address: Option<&str>) {
        debug!("Stream item changed: {address:?}");
        self.track = Track::default();
        self.generation += 1;
        self.publish();
    }

    /// Attaches artwork to the current track. Absent artwork leaves whatever
    /// is already there and publishes nothing.
    pub fn on_artwork_fetched(&mut self, image: Option<Artwork>) -> bool {
        let Some(image) = image else {
            debug!("No artwork fetched, keeping current artwork");
            return false;
        };
        debug!("Artwork {} attached ({} bytes)", image.id, image.len());
        self.track.image = Some(image);
        self.publish();
        true
    }

    /// Ticket to hand to an artwork fetch started now.
    pub fn artwork_ticket(&self) -> ArtworkTicket {
        ArtworkTicket {
            generation: self.generation,
        }
    }

    /// Like [`Self::on_artwork_fetched`], but honours the late-artwork policy
    /// when the track has moved on since `ticket` was taken.
    pub fn on_artwork_fetched_for(&mut self, ticket: ArtworkTicket, image: Option<Artwork>) -> bool {
        let stale = ticket.generation != self.generation;
        if stale && self.late_artwork == LateArtworkPolicy::Discard {
            debug!(
                "Discarding artwork fetched for track generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.on_artwork_fetched(image)
    }

    pub fn current_descriptor(&self) -> NowPlayingDescriptor {
        NowPlayingDescriptor::project(&self.track, &self.station)
    }

    fn publish(&mut self) {
        let descriptor = self.current_descriptor();
        self.sink.publish(&descriptor);
        self.published += 1;
    }
}
