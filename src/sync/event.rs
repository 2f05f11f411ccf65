use serde::{Deserialize, Serialize};

use crate::domain::artwork::Artwork;

/// Lifecycle of the underlying media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerState {
    UrlNotSet,
    ReadyToPlay,
    Loading,
    LoadingFinished,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

/// Everything a playback event source can report.
///
/// Serialized with a `kind` tag, e.g.
/// `{"kind": "metadata-changed", "artist": "Joni Mitchell", "title": "Big Yellow Taxi"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlaybackEvent {
    PlayerStateChanged {
        state: PlayerState,
    },
    PlaybackStateChanged {
        state: PlaybackState,
    },
    MetadataChanged {
        #[serde(default)]
        artist: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
    ItemChanged {
        #[serde(default)]
        address: Option<String>,
    },
    ArtworkChanged {
        #[serde(default)]
        address: Option<String>,
    },
}

/// Captures the track generation at the moment an artwork fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkTicket {
    pub(crate) generation: u64,
}

/// Input accepted by [`super::Synchronizer::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackUpdate {
    Metadata {
        artist: Option<String>,
        title: Option<String>,
    },
    ItemChanged {
        address: Option<String>,
    },
    ArtworkFetched {
        ticket: Option<ArtworkTicket>,
        image: Option<Artwork>,
    },
}
