use super::{
    artwork::Artwork,
    track::{Station, Track},
};

/// What the system now-playing surface is told to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingDescriptor {
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<Artwork>,
}

impl NowPlayingDescriptor {
    /// Projects a track onto the descriptor, using the station name as the
    /// title when the track has none. A blank title counts as none.
    pub fn project(track: &Track, station: &Station) -> Self {
        let title = track
            .title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&station.name)
            .to_string();

        Self {
            title,
            artist: track.artist.clone(),
            artwork: track.image.clone(),
        }
    }
}
