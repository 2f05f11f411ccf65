//! Wires a playback event source, an artwork fetcher and the synchronizer
//! together.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::Config,
    domain::{artwork::Artwork, descriptor::NowPlayingDescriptor},
    fetch::ArtworkFetcher,
    source::PlaybackEventSource,
    sync::{
        Synchronizer,
        event::{PlaybackEvent, PlaybackState, PlayerState, TrackUpdate},
        sink::{DescriptorRecord, NowPlayingSink},
    },
};

pub struct Session {
    source: Box<dyn PlaybackEventSource + Send>,
    fetcher: Box<dyn ArtworkFetcher + Send>,
    sync: Synchronizer,
    artwork_enabled: bool,
    player_state: Option<PlayerState>,
    playback_state: Option<PlaybackState>,
    handled: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub station: String,
    pub player_state: Option<PlayerState>,
    pub playback_state: Option<PlaybackState>,
    pub now_playing: DescriptorRecord,
    pub events_handled: usize,
    pub descriptors_published: usize,
}

impl Session {
    pub fn new(
        config: &Config,
        source: impl PlaybackEventSource + Send + 'static,
        fetcher: impl ArtworkFetcher + Send + 'static,
        sink: impl NowPlayingSink + Send + 'static,
    ) -> Self {
        let sync = Synchronizer::new(config.station.clone(), sink)
            .with_late_artwork(config.artwork.late_policy);
        Self {
            source: Box::new(source),
            fetcher: Box::new(fetcher),
            sync,
            artwork_enabled: config.artwork.enabled,
            player_state: None,
            playback_state: None,
            handled: 0,
        }
    }

    /// Handles every event the source has pending. Returns the number handled.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.source.next_event() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Handles one event. Returns whether a descriptor was published.
    pub fn dispatch(&mut self, event: PlaybackEvent) -> bool {
        self.handled += 1;
        match event {
            PlaybackEvent::PlayerStateChanged { state } => {
                info!("Player state: {state:?}");
                self.player_state = Some(state);
                false
            }
            PlaybackEvent::PlaybackStateChanged { state } => {
                info!("Playback state: {state:?}");
                self.playback_state = Some(state);
                false
            }
            PlaybackEvent::MetadataChanged { artist, title } => {
                self.sync.handle(TrackUpdate::Metadata { artist, title })
            }
            PlaybackEvent::ItemChanged { address } => {
                self.sync.handle(TrackUpdate::ItemChanged { address })
            }
            PlaybackEvent::ArtworkChanged { address } => {
                if !self.artwork_enabled {
                    debug!("Artwork disabled, ignoring artwork change to {address:?}");
                    return false;
                }
                let ticket = self.sync.artwork_ticket();
                let image = address.as_deref().and_then(|address| self.fetch(address));
                self.sync.handle(TrackUpdate::ArtworkFetched {
                    ticket: Some(ticket),
                    image,
                })
            }
        }
    }

    fn fetch(&self, address: &str) -> Option<Artwork> {
        match self.fetcher.fetch(address) {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                warn!("Artwork fetch failed: {e}");
                None
            }
        }
    }

    pub fn current_descriptor(&self) -> NowPlayingDescriptor {
        self.sync.current_descriptor()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            station: self.sync.station().name.clone(),
            player_state: self.player_state,
            playback_state: self.playback_state,
            now_playing: DescriptorRecord::from_domain(&self.current_descriptor()),
            events_handled: self.handled,
            descriptors_published: self.sync.published(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ArtworkConfig,
        fetch::{FsArtworkFetcher, NoArtwork},
        source::{QueueSource, script::ScriptSource},
        sync::{LateArtworkPolicy, sink::testing::RecordingSink},
    };
    use tempfile::TempDir;

    fn config_with_root(root: &TempDir) -> Config {
        Config {
            version: 1,
            artwork: ArtworkConfig {
                root: Some(root.path().to_path_buf()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn metadata(artist: &str, title: &str) -> PlaybackEvent {
        PlaybackEvent::MetadataChanged {
            artist: Some(artist.into()),
            title: Some(title.into()),
        }
    }

    fn artwork(address: &str) -> PlaybackEvent {
        PlaybackEvent::ArtworkChanged {
            address: Some(address.into()),
        }
    }

    #[test]
    fn pump_replays_scenario_into_sink() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        std::fs::write(tmp.path().join("taxi.jpg"), [0xFF, 0xD8, 0xFF, 0xE0])?;

        let source = QueueSource::new();
        for event in [
            PlaybackEvent::PlayerStateChanged {
                state: PlayerState::LoadingFinished,
            },
            PlaybackEvent::PlaybackStateChanged {
                state: PlaybackState::Playing,
            },
            metadata("Joni Mitchell", "Big Yellow Taxi"),
            artwork("taxi.jpg"),
            PlaybackEvent::ItemChanged {
                address: Some("http://rfcmedia.streamguys1.com/Newport.mp3".into()),
            },
        ] {
            source.push(event);
        }
        let sink = RecordingSink::default();
        let mut session = Session::new(
            &config_with_root(&tmp),
            source,
            FsArtworkFetcher::new(Some(tmp.path().to_path_buf())),
            sink.clone(),
        );

        assert_eq!(session.pump(), 5);

        let published = sink.descriptors();
        assert_eq!(published.len(), 3);
        assert_eq!(published[0].title, "Big Yellow Taxi");
        assert!(published[0].artwork.is_none());
        assert_eq!(
            published[1].artwork.as_ref().map(|a| a.mime()),
            Some("image/jpeg".to_string())
        );
        assert_eq!(published[2].title, "Newport Folk Radio");
        assert!(published[2].artist.is_none());

        let status = session.status();
        assert_eq!(status.player_state, Some(PlayerState::LoadingFinished));
        assert_eq!(status.playback_state, Some(PlaybackState::Playing));
        assert_eq!(status.events_handled, 5);
        assert_eq!(status.descriptors_published, 3);
        Ok(())
    }

    #[test]
    fn pump_picks_up_events_pushed_after_construction() {
        let feeder = QueueSource::new();
        let sink = RecordingSink::default();
        let mut session = Session::new(&Config::default(), feeder.clone(), NoArtwork, sink.clone());

        assert_eq!(session.pump(), 0);

        feeder.push(metadata("Joni Mitchell", "Big Yellow Taxi"));
        assert_eq!(session.pump(), 1);
        assert_eq!(session.current_descriptor().title, "Big Yellow Taxi");

        feeder.push(PlaybackEvent::ItemChanged { address: None });
        assert_eq!(session.pump(), 1);
        assert_eq!(session.current_descriptor().title, "Newport Folk Radio");
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn demo_script_attaches_its_cover() -> anyhow::Result<()> {
        let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let source = ScriptSource::load(&demos.join("newport-events.toml"))?;
        let sink = RecordingSink::default();
        let mut session = Session::new(
            &Config::load(&demos.join("config.toml"))?,
            source,
            FsArtworkFetcher::new(Some(demos)),
            sink.clone(),
        );

        assert_eq!(session.pump(), 6);

        let published = sink.descriptors();
        assert_eq!(published.len(), 3);
        let cover = published[1].artwork.as_ref().map(|a| a.mime());
        assert_eq!(cover.as_deref(), Some("image/png"));
        Ok(())
    }

    #[test]
    fn state_events_do_not_publish() {
        let sink = RecordingSink::default();
        let mut session = Session::new(&Config::default(), QueueSource::new(), NoArtwork, sink.clone());

        assert!(!session.dispatch(PlaybackEvent::PlayerStateChanged {
            state: PlayerState::Error
        }));
        assert!(!session.dispatch(PlaybackEvent::PlaybackStateChanged {
            state: PlaybackState::Stopped
        }));

        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn failed_fetch_keeps_previous_artwork() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        std::fs::write(tmp.path().join("a.png"), b"first")?;
        let sink = RecordingSink::default();
        let mut session = Session::new(
            &config_with_root(&tmp),
            QueueSource::new(),
            FsArtworkFetcher::new(Some(tmp.path().to_path_buf())),
            sink.clone(),
        );

        session.dispatch(metadata("A", "One"));
        assert!(session.dispatch(artwork("a.png")));
        let before = sink.count();

        assert!(!session.dispatch(artwork("missing.png")));
        assert!(!session.dispatch(PlaybackEvent::ArtworkChanged { address: None }));
        assert!(!session.dispatch(artwork("https://example.com/cover.png")));

        let descriptor = session.current_descriptor();
        assert_eq!(descriptor.artwork.map(|a| a.data), Some(b"first".to_vec()));
        assert_eq!(sink.count(), before);
        Ok(())
    }

    #[test]
    fn disabled_artwork_ignores_artwork_changes() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        std::fs::write(tmp.path().join("a.png"), b"bytes")?;
        let mut config = config_with_root(&tmp);
        config.artwork.enabled = false;
        let sink = RecordingSink::default();
        let mut session = Session::new(
            &config,
            QueueSource::new(),
            FsArtworkFetcher::new(Some(tmp.path().to_path_buf())),
            sink.clone(),
        );

        session.dispatch(metadata("A", "One"));
        assert!(!session.dispatch(artwork("a.png")));

        assert!(session.current_descriptor().artwork.is_none());
        assert_eq!(sink.count(), 1);
        Ok(())
    }

    #[test]
    fn discard_policy_still_applies_fresh_artwork() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        std::fs::write(tmp.path().join("a.png"), b"bytes")?;
        let mut config = config_with_root(&tmp);
        config.artwork.late_policy = LateArtworkPolicy::Discard;
        let mut session = Session::new(
            &config,
            QueueSource::new(),
            FsArtworkFetcher::new(Some(tmp.path().to_path_buf())),
            RecordingSink::default(),
        );

        session.dispatch(metadata("A", "One"));
        assert!(session.dispatch(artwork("a.png")));
        Ok(())
    }
}
