use serde::Deserialize;

use super::artwork::Artwork;

/// The item currently on air, as far as stream metadata tells us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub image: Option<Artwork>,
}

impl Track {
    /// Track built from a metadata change. Artwork always starts out absent.
    pub fn from_metadata(artist: Option<String>, title: Option<String>) -> Self {
        Self {
            artist,
            title,
            image: None,
        }
    }
}

/// Static description of the radio station being played.
///
/// Only its name takes part in the now-playing projection, as the title used
/// while no track metadata is known.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Station {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for Station {
    fn default() -> Self {
        Self {
            name: "Newport Folk Radio".to_string(),
            detail: "Are you ready to Folk?".to_string(),
            url: "http://rfcmedia.streamguys1.com/Newport.mp3".to_string(),
            image: Some("http://xata44.by/sites/default/files/logo-radio.png".to_string()),
        }
    }
}
