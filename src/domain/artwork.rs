use std::fmt::Display;

use blake3::Hash;

/// Content id of an artwork image.
///
/// Two fetches yielding the same bytes share an id, which lets
/// logs and HTTP clients tell whether the picture actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtworkId(pub Hash);

impl ArtworkId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl Display for ArtworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Raw image bytes, plus the address they were fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub id: ArtworkId,
    pub data: Vec<u8>,
    pub source: Option<String>,
}

impl Artwork {
    pub fn new(data: Vec<u8>, source: Option<String>) -> Self {
        Self {
            id: ArtworkId::from_bytes(&data),
            data,
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MIME type sniffed from magic bytes, falling back to the source
    /// address extension.
    pub fn mime(&self) -> String {
        if let Some(mime) = sniff_mime(&self.data) {
            return mime.to_string();
        }
        self.source
            .as_deref()
            .map(|src| src.split(['?', '#']).next().unwrap_or(src))
            .map(|src| mime_guess::from_path(src).first_or_octet_stream().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }
}

fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    match data {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_id() {
        let a = Artwork::new(b"cover".to_vec(), None);
        let b = Artwork::new(b"cover".to_vec(), Some("/tmp/cover.png".into()));

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, ArtworkId::from_bytes(b"other"));
    }

    #[test]
    fn mime_is_sniffed_from_magic_bytes() {
        let png = Artwork::new(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A], Some("cover.jpg".into()));
        let jpeg = Artwork::new(vec![0xFF, 0xD8, 0xFF, 0xE0], None);

        assert_eq!(png.mime(), "image/png");
        assert_eq!(jpeg.mime(), "image/jpeg");
    }

    #[test]
    fn mime_falls_back_to_source_extension() {
        let art = Artwork::new(b"???".to_vec(), Some("http://host/logo.gif?size=600".into()));
        assert_eq!(art.mime(), "image/gif");

        let unknown = Artwork::new(b"???".to_vec(), None);
        assert_eq!(unknown.mime(), "application/octet-stream");
    }
}
