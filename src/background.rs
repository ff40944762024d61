use serde::{Deserialize, Serialize};
use url::Url;

/// The document background. Exactly one variant is active at a time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    #[default]
    Blank,
    /// An image to be fetched from a URL
    Url(Url),
    /// Encoded image bytes (PNG, JPEG, ...) stored inline in the document
    ImageData(Vec<u8>),
}

// Custom Debug so inline image bytes don't flood logs
impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Background::Blank => write!(f, "Blank"),
            Background::Url(url) => f.debug_tuple("Url").field(&url.as_str()).finish(),
            Background::ImageData(data) => f
                .debug_struct("ImageData")
                .field("data_len", &data.len())
                .finish(),
        }
    }
}

impl Background {
    pub fn url(&self) -> Option<&Url> {
        match self {
            Background::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn image_data(&self) -> Option<&[u8]> {
        match self {
            Background::ImageData(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Background::Blank)
    }
}

/// The URL of the image a dropped link refers to.
///
/// Image search results wrap the real image location in an `imgurl` query
/// parameter; that location is returned when present and parseable,
/// otherwise the URL itself.
pub fn image_url(url: &Url) -> Url {
    url.query_pairs()
        .find(|(key, _)| key == "imgurl")
        .and_then(|(_, value)| Url::parse(&value).ok())
        .unwrap_or_else(|| url.clone())
}
