use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A persisted image reference: either a stable blob-store path or an
/// external URL we do not own. Time-limited signed URLs are never persisted;
/// they are regenerated from the path on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Path(String),
    External(String),
}

impl ImageRef {
    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Path(path) => path,
            ImageRef::External(url) => url,
        }
    }

    pub fn from_stored(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageRef::External(value)
        } else {
            ImageRef::Path(value)
        }
    }
}

// Stored as its plain string form; the http(s) prefix discriminates on read.
impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ImageRef::from_stored(value))
    }
}

/// An image as submitted at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageInput {
    /// A new upload: base64 payload (a `data:` URL prefix is tolerated)
    /// plus its declared MIME type.
    Inline { data: String, content_type: String },
    /// A previously issued signed URL or a third-party URL.
    ExistingUrl { url: String },
    /// A raw blob-store path the client already holds.
    ExistingPath { path: String },
}
