use bytes::Bytes;

/// File exactly as the user supplied it.
///
/// Owned by a single ingest call and dropped once processing finishes.
#[derive(Clone, Debug)]
pub struct RawAsset {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: String,
}

impl RawAsset {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Cropped and compressed payload ready for storage.
///
/// Every compression attempt produces a fresh value; nothing mutates one after
/// it is built.
#[derive(Clone, Debug)]
pub struct ProcessedAsset {
    data: Bytes,
    content_type: &'static str,
    width: u32,
    height: u32,
    quality: f32,
    attempts: u32,
}

impl ProcessedAsset {
    pub fn new(
        data: Bytes,
        content_type: &'static str,
        width: u32,
        height: u32,
        quality: f32,
        attempts: u32,
    ) -> Self {
        Self {
            data,
            content_type,
            width,
            height,
            quality,
            attempts,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Quality factor (0.0–1.0) the payload was encoded at
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Number of encode attempts it took to produce this payload
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }
}
