//! Image folder scanning, decoding and the decoded-bitmap cache.

use std::{
    collections::HashSet,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use lru::LruCache;
use thiserror::Error;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];
/// Longest edge kept after decoding.
pub const MAX_DECODED_EDGE: u32 = 640;
pub const CACHE_CAPACITY: usize = 8;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("cannot read image folder {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image worker stopped unexpectedly on {path}")]
    WorkerPanicked { path: PathBuf },
}

/// Image files directly inside `dir`, sorted by path.
pub fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>, ImageError> {
    let unreadable = |source| ImageError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && is_supported(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// The paths of one folder scan. A new scan gets a new generation so late
/// decode results from an older set can be told apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    pub generation: u64,
    pub paths: Vec<PathBuf>,
}

impl ImageSet {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Downscaled RGB pixels plus the size of the file they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// `pixels` is tightly packed RGB; short buffers are padded with black.
    #[must_use]
    pub fn from_rgb(width: u32, height: u32, mut pixels: Vec<u8>) -> Self {
        let len = width as usize * height as usize * 3;
        pixels.resize(len, 0);
        Self {
            width,
            height,
            source_width: width,
            source_height: height,
            pixels,
        }
    }

    #[must_use]
    pub fn with_source_size(mut self, width: u32, height: u32) -> Self {
        self.source_width = width;
        self.source_height = height;
        self
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Nearest-neighbour lookup at normalized coordinates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0];
        }
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.pixel(x, y)
    }
}

pub fn decode(path: &Path) -> Result<Bitmap, ImageError> {
    let image = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let (source_width, source_height) = (image.width(), image.height());
    let scaled = if source_width > MAX_DECODED_EDGE || source_height > MAX_DECODED_EDGE {
        image.thumbnail(MAX_DECODED_EDGE, MAX_DECODED_EDGE)
    } else {
        image
    };
    let rgb = scaled.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Bitmap::from_rgb(width, height, rgb.into_raw()).with_source_size(source_width, source_height))
}

/// What the store did with a finished decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Cached,
    Failed,
    /// Result belonged to a previous image set.
    Discarded,
}

/// LRU cache of decoded bitmaps keyed by image index, with the bookkeeping
/// needed to avoid duplicate or hopeless decode requests.
#[derive(Debug)]
pub struct ImageStore {
    generation: u64,
    cache: LruCache<usize, Arc<Bitmap>>,
    pending: HashSet<usize>,
    failed: HashSet<usize>,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY)
    }
}

impl ImageStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            generation: 0,
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            pending: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    pub fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.cache.clear();
        self.pending.clear();
        self.failed.clear();
    }

    /// Marks the index pending and returns `true` if a decode should start.
    /// Requesting a cached image refreshes its recency instead.
    pub fn request(&mut self, index: usize) -> bool {
        if self.cache.contains(&index) {
            self.cache.promote(&index);
            return false;
        }
        if self.pending.contains(&index) || self.failed.contains(&index) {
            return false;
        }
        self.pending.insert(index);
        true
    }

    pub fn finish(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<Bitmap, ImageError>,
    ) -> DecodeOutcome {
        if generation != self.generation {
            return DecodeOutcome::Discarded;
        }
        self.pending.remove(&index);
        match result {
            Ok(bitmap) => {
                self.cache.put(index, Arc::new(bitmap));
                DecodeOutcome::Cached
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "image decode failed");
                self.failed.insert(index);
                DecodeOutcome::Failed
            }
        }
    }

    #[must_use]
    pub fn peek(&self, index: usize) -> Option<Arc<Bitmap>> {
        self.cache.peek(&index).cloned()
    }
}
