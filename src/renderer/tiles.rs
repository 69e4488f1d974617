//! Tile and marker images, keyed by terrain type and zoom bucket.
//!
//! Images that are still loading report [`TileState::Loading`] so the frame
//! can draw a placeholder instead of waiting on disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ahash::{AHashMap, AHashSet};
use image::RgbaImage;
use serde::Deserialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::board::TerrainKind;
use crate::core::error::Result;

/// Coarse zoom range an image was drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomBucket {
    Small,
    Normal,
    Large,
}

impl ZoomBucket {
    pub fn for_scale(scale: f64) -> Self {
        if scale < 0.7 {
            ZoomBucket::Small
        } else if scale <= 1.25 {
            ZoomBucket::Normal
        } else {
            ZoomBucket::Large
        }
    }
}

/// Lookup key for an image asset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Terrain(TerrainKind, ZoomBucket),
    Marker(String),
}

/// Availability of an image
#[derive(Debug, Clone)]
pub enum TileState {
    Ready(Arc<RgbaImage>),
    Loading,
    Missing,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    terrain: Vec<TerrainEntry>,
    #[serde(default)]
    marker: Vec<MarkerEntry>,
}

#[derive(Debug, Deserialize)]
struct TerrainEntry {
    kind: TerrainKind,
    zoom: ZoomBucket,
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MarkerEntry {
    name: String,
    path: PathBuf,
}

type LoadResult = (AssetKey, std::result::Result<RgbaImage, String>);

/// Image cache for the terrain renderer
pub struct TileSet {
    images: AHashMap<AssetKey, TileState>,
    reported_missing: Mutex<AHashSet<AssetKey>>,
    loaded_tx: UnboundedSender<LoadResult>,
    loaded_rx: UnboundedReceiver<LoadResult>,
}

impl Default for TileSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSet {
    /// Empty set: every lookup reports `Missing`
    pub fn new() -> Self {
        let (loaded_tx, loaded_rx) = unbounded_channel();
        Self {
            images: AHashMap::new(),
            reported_missing: Mutex::new(AHashSet::new()),
            loaded_tx,
            loaded_rx,
        }
    }

    /// Load every image listed in a TOML manifest. Paths are relative to the
    /// manifest's directory. Unreadable images are recorded as missing; only
    /// an unreadable manifest is an error.
    ///
    /// ```toml
    /// [[terrain]]
    /// kind = "woods"
    /// zoom = "normal"
    /// path = "woods.png"
    ///
    /// [[marker]]
    /// name = "minefield"
    /// path = "mines.png"
    /// ```
    pub fn load_manifest(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest: Manifest = toml::from_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut set = Self::new();
        let entries = manifest
            .terrain
            .into_iter()
            .map(|e| (AssetKey::Terrain(e.kind, e.zoom), e.path))
            .chain(
                manifest
                    .marker
                    .into_iter()
                    .map(|e| (AssetKey::Marker(e.name), e.path)),
            );
        for (key, rel) in entries {
            let state = match image::open(base.join(&rel)) {
                Ok(img) => TileState::Ready(Arc::new(img.to_rgba8())),
                Err(e) => {
                    tracing::warn!("Failed to load {:?} from {}: {}", key, rel.display(), e);
                    TileState::Missing
                }
            };
            set.images.insert(key, state);
        }
        tracing::debug!("Loaded tile manifest with {} entries", set.images.len());
        Ok(set)
    }

    pub fn insert(&mut self, key: AssetKey, image: RgbaImage) {
        self.images.insert(key, TileState::Ready(Arc::new(image)));
    }

    /// Start loading an image off the render thread. Until
    /// [`TileSet::poll_loaded`] picks it up the key reports `Loading`.
    /// Without a tokio runtime the image is loaded inline.
    pub fn request_async(&mut self, key: AssetKey, path: PathBuf) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            let result = image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| e.to_string());
            self.store_loaded(key, result);
            return;
        };

        self.images.insert(key.clone(), TileState::Loading);
        let tx = self.loaded_tx.clone();
        handle.spawn_blocking(move || {
            let result = image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| e.to_string());
            // Receiver gone means the tile set was dropped
            let _ = tx.send((key, result));
        });
    }

    /// Apply finished background loads. Returns how many keys changed.
    pub fn poll_loaded(&mut self) -> usize {
        let mut changed = 0;
        while let Ok((key, result)) = self.loaded_rx.try_recv() {
            self.store_loaded(key, result);
            changed += 1;
        }
        changed
    }

    fn store_loaded(&mut self, key: AssetKey, result: std::result::Result<RgbaImage, String>) {
        let state = match result {
            Ok(img) => TileState::Ready(Arc::new(img)),
            Err(e) => {
                tracing::warn!("Failed to load {:?}: {}", key, e);
                TileState::Missing
            }
        };
        self.images.insert(key, state);
    }

    pub fn lookup(&self, key: &AssetKey) -> TileState {
        self.images.get(key).cloned().unwrap_or(TileState::Missing)
    }

    pub fn terrain(&self, kind: TerrainKind, scale: f64) -> TileState {
        self.lookup(&AssetKey::Terrain(kind, ZoomBucket::for_scale(scale)))
    }

    pub fn marker(&self, name: &str) -> TileState {
        self.lookup(&AssetKey::Marker(name.to_string()))
    }

    /// Log a missing asset the first time it is hit
    pub fn report_missing(&self, key: &AssetKey) {
        let Ok(mut seen) = self.reported_missing.lock() else {
            return;
        };
        if seen.insert(key.clone()) {
            tracing::warn!("Missing image asset {:?}, drawing fallback", key);
        }
    }
}
