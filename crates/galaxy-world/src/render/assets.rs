//! Image lookup. Loading and caching live outside this crate; the renderer
//! only asks whether an image is ready and falls back to placeholders.

use std::collections::HashSet;

use galaxy_common::ObjectKind;

pub trait AssetCatalog {
    fn is_ready(&self, key: &str) -> bool;
}

/// Nothing is ever loaded: every draw uses placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetCatalog for NoAssets {
    fn is_ready(&self, _key: &str) -> bool {
        false
    }
}

/// A fixed set of keys known to be loaded.
#[derive(Debug, Default, Clone)]
pub struct LoadedAssets {
    ready: HashSet<String>,
}

impl LoadedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&mut self, key: impl Into<String>) {
        self.ready.insert(key.into());
    }
}

impl AssetCatalog for LoadedAssets {
    fn is_ready(&self, key: &str) -> bool {
        self.ready.contains(key)
    }
}

/// Keys of the images the renderer looks up.
#[derive(Debug, Clone)]
pub struct AssetKeys {
    base: String,
}

impl AssetKeys {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn sprite_sheet(&self) -> String {
        format!("{}/character_spritesheet.png", self.base)
    }

    pub fn background(&self) -> String {
        format!("{}/bg_grid.png", self.base)
    }

    pub fn object(&self, kind: ObjectKind) -> String {
        format!("{}/{}.png", self.base, kind)
    }
}

impl Default for AssetKeys {
    fn default() -> Self {
        Self::new("/assets")
    }
}
