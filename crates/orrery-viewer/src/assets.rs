// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem asset port: texture decode via the image crate.

use orrery_core::{AssetPort, AssetStatus, Resources, TextureData};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

/// Loads textures from disk on first poll. Resolved statuses are sticky:
/// a failed decode never retries, a resolved handle stays stable.
pub struct FsAssets {
    root: PathBuf,
    resolved: HashMap<String, AssetStatus>,
}

impl FsAssets {
    /// Loader rooted at `root`; asset paths are resolved relative to it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            resolved: HashMap::new(),
        }
    }

    fn decode(&self, path: &str) -> Result<TextureData, image::ImageError> {
        let img = image::open(self.root.join(path))?.to_rgba8();
        Ok(TextureData {
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }
}

impl AssetPort for FsAssets {
    fn poll_texture(&mut self, path: &str, resources: &mut Resources) -> AssetStatus {
        if let Some(status) = self.resolved.get(path) {
            return *status;
        }
        let status = match self.decode(path) {
            Ok(data) => AssetStatus::Ready(resources.create_texture(data)),
            Err(err) => {
                warn!("texture {path}: {err}");
                AssetStatus::Failed
            }
        };
        self.resolved.insert(path.to_string(), status);
        status
    }
}
