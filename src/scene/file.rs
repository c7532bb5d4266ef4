use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    effects::filter::FilterChain,
    foundation::error::{ScreenError, ScreenResult},
    scene::{
        layer::{Layer, LayerImage},
        settings::Settings,
    },
};

fn one() -> f64 {
    1.0
}

fn one_f32() -> f32 {
    1.0
}

/// Serialized form of a [`Layer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSpec {
    /// Explicit id; assigned sequentially when absent.
    #[serde(default)]
    pub id: Option<u32>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Image path, relative to the scene file.
    pub source: PathBuf,
    /// Horizontal offset from the canvas center.
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset from the canvas center (positive is up).
    #[serde(default)]
    pub offset_y: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Size multiplier.
    #[serde(default = "one")]
    pub scale: f64,
    /// Opacity in `0..=1`.
    #[serde(default = "one_f32")]
    pub opacity: f32,
    /// Horizontal mirror.
    #[serde(default)]
    pub flip_x: bool,
    /// CSS filter string; invalid strings are ignored with a warning.
    #[serde(default)]
    pub filter: Option<String>,
}

/// A render request stored as JSON: settings plus the layer stack.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneFile {
    /// Render settings.
    #[serde(default)]
    pub settings: Settings,
    /// Layers, bottom-most first.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// Settings and layers ready for the composer.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Render settings.
    pub settings: Settings,
    /// Layers, bottom-most first.
    pub layers: Vec<Layer>,
}

impl SceneFile {
    /// Parse a scene document.
    pub fn from_json_str(json: &str) -> ScreenResult<Self> {
        serde_json::from_str(json).map_err(|e| ScreenError::serde(format!("scene: {e}")))
    }

    /// Read and parse the scene at `path`.
    pub fn from_path(path: &Path) -> ScreenResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Build runtime layers, resolving image paths against `base_dir`.
    ///
    /// Images are decoded lazily when the composer first draws them.
    pub fn into_scene(self, base_dir: &Path) -> ScreenResult<Scene> {
        let mut used: HashSet<u32> = HashSet::new();
        for id in self.layers.iter().filter_map(|l| l.id) {
            if !used.insert(id) {
                return Err(ScreenError::validation(format!("duplicate layer id {id}")));
            }
        }

        let mut next_id = 1u32;
        let mut layers = Vec::with_capacity(self.layers.len());
        for spec in self.layers {
            let id = match spec.id {
                Some(id) => id,
                None => {
                    while used.contains(&next_id) {
                        next_id += 1;
                    }
                    used.insert(next_id);
                    next_id
                }
            };
            let filter = spec.filter.as_deref().and_then(FilterChain::parse_lenient);
            layers.push(Layer {
                id,
                name: spec.name,
                image: LayerImage::file(base_dir.join(&spec.source)),
                offset_x: spec.offset_x,
                offset_y: spec.offset_y,
                rotation: spec.rotation,
                scale: spec.scale,
                opacity: spec.opacity,
                flip_x: spec.flip_x,
                filter,
            });
        }

        Ok(Scene {
            settings: self.settings,
            layers,
        })
    }
}

impl Scene {
    /// Load the scene at `path`; layer sources resolve relative to its directory.
    pub fn load(path: &Path) -> ScreenResult<Self> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        SceneFile::from_path(path)?.into_scene(base)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/file.rs"]
mod tests;
