// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GPU-resource registry: explicit handles, explicit release.
//!
//! Geometry, material, and texture slots are owned by exactly one surface
//! and are not reclaimed by ordinary drops — teardown calls
//! [`Resources::release_all`] after the render port has dropped its backend
//! copies. Live-slot accounting makes leak-freedom testable.

use crate::scene::Color;
use glam::Vec3;

/// Handle to a geometry slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub(crate) u32);

/// Handle to a material slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub(crate) u32);

/// Handle to a texture slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

/// CPU-side geometry description. Backends derive their buffers from this;
/// point-cloud positions are mutated in place by content each tick.
#[derive(Clone, Debug)]
pub enum GeometryData {
    /// Axis-aligned box, full extents.
    Box {
        /// Extent along x.
        width: f32,
        /// Extent along y.
        height: f32,
        /// Extent along z.
        depth: f32,
    },
    /// Flat plane in the local XY plane, full extents.
    Plane {
        /// Extent along x.
        width: f32,
        /// Extent along y.
        height: f32,
    },
    /// Raw-buffer point cloud.
    PointCloud {
        /// One world-space position per particle.
        positions: Vec<Vec3>,
        /// Rendered sprite size in world units.
        point_size: f32,
    },
}

impl GeometryData {
    /// Local-space half extents, used for picking.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            GeometryData::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth) / 2.0,
            GeometryData::Plane { width, height } => Vec3::new(width / 2.0, height / 2.0, 1e-3),
            GeometryData::PointCloud { .. } => Vec3::ZERO,
        }
    }
}

/// Shading model a material asks the backend for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Lit by scene lights.
    Standard,
    /// Lit, with a specular-ish response; treated as Standard by simple
    /// backends.
    Phong,
    /// Color visualizes the surface normal; unlit.
    Normal,
    /// Shadow catcher: renders nothing but received shadows.
    Shadow,
}

/// Material parameters.
///
/// Optional capabilities are `Option` fields: code that wants to mutate an
/// emissive term or sample a map checks for presence first and skips
/// otherwise.
#[derive(Clone, Debug)]
pub struct MaterialData {
    /// Shading model.
    pub shading: Shading,
    /// Base color.
    pub color: Color,
    /// Alpha in `[0, 1]`; only honored when `transparent` is set.
    pub opacity: f32,
    /// Enables alpha blending.
    pub transparent: bool,
    /// Emissive term; `None` on shading models without one.
    pub emissive: Option<Color>,
    /// Color/sprite texture.
    pub map: Option<TextureHandle>,
    /// Draw back faces too.
    pub double_sided: bool,
    /// Whether the material writes depth.
    pub depth_write: bool,
}

impl MaterialData {
    /// Lit material with an emissive capability.
    pub fn standard(color: Color) -> Self {
        Self {
            shading: Shading::Standard,
            color,
            opacity: 1.0,
            transparent: false,
            emissive: Some(Color::BLACK),
            map: None,
            double_sided: false,
            depth_write: true,
        }
    }

    /// Phong-style lit material with an emissive capability.
    pub fn phong(color: Color) -> Self {
        Self {
            shading: Shading::Phong,
            ..Self::standard(color)
        }
    }

    /// Normal-visualizing material. No emissive capability.
    pub fn normal() -> Self {
        Self {
            shading: Shading::Normal,
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            emissive: None,
            map: None,
            double_sided: false,
            depth_write: true,
        }
    }

    /// Shadow-catcher material. No emissive capability.
    pub fn shadow(opacity: f32) -> Self {
        Self {
            shading: Shading::Shadow,
            color: Color::BLACK,
            opacity,
            transparent: true,
            emissive: None,
            map: None,
            double_sided: false,
            depth_write: false,
        }
    }

    /// Set opacity and mark the material transparent.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self
    }
}

/// Decoded texture pixels, RGBA8.
#[derive(Clone, Debug)]
pub struct TextureData {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub rgba: Vec<u8>,
}

/// Registry of every GPU-backed resource one surface owns.
#[derive(Debug, Default)]
pub struct Resources {
    geometries: Vec<Option<GeometryData>>,
    materials: Vec<Option<MaterialData>>,
    textures: Vec<Option<TextureData>>,
}

impl Resources {
    /// Register a geometry.
    pub fn create_geometry(&mut self, data: GeometryData) -> GeometryHandle {
        self.geometries.push(Some(data));
        GeometryHandle(self.geometries.len() as u32 - 1)
    }

    /// Register a material.
    pub fn create_material(&mut self, data: MaterialData) -> MaterialHandle {
        self.materials.push(Some(data));
        MaterialHandle(self.materials.len() as u32 - 1)
    }

    /// Register a texture.
    pub fn create_texture(&mut self, data: TextureData) -> TextureHandle {
        self.textures.push(Some(data));
        TextureHandle(self.textures.len() as u32 - 1)
    }

    /// Look up a live geometry.
    pub fn geometry(&self, h: GeometryHandle) -> Option<&GeometryData> {
        self.geometries.get(h.0 as usize)?.as_ref()
    }

    /// Mutable access to a live geometry (point clouds update in place).
    pub fn geometry_mut(&mut self, h: GeometryHandle) -> Option<&mut GeometryData> {
        self.geometries.get_mut(h.0 as usize)?.as_mut()
    }

    /// Look up a live material.
    pub fn material(&self, h: MaterialHandle) -> Option<&MaterialData> {
        self.materials.get(h.0 as usize)?.as_ref()
    }

    /// Mutable access to a live material.
    pub fn material_mut(&mut self, h: MaterialHandle) -> Option<&mut MaterialData> {
        self.materials.get_mut(h.0 as usize)?.as_mut()
    }

    /// Look up a live texture.
    pub fn texture(&self, h: TextureHandle) -> Option<&TextureData> {
        self.textures.get(h.0 as usize)?.as_ref()
    }

    /// Handles of every live texture, for backend release sweeps.
    pub fn texture_handles(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.textures
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| TextureHandle(i as u32))
    }

    /// Release one geometry slot.
    pub fn release_geometry(&mut self, h: GeometryHandle) {
        if let Some(slot) = self.geometries.get_mut(h.0 as usize) {
            *slot = None;
        }
    }

    /// Release one material slot.
    pub fn release_material(&mut self, h: MaterialHandle) {
        if let Some(slot) = self.materials.get_mut(h.0 as usize) {
            *slot = None;
        }
    }

    /// Release one texture slot.
    pub fn release_texture(&mut self, h: TextureHandle) {
        if let Some(slot) = self.textures.get_mut(h.0 as usize) {
            *slot = None;
        }
    }

    /// Release every slot. Called at teardown after the backend sweep.
    pub fn release_all(&mut self) {
        self.geometries.clear();
        self.materials.clear();
        self.textures.clear();
    }

    /// Number of live slots across all kinds.
    pub fn alive(&self) -> usize {
        let live = |v: &[Option<GeometryData>]| v.iter().filter(|s| s.is_some()).count();
        live(&self.geometries)
            + self.materials.iter().filter(|s| s.is_some()).count()
            + self.textures.iter().filter(|s| s.is_some()).count()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.alive() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_counts_every_kind() {
        let mut res = Resources::default();
        let g = res.create_geometry(GeometryData::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        res.create_material(MaterialData::standard(Color::WHITE));
        res.create_texture(TextureData {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        });
        assert_eq!(res.alive(), 3);
        res.release_geometry(g);
        assert_eq!(res.alive(), 2);
        res.release_all();
        assert!(res.is_empty());
    }

    #[test]
    fn released_slots_resolve_to_none() {
        let mut res = Resources::default();
        let m = res.create_material(MaterialData::normal());
        res.release_material(m);
        assert!(res.material(m).is_none());
    }

    #[test]
    fn emissive_capability_matches_shading_model() {
        assert!(MaterialData::standard(Color::WHITE).emissive.is_some());
        assert!(MaterialData::phong(Color::WHITE).emissive.is_some());
        assert!(MaterialData::normal().emissive.is_none());
        assert!(MaterialData::shadow(0.2).emissive.is_none());
    }
}
