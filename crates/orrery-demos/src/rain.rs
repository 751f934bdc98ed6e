// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Particle-rain page: a texture-gated point cloud with wrap-around motion.
//!
//! The point material needs the raindrop sprite, so the cloud is neither
//! inserted nor animated until the load resolves. A failed load leaves the
//! page's surface ticking with the cloud permanently offline.

use crate::placement::{span, unit};
use glam::{Vec2, Vec3};
use orrery_core::{
    Animate, AssetPort, AssetStatus, BuildCx, Color, Container, Fog, FrameCx, GeometryData,
    GeometryHandle, MaterialData, Node, NodeId, RenderPort, Shading, SurfaceConfig,
    SurfaceController,
};
use tracing::warn;

/// Particle count.
pub const RAIN_COUNT: usize = 25_000;
/// Wrap bound: particles live in `[-RAIN_RANGE/2, RAIN_RANGE/2]` per axis.
pub const RAIN_RANGE: f32 = 20.0;

const DEFAULT_TEXTURE: &str = "textures/particles/raindrop.png";
const DEFAULT_SEED: u64 = 0x7261_696e; // "rain"

/// Tunables, defaulting to the real page's values. Tests shrink the count.
#[derive(Clone, Debug)]
pub struct RainParams {
    /// Particle count.
    pub count: usize,
    /// Wrap range, full extent.
    pub range: f32,
    /// Placement seed.
    pub seed: u64,
    /// Sprite texture path, polled through the asset port.
    pub texture_path: String,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            count: RAIN_COUNT,
            range: RAIN_RANGE,
            seed: DEFAULT_SEED,
            texture_path: DEFAULT_TEXTURE.to_string(),
        }
    }
}

enum RainState {
    /// Waiting for the sprite; nothing is in the scene yet.
    Loading,
    /// Cloud inserted and raining.
    Running {
        points: NodeId,
        geometry: GeometryHandle,
        /// Per-particle (x drift, fall speed); fall speeds are strictly
        /// positive and applied downward.
        velocities: Vec<Vec2>,
    },
    /// Load failed; the cloud never comes online.
    Failed,
}

/// Content state for the rain page.
pub struct RainDemo {
    params: RainParams,
    state: RainState,
}

impl RainDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            eye: Vec3::new(-3.0, 2.0, 8.0),
            far: 100.0,
            background: Color::BLACK,
            fog: Some(Fog {
                color: Color::BLACK,
                near: 5.0,
                far: 25.0,
            }),
            ..SurfaceConfig::default()
        }
    }

    fn build(params: RainParams) -> impl FnOnce(&mut BuildCx<'_>) -> Self {
        move |_cx| Self {
            params,
            state: RainState::Loading,
        }
    }

    /// True once the cloud is inserted and raining.
    pub fn is_running(&self) -> bool {
        matches!(self.state, RainState::Running { .. })
    }

    /// True when the sprite load failed for good.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, RainState::Failed)
    }

    /// Geometry handle of the live cloud, for inspection.
    pub fn geometry(&self) -> Option<GeometryHandle> {
        match self.state {
            RainState::Running { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    /// Point-cloud node of the live cloud.
    pub fn points_node(&self) -> Option<NodeId> {
        match self.state {
            RainState::Running { points, .. } => Some(points),
            _ => None,
        }
    }

    fn spawn_cloud(&self, map: orrery_core::TextureHandle, cx: &mut FrameCx<'_>) -> RainState {
        let RainParams {
            count, range, seed, ..
        } = self.params;
        let radius = range / 2.0;
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        for i in 0..count as u64 {
            positions.push(Vec3::new(
                span(seed, i, 0, radius),
                span(seed, i, 1, radius),
                span(seed, i, 2, radius),
            ));
            velocities.push(Vec2::new(
                (unit(seed, i, 3) - 0.5) / 5.0 * 0.01,
                unit(seed, i, 4) * 0.05 + 0.01,
            ));
        }
        let geometry = cx.resources.create_geometry(GeometryData::PointCloud {
            positions,
            point_size: 0.1,
        });
        let material = cx.resources.create_material(MaterialData {
            shading: Shading::Standard,
            color: Color::WHITE,
            opacity: 0.8,
            transparent: true,
            emissive: None,
            map: Some(map),
            double_sided: false,
            depth_write: false,
        });
        let points = cx.scene.insert(Node::points(geometry, material));
        RainState::Running {
            points,
            geometry,
            velocities,
        }
    }
}

impl Animate for RainDemo {
    fn advance(&mut self, cx: &mut FrameCx<'_>) {
        if matches!(self.state, RainState::Loading) {
            match cx.assets.poll_texture(&self.params.texture_path, cx.resources) {
                AssetStatus::Pending => {}
                AssetStatus::Failed => {
                    warn!(
                        "rain sprite {} failed to load; cloud stays offline",
                        self.params.texture_path
                    );
                    self.state = RainState::Failed;
                }
                AssetStatus::Ready(map) => {
                    self.state = self.spawn_cloud(map, cx);
                }
            }
            return;
        }
        let half = self.params.range / 2.0;
        if let RainState::Running {
            geometry,
            velocities,
            ..
        } = &mut self.state
        {
            if let Some(GeometryData::PointCloud { positions, .. }) =
                cx.resources.geometry_mut(*geometry)
            {
                for (p, v) in positions.iter_mut().zip(velocities.iter()) {
                    p.x += v.x;
                    p.y -= v.y;
                    if p.x < -half {
                        p.x = half;
                    }
                    if p.x > half {
                        p.x = -half;
                    }
                    // Fall speeds are strictly downward, so only the lower
                    // bound needs a re-entry check.
                    if p.y < -half {
                        p.y = half;
                    }
                }
            }
        }
    }
}

/// Mount the rain page with the real parameters.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, RainDemo>> {
    mount_with(container, renderer, assets, RainParams::default())
}

/// Mount the rain page with explicit parameters.
pub fn mount_with<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
    params: RainParams,
) -> Option<SurfaceController<R, RainDemo>> {
    SurfaceController::acquire(
        container,
        RainDemo::config(),
        renderer,
        assets,
        RainDemo::build(params),
    )
}
