// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording render-port double.

use glam::Mat4;
use orrery_core::{Drawable, PerspectiveCamera, RenderPort, Resources, Scene, SurfaceError};
use std::cell::RefCell;
use std::rc::Rc;

/// What the fake saw at one `draw` call.
#[derive(Clone, Debug)]
pub struct DrawSnapshot {
    /// Camera aspect at draw time.
    pub aspect: f32,
    /// Last size the port was given.
    pub size: (u32, u32),
    /// Live node count.
    pub nodes: usize,
    /// World transforms of visible mesh nodes, in scene iteration order.
    pub mesh_transforms: Vec<Mat4>,
    /// Particle counts of visible point clouds, in scene iteration order.
    pub point_counts: Vec<usize>,
}

/// One recorded port call.
#[derive(Clone, Debug)]
pub enum PortEvent {
    /// `set_size(width, height)`.
    SetSize(u32, u32),
    /// `set_shadows(enabled)`.
    SetShadows(bool),
    /// `draw(..)` with what was visible.
    Draw(DrawSnapshot),
    /// `release(..)` with the registry's live count at the time.
    Release {
        /// `resources.alive()` when the sweep ran.
        live: usize,
    },
    /// `dispose()`.
    Dispose,
    /// `detach()` while still attached.
    Detach,
}

impl PortEvent {
    /// Short tag for order assertions.
    pub fn tag(&self) -> &'static str {
        match self {
            PortEvent::SetSize(..) => "set_size",
            PortEvent::SetShadows(..) => "set_shadows",
            PortEvent::Draw(..) => "draw",
            PortEvent::Release { .. } => "release",
            PortEvent::Dispose => "dispose",
            PortEvent::Detach => "detach",
        }
    }
}

/// Shared, inspectable log of port calls.
pub type PortLog = Rc<RefCell<Vec<PortEvent>>>;

/// Render-port double that records every call. The log handle stays valid
/// after the port has been moved into a controller and dropped with it.
#[derive(Debug)]
pub struct FakeRenderPort {
    log: PortLog,
    size: (u32, u32),
    attached: bool,
    /// When set, every `draw` fails with `SurfaceError::OutputLost`.
    pub fail_draws: bool,
}

impl FakeRenderPort {
    /// New port plus the shared log to assert against.
    pub fn new() -> (Self, PortLog) {
        let log: PortLog = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                log: Rc::clone(&log),
                size: (0, 0),
                attached: true,
                fail_draws: false,
            },
            log,
        )
    }
}

impl RenderPort for FakeRenderPort {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.log.borrow_mut().push(PortEvent::SetSize(width, height));
    }

    fn set_shadows(&mut self, enabled: bool) {
        self.log.borrow_mut().push(PortEvent::SetShadows(enabled));
    }

    fn draw(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        resources: &Resources,
    ) -> Result<(), SurfaceError> {
        let mut mesh_transforms = Vec::new();
        let mut point_counts = Vec::new();
        for (id, node) in scene.iter() {
            if !node.visible {
                continue;
            }
            match node.drawable {
                Drawable::Mesh { .. } => mesh_transforms.push(scene.world_transform(id)),
                Drawable::Points { geometry, .. } => {
                    if let Some(orrery_core::GeometryData::PointCloud { positions, .. }) =
                        resources.geometry(geometry)
                    {
                        point_counts.push(positions.len());
                    }
                }
                _ => {}
            }
        }
        self.log.borrow_mut().push(PortEvent::Draw(DrawSnapshot {
            aspect: camera.aspect,
            size: self.size,
            nodes: scene.len(),
            mesh_transforms,
            point_counts,
        }));
        if self.fail_draws {
            return Err(SurfaceError::OutputLost);
        }
        Ok(())
    }

    fn release(&mut self, resources: &Resources) {
        self.log.borrow_mut().push(PortEvent::Release {
            live: resources.alive(),
        });
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(PortEvent::Dispose);
    }

    fn detach(&mut self) {
        // Only a still-attached output records a detach, mirroring the
        // host-side "is it still in the container" check.
        if self.attached {
            self.attached = false;
            self.log.borrow_mut().push(PortEvent::Detach);
        }
    }
}
