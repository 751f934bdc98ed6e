// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The render-surface lifecycle controller: acquire, tick, resize, dispose.
//!
//! One controller owns exactly one surface (camera + renderer + scene root)
//! for as long as a page is displayed. All mutable lifecycle state lives in
//! the controller's fields, never in ambient statics, so a remount starts
//! from nothing and teardown is a single well-defined operation.

use crate::{
    animate::{Animate, FrameCx},
    camera::PerspectiveCamera,
    controls::{Controls, OrbitControls},
    port::{AssetPort, RenderPort},
    resources::Resources,
    scene::{Color, Fog, NodeId, Scene},
};
use glam::Vec3;
use tracing::{debug, warn};

/// Identifier of the one pending next-frame callback of a surface. At most
/// one is outstanding at any time; a handle issued before teardown never
/// fires after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

/// Host region a surface mounts into.
#[derive(Clone, Copy, Debug)]
pub enum Container {
    /// The host has not mounted the region; construction must be skipped.
    Absent,
    /// A mounted region. `size` is `None` while the region is not yet
    /// measurable; the window dimensions are the fallback.
    Region {
        /// Measured region size, when available.
        size: Option<(u32, u32)>,
        /// Containing window size.
        window: (u32, u32),
    },
}

impl Container {
    /// Full-viewport region: no own measurement, window-sized.
    pub fn window(width: u32, height: u32) -> Self {
        Container::Region {
            size: None,
            window: (width, height),
        }
    }

    /// Region with its own measured size.
    pub fn measured(width: u32, height: u32, window: (u32, u32)) -> Self {
        Container::Region {
            size: Some((width, height)),
            window,
        }
    }

    /// Current drawing dimensions, `None` when absent.
    pub fn measure(&self) -> Option<(u32, u32)> {
        match *self {
            Container::Absent => None,
            Container::Region { size, window } => Some(size.unwrap_or(window)),
        }
    }
}

/// Everything `acquire` needs to shape a surface.
#[derive(Clone, Debug)]
pub struct SurfaceConfig {
    /// Vertical field of view, degrees.
    pub fov_y_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Initial camera position.
    pub eye: Vec3,
    /// Initial camera look-at target.
    pub target: Vec3,
    /// Clear color.
    pub background: Color,
    /// Optional distance fog.
    pub fog: Option<Fog>,
    /// Whether the backend should render shadows.
    pub shadows: bool,
    /// Attach an orbit camera control.
    pub orbit: bool,
    /// Attach a drag object control.
    pub drag: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 0.0, 20.0),
            target: Vec3::ZERO,
            background: Color::BLACK,
            fog: None,
            shadows: false,
            orbit: false,
            drag: false,
        }
    }
}

/// What content builders may touch while the surface is being assembled.
pub struct BuildCx<'a> {
    /// The fresh scene graph.
    pub scene: &'a mut Scene,
    /// The fresh resource registry.
    pub resources: &'a mut Resources,
    /// Asset loader (content may kick off loads early).
    pub assets: &'a mut dyn AssetPort,
    /// Interaction set; content registers drag targets here.
    pub controls: &'a mut Controls,
}

struct Mounted<R, A> {
    camera: PerspectiveCamera,
    scene: Scene,
    resources: Resources,
    renderer: R,
    assets: Box<dyn AssetPort>,
    content: A,
    controls: Controls,
    scheduled: Option<TickHandle>,
    resize_bound: bool,
    next_handle: u64,
    tick: u64,
}

impl<R, A> Mounted<R, A> {
    fn issue_tick(&mut self) -> TickHandle {
        self.next_handle += 1;
        TickHandle(self.next_handle)
    }
}

/// Owns one surface's full lifetime. The controller is both the surface
/// handle and the disposer: `dispose` tears everything down in reverse
/// creation order, and `Drop` guarantees it runs at most once more.
pub struct SurfaceController<R: RenderPort, A: Animate> {
    mounted: Option<Mounted<R, A>>,
}

impl<R: RenderPort, A: Animate> SurfaceController<R, A> {
    /// Construct a surface in `container` and build its content.
    ///
    /// Returns `None` without touching the renderer when the container is
    /// absent — no partial surface is ever created. Otherwise the creation
    /// order is: surface, content, animation start, resize binding.
    pub fn acquire<F>(
        container: &Container,
        config: SurfaceConfig,
        renderer: R,
        assets: Box<dyn AssetPort>,
        build: F,
    ) -> Option<Self>
    where
        F: FnOnce(&mut BuildCx<'_>) -> A,
    {
        let Some((width, height)) = container.measure() else {
            debug!("acquire skipped: container absent");
            return None;
        };
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };

        let mut camera = PerspectiveCamera::new(config.fov_y_deg, aspect, config.near, config.far);
        camera.eye = config.eye;
        camera.look_at(config.target);

        let mut renderer = renderer;
        renderer.set_size(width.max(1), height.max(1));
        renderer.set_shadows(config.shadows);

        let mut scene = Scene::new(config.background);
        scene.fog = config.fog;
        let mut resources = Resources::default();
        let mut assets = assets;
        let orbit = config.orbit.then(|| OrbitControls::from_camera(&camera));
        let mut controls = Controls::new(orbit, config.drag);

        let content = {
            let mut cx = BuildCx {
                scene: &mut scene,
                resources: &mut resources,
                assets: assets.as_mut(),
                controls: &mut controls,
            };
            build(&mut cx)
        };

        let mut mounted = Mounted {
            camera,
            scene,
            resources,
            renderer,
            assets,
            content,
            controls,
            scheduled: None,
            resize_bound: false,
            next_handle: 0,
            tick: 0,
        };
        mounted.scheduled = Some(mounted.issue_tick());
        mounted.resize_bound = true;
        Some(Self {
            mounted: Some(mounted),
        })
    }

    /// Host refresh callback: run one tick. Inert when no tick is armed
    /// (cancelled or disposed). Within a tick, simulated state advances
    /// strictly before the draw; the next tick is armed afterwards.
    /// Returns whether a frame was advanced and drawn.
    pub fn on_frame(&mut self) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        if m.scheduled.take().is_none() {
            return false;
        }
        m.tick += 1;
        m.controls.update(&mut m.camera);
        {
            let mut cx = FrameCx {
                scene: &mut m.scene,
                resources: &mut m.resources,
                assets: m.assets.as_mut(),
                tick: m.tick,
            };
            m.content.advance(&mut cx);
        }
        if let Err(err) = m.renderer.draw(&m.scene, &m.camera, &m.resources) {
            warn!("tick {}: draw failed: {err}", m.tick);
        }
        m.scheduled = Some(m.issue_tick());
        true
    }

    /// React to a container/window size change. A zero dimension is a
    /// hidden or detached container and is skipped outright; otherwise the
    /// camera aspect and the renderer output update together, before any
    /// further draw.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(m) = self.mounted.as_mut() else {
            return;
        };
        if !m.resize_bound {
            return;
        }
        if width == 0 || height == 0 {
            return;
        }
        m.camera.set_aspect(width as f32 / height as f32);
        m.renderer.set_size(width, height);
    }

    /// Tear the surface down. Idempotent: later calls (and calls on a
    /// controller whose acquire was skipped) are no-ops. Order is the exact
    /// reverse of creation: cancel the pending tick, unbind resize, release
    /// GPU resources, release the renderer context, detach the output.
    pub fn dispose(&mut self) {
        let Some(mut m) = self.mounted.take() else {
            return;
        };
        m.scheduled = None;
        m.resize_bound = false;
        m.renderer.release(&m.resources);
        m.resources.release_all();
        m.renderer.dispose();
        m.renderer.detach();
    }

    /// Whether the surface is live.
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The currently armed tick, if any.
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.mounted.as_ref().and_then(|m| m.scheduled)
    }

    /// Ticks completed since acquire.
    pub fn ticks(&self) -> u64 {
        self.mounted.as_ref().map_or(0, |m| m.tick)
    }

    /// Page content, while mounted.
    pub fn content(&self) -> Option<&A> {
        self.mounted.as_ref().map(|m| &m.content)
    }

    /// Mutable page content, while mounted.
    pub fn content_mut(&mut self) -> Option<&mut A> {
        self.mounted.as_mut().map(|m| &mut m.content)
    }

    /// Scene and content together, for externally triggered edits.
    pub fn scene_and_content_mut(&mut self) -> Option<(&mut Scene, &mut A)> {
        self.mounted.as_mut().map(|m| (&mut m.scene, &mut m.content))
    }

    /// The camera, while mounted.
    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.mounted.as_ref().map(|m| &m.camera)
    }

    /// The scene, while mounted.
    pub fn scene(&self) -> Option<&Scene> {
        self.mounted.as_ref().map(|m| &m.scene)
    }

    /// The resource registry, while mounted.
    pub fn resources(&self) -> Option<&Resources> {
        self.mounted.as_ref().map(|m| &m.resources)
    }

    /// The render port, while mounted.
    pub fn renderer(&self) -> Option<&R> {
        self.mounted.as_ref().map(|m| &m.renderer)
    }

    /// Mutable render port, while mounted.
    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.mounted.as_mut().map(|m| &mut m.renderer)
    }

    /// Whether orbit input is currently accepted.
    pub fn orbit_enabled(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.controls.orbit_enabled())
    }

    /// Whether a drag is in progress.
    pub fn drag_active(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.controls.drag_active().is_some())
    }

    /// Feed a pointer delta into the orbit control.
    pub fn orbit_rotate(&mut self, dx: f32, dy: f32) {
        if let Some(m) = self.mounted.as_mut() {
            if let Some(orbit) = m.controls.orbit.as_mut() {
                orbit.rotate(dx, dy);
            }
        }
    }

    /// Feed a zoom factor into the orbit control.
    pub fn orbit_zoom(&mut self, factor: f32) {
        if let Some(m) = self.mounted.as_mut() {
            if let Some(orbit) = m.controls.orbit.as_mut() {
                orbit.zoom(factor);
            }
        }
    }

    /// Try to start a drag at normalized device coordinates.
    pub fn begin_drag(&mut self, ndc_x: f32, ndc_y: f32) -> Option<NodeId> {
        let m = self.mounted.as_mut()?;
        let ray = m.camera.screen_ray(ndc_x, ndc_y);
        m.controls
            .begin_drag(&m.camera, &mut m.scene, &mut m.resources, ray)
    }

    /// Continue the active drag toward new pointer coordinates.
    pub fn drag_to(&mut self, ndc_x: f32, ndc_y: f32) {
        if let Some(m) = self.mounted.as_mut() {
            let ray = m.camera.screen_ray(ndc_x, ndc_y);
            m.controls.drag_to(&mut m.scene, ray);
        }
    }

    /// End the active drag, restoring orbit input.
    pub fn end_drag(&mut self) {
        if let Some(m) = self.mounted.as_mut() {
            m.controls.end_drag(&mut m.scene, &mut m.resources);
        }
    }
}

impl<R: RenderPort, A: Animate> Drop for SurfaceController<R, A> {
    fn drop(&mut self) {
        self.dispose();
    }
}
