use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::renderer::Renderer;
use glam::Vec3;
use lumen_scene::{Clock, Scene, ShowcaseConfig, ViewportDimensions};

/// Everything one running showcase owns: scene, camera, controls, viewport,
/// renderer and clock.
///
/// The frame loop and the resize handler both operate on this struct; there
/// is no other mutable state.
pub struct SceneContext<R: Renderer, C: Clock> {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: ViewportDimensions,
    renderer: R,
    clock: C,
    frames: u64,
}

impl<R: Renderer, C: Clock> SceneContext<R, C> {
    /// Build the showcase and size the camera and renderer to `viewport`.
    pub fn new(
        config: &ShowcaseConfig,
        renderer: R,
        clock: C,
        viewport: ViewportDimensions,
    ) -> Self {
        Self::with_scene(config, Scene::showcase(config), renderer, clock, viewport)
    }

    /// Like [`new`](Self::new) but adopts an already built `scene`, for
    /// renderers that upload the scene before the context exists.
    pub fn with_scene(
        config: &ShowcaseConfig,
        scene: Scene,
        renderer: R,
        clock: C,
        viewport: ViewportDimensions,
    ) -> Self {
        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(&config.controls, Vec3::from_array(config.camera.target));
        let mut ctx = Self {
            scene,
            camera,
            controls,
            viewport,
            renderer,
            clock,
            frames: 0,
        };
        ctx.apply_viewport();
        ctx
    }

    /// Viewport synchroniser: adopt a new host size and pixel ratio.
    ///
    /// Camera aspect and renderer size are updated before this returns, so
    /// the next frame is drawn at the new size.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) {
        let viewport = ViewportDimensions::from_host(width, height, device_pixel_ratio);
        if viewport != self.viewport {
            tracing::debug!(
                "viewport {}x{}@{} -> {}x{}@{}",
                self.viewport.width,
                self.viewport.height,
                self.viewport.pixel_ratio,
                viewport.width,
                viewport.height,
                viewport.pixel_ratio
            );
        }
        self.viewport = viewport;
        self.apply_viewport();
    }

    fn apply_viewport(&mut self) {
        self.camera.set_aspect(self.viewport.aspect());
        self.renderer
            .set_size(self.viewport.width, self.viewport.height);
        self.renderer.set_pixel_ratio(self.viewport.pixel_ratio);
    }

    /// Run one frame: sample the clock, orient the objects, step the orbit
    /// damping and draw.
    pub fn tick(&mut self) -> R::Output {
        let elapsed = self.clock.elapsed();
        self.scene.apply_elapsed(elapsed);
        self.controls.update(&mut self.camera);
        self.frames += 1;
        self.renderer.render(&self.scene, &self.camera)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Controls together with the camera, for inputs that need both.
    pub fn controls_and_camera(&mut self) -> (&mut OrbitControls, &PerspectiveCamera) {
        (&mut self.controls, &self.camera)
    }

    pub fn viewport(&self) -> ViewportDimensions {
        self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DebugTextRenderer;
    use lumen_scene::ManualClock;

    fn context(width: u32, height: u32, ratio: f64) -> SceneContext<DebugTextRenderer, ManualClock> {
        SceneContext::new(
            &ShowcaseConfig::default(),
            DebugTextRenderer::new(),
            ManualClock::new(),
            ViewportDimensions::from_host(width, height, ratio),
        )
    }

    #[test]
    fn with_scene_keeps_the_given_material() {
        let config = ShowcaseConfig::default();
        let scene = Scene::showcase(&config);
        let material = scene.material().clone();
        let ctx = SceneContext::with_scene(
            &config,
            scene,
            DebugTextRenderer::new(),
            ManualClock::new(),
            ViewportDimensions::from_host(800, 600, 1.0),
        );
        material.set_roughness(0.9);
        assert_eq!(ctx.scene().material().snapshot().roughness, 0.9);
        assert_eq!(ctx.renderer().size(), (800, 600));
    }

    #[test]
    fn default_camera_view_is_finite() {
        let mut ctx = context(800, 600, 1.0);
        ctx.tick();
        assert!(ctx.camera().view_projection().is_finite());
    }

    #[test]
    fn construction_sizes_camera_and_renderer() {
        let ctx = context(800, 600, 1.0);
        assert_eq!(ctx.camera().aspect(), 800.0 / 600.0);
        assert_eq!(ctx.renderer().size(), (800, 600));
        assert_eq!(ctx.renderer().pixel_ratio(), 1.0);
    }

    #[test]
    fn resize_updates_within_the_call() {
        let mut ctx = context(800, 600, 1.0);
        ctx.tick();
        ctx.resize(1024, 768, 1.0);
        assert_eq!(ctx.camera().aspect(), 1024.0 / 768.0);
        assert_eq!(ctx.renderer().size(), (1024, 768));

        ctx.tick();
        let frame = ctx.renderer().last_frame().unwrap();
        assert_eq!((frame.width, frame.height), (1024, 768));
        assert_eq!(frame.camera_aspect, 1024.0 / 768.0);
        assert_eq!(ctx.renderer().frames_rendered(), 2);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut ctx = context(800, 600, 1.0);
        ctx.resize(1280, 720, 1.5);
        let aspect = ctx.camera().aspect();
        let projection = ctx.camera().projection_matrix();
        let size = ctx.renderer().size();
        let ratio = ctx.renderer().pixel_ratio();

        ctx.resize(1280, 720, 1.5);
        assert_eq!(ctx.camera().aspect(), aspect);
        assert_eq!(ctx.camera().projection_matrix(), projection);
        assert_eq!(ctx.renderer().size(), size);
        assert_eq!(ctx.renderer().pixel_ratio(), ratio);
    }

    #[test]
    fn resize_caps_pixel_ratio() {
        let mut ctx = context(800, 600, 1.0);
        ctx.resize(800, 600, 3.5);
        assert_eq!(ctx.renderer().pixel_ratio(), 2.0);
        assert_eq!(ctx.viewport().pixel_ratio, 2.0);
        ctx.resize(800, 600, 1.0);
        assert_eq!(ctx.renderer().pixel_ratio(), 1.0);
    }

    #[test]
    fn tick_orients_objects_from_clock() {
        let mut ctx = context(800, 600, 1.0);
        ctx.tick();
        for object in ctx.scene().objects() {
            assert_eq!(object.transform.rotation.x, 0.0);
            assert_eq!(object.transform.rotation.y, 0.0);
        }

        ctx.clock_mut().set(10.0);
        ctx.tick();
        for object in ctx.scene().objects() {
            assert_eq!(object.transform.rotation.y, 1.0);
            assert_eq!(object.transform.rotation.x, 1.5);
        }
        assert_eq!(ctx.frame_count(), 2);
    }

    #[test]
    fn tick_steps_orbit_damping() {
        let mut ctx = context(800, 600, 1.0);
        ctx.tick();
        let start = ctx.camera().position;
        ctx.controls_mut().rotate_left(0.4);
        ctx.tick();
        let first = ctx.camera().position;
        ctx.tick();
        assert_ne!(first, start);
        assert_ne!(ctx.camera().position, first);
    }

    #[test]
    fn tick_never_writes_material() {
        let mut ctx = context(800, 600, 1.0);
        ctx.scene().material().set_metalness(0.3);
        ctx.clock_mut().advance(5.0);
        ctx.tick();
        assert_eq!(ctx.scene().material().snapshot().metalness, 0.3);
    }
}
