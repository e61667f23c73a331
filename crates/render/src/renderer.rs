use crate::camera::PerspectiveCamera;
use lumen_scene::Scene;
use std::fmt::Write;

/// Errors a backend can report for a single frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface lost or outdated, reconfigured")]
    SurfaceReconfigured,
    #[error("surface error: {0}")]
    Surface(String),
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer owns the drawing surface. It reads the scene and camera and
/// produces one frame per [`render`](Self::render) call; it never mutates
/// either.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Resize the drawing surface to a logical size.
    fn set_size(&mut self, width: u32, height: u32);

    /// Set the ratio of physical to logical pixels.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Render one frame from the given scene and camera.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// What the debug renderer saw when it drew its last frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    pub camera_aspect: f32,
    pub elapsed: f64,
}

/// Text renderer: describes each frame instead of drawing it.
///
/// Useful for headless runs, logging, and testing the frame loop.
#[derive(Debug)]
pub struct DebugTextRenderer {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    frames: u64,
    last_frame: Option<FrameRecord>,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            pixel_ratio: 1.0,
            frames: 0,
            last_frame: None,
        }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<FrameRecord> {
        self.last_frame
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let record = FrameRecord {
            index: self.frames,
            width: self.width,
            height: self.height,
            pixel_ratio: self.pixel_ratio,
            camera_aspect: camera.aspect(),
            elapsed: scene.elapsed(),
        };
        self.frames += 1;
        self.last_frame = Some(record);

        let material = scene.material().snapshot();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (t={:.3}s) ===",
            record.index, record.elapsed
        );
        let _ = writeln!(
            out,
            "Viewport: {}x{} @{:.2} aspect={:.4}",
            self.width, self.height, self.pixel_ratio, record.camera_aspect
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees()
        );
        let _ = writeln!(
            out,
            "Material: metalness={:.4} roughness={:.4}",
            material.metalness, material.roughness
        );
        for object in scene.objects() {
            let p = object.transform.position;
            let r = object.transform.rotation;
            let _ = writeln!(
                out,
                "  [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.4}, {:.4})",
                object.name, p.x, p.y, p.z, r.x, r.y
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_describes_scene() {
        let mut scene = Scene::default();
        scene.apply_elapsed(10.0);
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(800, 600);

        let output = renderer.render(&scene, &camera);
        assert!(output.contains("Frame 0"));
        assert!(output.contains("Viewport: 800x600"));
        assert!(output.contains("metalness=0.7000"));
        assert!(output.contains("[sphere]"));
        assert!(output.contains("[plane]"));
        assert!(output.contains("[torus]"));
        assert!(output.contains("rot=(1.5000, 1.0000)"));
    }

    #[test]
    fn frames_are_counted() {
        let scene = Scene::default();
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&scene, &camera);
        renderer.render(&scene, &camera);
        assert_eq!(renderer.frames_rendered(), 2);
        assert_eq!(renderer.last_frame().unwrap().index, 1);
    }

    #[test]
    fn renderer_reads_committed_material() {
        let scene = Scene::default();
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        scene.material().set_roughness(0.25);
        let output = renderer.render(&scene, &camera);
        assert!(output.contains("roughness=0.2500"));
    }
}
