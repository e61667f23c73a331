use lumen_render::{Renderer, SceneContext};
use lumen_scene::{Clock, MaterialParams, ViewportDimensions};

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against a running showcase for the debug panel
/// and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the running showcase.
    pub fn summary<R: Renderer, C: Clock>(ctx: &SceneContext<R, C>) -> SceneSummary {
        let scene = ctx.scene();
        let eye = ctx.camera().position;
        SceneSummary {
            elapsed: scene.elapsed(),
            frames: ctx.frame_count(),
            viewport: ctx.viewport(),
            camera_aspect: ctx.camera().aspect(),
            camera_position: [eye.x, eye.y, eye.z],
            material: scene.material().snapshot(),
            objects: scene
                .objects()
                .iter()
                .map(|o| ObjectInfo {
                    name: o.name.clone(),
                    kind: o.primitive.kind(),
                    position: o.transform.position.to_array(),
                    rotation: [o.transform.rotation.x, o.transform.rotation.y],
                })
                .collect(),
        }
    }
}

/// Summary of a running showcase.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub elapsed: f64,
    pub frames: u64,
    pub viewport: ViewportDimensions,
    pub camera_aspect: f32,
    pub camera_position: [f32; 3],
    pub material: MaterialParams,
    pub objects: Vec<ObjectInfo>,
}

/// Per-object detail.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: &'static str,
    pub position: [f32; 3],
    /// Rotation about X and Y in radians.
    pub rotation: [f64; 2],
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Scene: t={:.3}s frames={} viewport={}x{}@{:.2} aspect={:.4}",
            self.elapsed,
            self.frames,
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
            self.camera_aspect
        )?;
        writeln!(
            f,
            "Material: metalness={:.4} roughness={:.4}",
            self.material.metalness, self.material.roughness
        )?;
        for object in &self.objects {
            writeln!(f, "{object}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  {} ({}) pos=({:.2}, {:.2}, {:.2}) rot=({:.4}, {:.4})",
            self.name,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation[0],
            self.rotation[1],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_render::DebugTextRenderer;
    use lumen_scene::{ManualClock, ShowcaseConfig};

    fn context() -> SceneContext<DebugTextRenderer, ManualClock> {
        SceneContext::new(
            &ShowcaseConfig::default(),
            DebugTextRenderer::new(),
            ManualClock::new(),
            ViewportDimensions::from_host(800, 600, 1.0),
        )
    }

    #[test]
    fn summary_before_first_frame() {
        let ctx = context();
        let summary = SceneInspector::summary(&ctx);
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.elapsed, 0.0);
        assert_eq!(summary.objects.len(), 3);
        assert_eq!(summary.material.metalness, 0.7);
    }

    #[test]
    fn summary_tracks_frames_and_rotation() {
        let mut ctx = context();
        ctx.clock_mut().set(10.0);
        ctx.tick();
        let summary = SceneInspector::summary(&ctx);
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.elapsed, 10.0);
        for object in &summary.objects {
            assert_eq!(object.rotation, [1.5, 1.0]);
        }
    }

    #[test]
    fn summary_display() {
        let ctx = context();
        let s = format!("{}", SceneInspector::summary(&ctx));
        assert!(s.contains("frames=0"));
        assert!(s.contains("viewport=800x600"));
        assert!(s.contains("sphere (sphere)"));
        assert!(s.contains("torus (torus)"));
    }
}
