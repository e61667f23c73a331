use crate::gpu::MeshRenderer;
use lumen_assets::CubeMapImage;
use lumen_render::{PerspectiveCamera, RenderError, Renderer};
use lumen_scene::{Scene, ViewportDimensions};

/// Failures while acquiring a GPU and a surface.
#[derive(Debug, thiserror::Error)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// A surface texture the scene has been drawn into. Overlays can draw onto
/// [`view`](Self::view) before [`present`](Self::present).
pub struct SurfaceFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl SurfaceFrame {
    pub fn present(self) {
        self.texture.present();
    }
}

/// Renderer bound to a window surface.
///
/// Size and pixel ratio changes are recorded immediately and applied to the
/// surface before the next frame, so a resize followed by a ratio change
/// reconfigures once.
pub struct SurfaceRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    meshes: MeshRenderer,
    logical_size: (u32, u32),
    pixel_ratio: f64,
    backend: &'static str,
}

impl SurfaceRenderer {
    /// Create a surface for `target`, pick an adapter and upload `scene`.
    /// The environment starts as a gradient cube-map with `fallback_size`
    /// pixel faces.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        scene: &Scene,
        viewport: ViewportDimensions,
        fallback_size: u32,
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuInitError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("lumen_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let (width, height) = viewport.physical_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or(GpuInitError::NoAdapter)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let meshes = MeshRenderer::new(
            &device,
            &queue,
            format,
            scene,
            (width, height),
            fallback_size,
        );
        let backend = adapter.get_info().backend.to_str();
        tracing::info!("GPU initialized with {backend} backend, surface {width}x{height}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            meshes,
            logical_size: (viewport.width, viewport.height),
            pixel_ratio: viewport.pixel_ratio,
            backend,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Size of the configured surface in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Swap in a loaded environment cube-map. Maps the device cannot hold
    /// are dropped and the current environment stays.
    pub fn set_environment(&mut self, cube: &CubeMapImage) {
        let max = self.device.limits().max_texture_dimension_2d;
        if !fits_texture_limit(cube.size(), max) {
            tracing::warn!(
                "{}px cube-map exceeds device limit of {max}px, keeping current environment",
                cube.size()
            );
            return;
        }
        self.meshes.set_environment(&self.device, &self.queue, cube);
    }

    fn sync_surface(&mut self) {
        let current = (self.config.width, self.config.height);
        let Some((width, height)) = pending_resize(current, self.logical_size, self.pixel_ratio)
        else {
            return;
        };
        tracing::debug!(
            "surface {}x{} -> {width}x{height}",
            self.config.width,
            self.config.height
        );
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.meshes.resize(&self.device, width, height);
    }
}

/// New physical surface size for `logical` at `pixel_ratio`, or `None` when
/// it matches the `configured` one.
fn pending_resize(
    configured: (u32, u32),
    logical: (u32, u32),
    pixel_ratio: f64,
) -> Option<(u32, u32)> {
    let target = ViewportDimensions {
        width: logical.0,
        height: logical.1,
        pixel_ratio,
    }
    .physical_size();
    (target != configured).then_some(target)
}

fn fits_texture_limit(size: u32, max_dimension: u32) -> bool {
    (1..=max_dimension).contains(&size)
}

impl Renderer for SurfaceRenderer {
    type Output = Result<SurfaceFrame, RenderError>;

    fn set_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width.max(1), height.max(1));
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output {
        self.sync_surface();

        let texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(RenderError::SurfaceReconfigured);
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.meshes
            .render(&self.device, &self.queue, &view, scene, camera);

        Ok(SurfaceFrame { texture, view })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_physical_size_needs_no_reconfigure() {
        assert_eq!(pending_resize((800, 600), (800, 600), 1.0), None);
        assert_eq!(pending_resize((1600, 1200), (800, 600), 2.0), None);
    }

    #[test]
    fn size_or_ratio_change_reconfigures_once() {
        assert_eq!(pending_resize((800, 600), (1024, 768), 1.0), Some((1024, 768)));
        assert_eq!(pending_resize((800, 600), (800, 600), 1.5), Some((1200, 900)));
        // halved size at doubled ratio lands on the configured surface
        assert_eq!(pending_resize((800, 600), (400, 300), 2.0), None);
    }

    #[test]
    fn resize_target_is_never_empty() {
        assert_eq!(pending_resize((800, 600), (0, 0), 1.0), Some((1, 1)));
    }

    #[test]
    fn cube_maps_beyond_device_limit_are_rejected() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        assert!(fits_texture_limit(2048, max));
        assert!(fits_texture_limit(max, max));
        assert!(!fits_texture_limit(max + 1, max));
        assert!(!fits_texture_limit(0, max));
    }
}
