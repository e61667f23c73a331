use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use lumen_assets::{CubeMapLoad, spawn_cube_map_load};
use lumen_input::{ControlAction, Key, PointerButton, PointerTracker};
use lumen_render::{AnimationDriver, FrameScheduler, RenderError, SceneContext};
use lumen_render_wgpu::SurfaceRenderer;
use lumen_scene::{Scene, ShowcaseConfig, SystemClock, ViewportDimensions};
use lumen_tools::{MaterialPanel, MaterialParam, SceneInspector, SceneSummary};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "lumen-desktop", about = "Lumen material showcase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding px/nx/py/ny/pz/nz cube-map faces
    #[arg(long)]
    env_map: Option<PathBuf>,
}

/// Wheel pixels per notch for touchpads that report pixel deltas.
const PIXELS_PER_NOTCH: f64 = 50.0;

/// Schedules frames through the window's redraw request.
struct WindowScheduler(Arc<Window>);

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::F1 => Key::F1,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn map_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

/// Everything that exists once a window and GPU are available.
struct Showcase {
    window: Arc<Window>,
    ctx: SceneContext<SurfaceRenderer, SystemClock>,
    panel: MaterialPanel,
    pointer: PointerTracker,
    env_load: Option<CubeMapLoad>,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Showcase {
    fn new(
        event_loop: &ActiveEventLoop,
        config: &ShowcaseConfig,
        env_dir: Option<PathBuf>,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let viewport = Self::host_viewport(&window);
        let scene = Scene::showcase(config);
        let renderer = SurfaceRenderer::new(
            window.clone(),
            &scene,
            viewport,
            config.environment.fallback_size,
        )?;
        let egui_renderer =
            egui_wgpu::Renderer::new(renderer.device(), renderer.format(), None, 1, false);
        let ctx = SceneContext::with_scene(config, scene, renderer, SystemClock::new(), viewport);
        let panel = MaterialPanel::new(ctx.scene().material().clone());

        let env_load = env_dir.and_then(|dir| match spawn_cube_map_load(dir.clone()) {
            Ok(load) => {
                tracing::info!("loading environment map from {}", dir.display());
                Some(load)
            }
            Err(e) => {
                tracing::warn!("could not start environment map load: {e}");
                None
            }
        });

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            window,
            ctx,
            panel,
            pointer: PointerTracker::new(),
            env_load,
            egui_winit,
            egui_renderer,
        })
    }

    /// Logical window size and scale factor as a viewport.
    fn host_viewport(window: &Window) -> ViewportDimensions {
        let scale = window.scale_factor();
        let logical: LogicalSize<u32> = window.inner_size().to_logical(scale);
        ViewportDimensions::from_host(logical.width, logical.height, scale)
    }

    fn sync_viewport(&mut self) {
        let v = Self::host_viewport(&self.window);
        self.ctx.resize(v.width, v.height, v.pixel_ratio);
    }

    /// Apply a control action. Returns `false` when the action asks to quit.
    fn apply(&mut self, action: ControlAction) -> bool {
        let height = self.ctx.viewport().height;
        match action {
            ControlAction::Orbit { dx, dy } => self.ctx.controls_mut().drag(dx, dy, height),
            ControlAction::Pan { dx, dy } => {
                let (controls, camera) = self.ctx.controls_and_camera();
                controls.pan(dx, dy, height, camera);
            }
            ControlAction::Dolly(notches) => self.ctx.controls_mut().dolly(notches),
            ControlAction::TogglePanel => self.panel.toggle(),
            ControlAction::Quit => return false,
        }
        true
    }

    fn poll_environment(&mut self) {
        let Some(load) = &mut self.env_load else {
            return;
        };
        match load.try_take() {
            Some(Ok(cube)) => self.ctx.renderer_mut().set_environment(&cube),
            Some(Err(e)) => tracing::warn!("environment map unavailable, keeping gradient: {e}"),
            None => return,
        }
        self.env_load = None;
    }

    fn draw_overlay(&mut self, egui_ctx: &EguiContext, view: &wgpu::TextureView) {
        let summary = SceneInspector::summary(&self.ctx);
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ui_ctx| {
            draw_panel(ui_ctx, &self.panel, &summary);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let renderer = self.ctx.renderer();
        let (device, queue) = (renderer.device(), renderer.queue());
        let (width, height) = renderer.physical_size();
        // Surface pixels per logical point; below native when the ratio is capped.
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: renderer.pixel_ratio() as f32,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_panel(ctx: &EguiContext, panel: &MaterialPanel, summary: &SceneSummary) {
    if !panel.is_visible() {
        return;
    }

    egui::Window::new("Material")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            for param in MaterialParam::ALL {
                let spec = panel.spec(param);
                let mut value = panel.get(param);
                let response = ui.add(
                    egui::Slider::new(&mut value, spec.min..=spec.max)
                        .step_by(spec.step as f64)
                        .max_decimals(4)
                        .text(param.label()),
                );
                if response.changed() {
                    panel.set(param, value);
                }
            }

            ui.separator();
            ui.label(format!(
                "t = {:.2}s  frames: {}",
                summary.elapsed, summary.frames
            ));
            ui.label(format!(
                "Viewport: {}x{} @{:.2}",
                summary.viewport.width, summary.viewport.height, summary.viewport.pixel_ratio
            ));
            ui.label(format!(
                "Camera: ({:.2}, {:.2}, {:.2})",
                summary.camera_position[0], summary.camera_position[1], summary.camera_position[2]
            ));
            for object in &summary.objects {
                ui.monospace(object.to_string());
            }

            ui.separator();
            ui.small("F1: Toggle panel | LMB: Orbit | RMB: Pan | Wheel: Zoom | Esc: Quit");
        });
}

struct App {
    config: ShowcaseConfig,
    env_dir: Option<PathBuf>,
    driver: AnimationDriver,
    egui_ctx: EguiContext,
    showcase: Option<Showcase>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: ShowcaseConfig, env_dir: Option<PathBuf>) -> Self {
        Self {
            config,
            env_dir,
            driver: AnimationDriver::new(),
            egui_ctx: EguiContext::default(),
            showcase: None,
            init_error: None,
        }
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.stop_handle().stop();
        event_loop.exit();
    }

    fn frame(&mut self) {
        let Some(showcase) = self.showcase.as_mut() else {
            return;
        };
        showcase.poll_environment();

        let mut scheduler = WindowScheduler(showcase.window.clone());
        let Some(result) = self.driver.on_frame(&mut showcase.ctx, &mut scheduler) else {
            return;
        };
        match result {
            Ok(frame) => {
                showcase.draw_overlay(&self.egui_ctx, &frame.view);
                frame.present();
            }
            Err(RenderError::SurfaceReconfigured) => {
                tracing::debug!("surface reconfigured, frame skipped");
            }
            Err(e) => tracing::error!("{e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.showcase.is_some() {
            return;
        }

        match Showcase::new(event_loop, &self.config, self.env_dir.take(), &self.egui_ctx) {
            Ok(showcase) => {
                self.driver
                    .start(&mut WindowScheduler(showcase.window.clone()));
                self.showcase = Some(showcase);
            }
            Err(e) => {
                tracing::error!("failed to start showcase: {e}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::RedrawRequested) {
            self.frame();
            return;
        }

        let Some(showcase) = self.showcase.as_mut() else {
            return;
        };

        let response = showcase
            .egui_winit
            .on_window_event(&showcase.window, &event);
        if response.consumed {
            return;
        }

        let action = match event {
            WindowEvent::CloseRequested => Some(ControlAction::Quit),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                showcase.sync_viewport();
                None
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => ControlAction::from_key(map_key(code)),
            WindowEvent::MouseInput { button, state, .. } => {
                let button = map_button(button);
                match state {
                    ElementState::Pressed => showcase.pointer.press(button),
                    ElementState::Released => showcase.pointer.release(button),
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(showcase.window.scale_factor());
                showcase.pointer.moved(logical.x, logical.y)
            }
            WindowEvent::CursorLeft { .. } => {
                showcase.pointer.left();
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_NOTCH) as f32,
                };
                showcase.pointer.wheel(notches)
            }
            _ => None,
        };

        if let Some(action) = action {
            let keep_running = self
                .showcase
                .as_mut()
                .is_some_and(|showcase| showcase.apply(action));
            if !keep_running {
                tracing::info!("quit requested");
                self.quit(event_loop);
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("lumen-desktop starting");

    let config = ShowcaseConfig::load_or_default(cli.config.as_deref())?;
    let env_dir = cli
        .env_map
        .or_else(|| config.environment.directory.clone());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, env_dir);
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
