use anyhow::{Context, ensure};
use clap::{Parser, Subcommand};
use lumen_render::{AnimationDriver, DebugTextRenderer, FrameFlag, SceneContext};
use lumen_scene::{ManualClock, Scene, ShowcaseConfig, ViewportDimensions};
use lumen_tools::SceneInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "CLI tool for the Lumen showcase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the scene contents
    Info,
    /// Run the frame loop headless and print every frame
    Simulate {
        /// Number of frames to render
        #[arg(short, long, default_value = "5")]
        frames: u64,
        /// Simulated refresh rate
        #[arg(long, default_value = "60")]
        fps: f64,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Host device pixel ratio (capped at 2)
        #[arg(long, default_value = "1")]
        pixel_ratio: f64,
    },
    /// Show how a resize propagates to the camera and renderer
    Resize {
        /// Initial size, e.g. 800x600
        #[arg(long, default_value = "800x600", value_parser = parse_size)]
        from: (u32, u32),
        /// New size, e.g. 1024x768
        #[arg(long, default_value = "1024x768", value_parser = parse_size)]
        to: (u32, u32),
        /// Host device pixel ratio (capped at 2)
        #[arg(long, default_value = "1")]
        pixel_ratio: f64,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid dimension `{v}`: {e}"))
    };
    Ok((parse(w)?, parse(h)?))
}

type HeadlessContext = SceneContext<DebugTextRenderer, ManualClock>;

fn headless(config: &ShowcaseConfig, viewport: ViewportDimensions) -> HeadlessContext {
    SceneContext::new(config, DebugTextRenderer::new(), ManualClock::new(), viewport)
}

fn simulate(
    config: &ShowcaseConfig,
    frames: u64,
    fps: f64,
    viewport: ViewportDimensions,
) -> anyhow::Result<()> {
    ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
    tracing::debug!(
        "simulating {frames} frames at {fps} fps on {}x{}@{}",
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    let mut ctx = headless(config, viewport);
    let mut driver = AnimationDriver::new();
    let stop = driver.stop_handle();
    let mut flag = FrameFlag::new();
    if frames == 0 {
        stop.stop();
    }

    driver.start(&mut flag);
    while flag.take() {
        if let Some(text) = driver.on_frame(&mut ctx, &mut flag) {
            print!("{text}");
        }
        if driver.frames() >= frames {
            stop.stop();
        }
        ctx.clock_mut().advance(1.0 / fps);
    }

    println!();
    print!("{}", SceneInspector::summary(&ctx));
    Ok(())
}

fn resize(
    config: &ShowcaseConfig,
    from: (u32, u32),
    to: (u32, u32),
    pixel_ratio: f64,
) {
    let mut ctx = headless(
        config,
        ViewportDimensions::from_host(from.0, from.1, pixel_ratio),
    );
    let describe = |label: &str, ctx: &HeadlessContext| {
        let (w, h) = ctx.renderer().size();
        println!(
            "{label}: renderer {w}x{h} @{:.2} camera aspect={:.4}",
            ctx.renderer().pixel_ratio(),
            ctx.camera().aspect()
        );
    };

    describe("before", &ctx);
    ctx.resize(to.0, to.1, pixel_ratio);
    describe("after", &ctx);
    ctx.resize(to.0, to.1, pixel_ratio);
    describe("repeat", &ctx);

    print!("{}", ctx.tick());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = ShowcaseConfig::load_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "loading configuration {}",
            cli.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".into())
        )
    })?;

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", lumen_scene::crate_info());
            println!("render: {}", lumen_render::crate_info());
            println!("assets: {}", lumen_assets::crate_info());
            println!("input: {}", lumen_input::crate_info());
            println!("tools: {}", lumen_tools::crate_info());
            println!();

            let scene = Scene::showcase(&config);
            for object in scene.objects() {
                let p = object.transform.position;
                println!(
                    "  {} ({}) at ({:.2}, {:.2}, {:.2})",
                    object.name,
                    object.primitive.kind(),
                    p.x,
                    p.y,
                    p.z
                );
            }
            let material = scene.material().snapshot();
            println!(
                "material: metalness={:.4} roughness={:.4}",
                material.metalness, material.roughness
            );
            let rates = scene.rotation_rates();
            println!("rotation rates: x={} rad/s y={} rad/s", rates.x, rates.y);
        }
        Commands::Simulate {
            frames,
            fps,
            width,
            height,
            pixel_ratio,
        } => {
            let viewport = ViewportDimensions::from_host(width, height, pixel_ratio);
            simulate(&config, frames, fps, viewport)?;
        }
        Commands::Resize {
            from,
            to,
            pixel_ratio,
        } => resize(&config, from, to, pixel_ratio),
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
