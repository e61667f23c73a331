use crate::context::SceneContext;
use crate::renderer::Renderer;
use lumen_scene::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Host-provided "call me on the next frame" primitive.
///
/// Desktop hosts request a window redraw; headless hosts set a flag that
/// their own loop polls.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Cloneable flag that stops an [`AnimationDriver`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Headless scheduler: remembers whether a frame was requested.
#[derive(Debug, Default)]
pub struct FrameFlag {
    requested: bool,
}

impl FrameFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}

impl FrameScheduler for FrameFlag {
    fn request_frame(&mut self) {
        self.requested = true;
    }
}

/// Drives [`SceneContext::tick`] once per frame and re-registers itself with
/// the host scheduler until stopped.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    stop: StopHandle,
    frames: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Frames driven so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ask the host for the first frame.
    pub fn start(&self, scheduler: &mut impl FrameScheduler) {
        if self.is_running() {
            scheduler.request_frame();
        }
    }

    /// Handle one refresh signal.
    ///
    /// Returns `None` without touching the context once stopped. Otherwise
    /// ticks the context and schedules the next frame, unless a stop was
    /// requested while this frame ran.
    pub fn on_frame<R: Renderer, C: Clock>(
        &mut self,
        ctx: &mut SceneContext<R, C>,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<R::Output> {
        if self.stop.is_stopped() {
            return None;
        }
        let output = ctx.tick();
        self.frames += 1;
        if !self.stop.is_stopped() {
            scheduler.request_frame();
        } else {
            tracing::debug!("animation stopped after {} frames", self.frames);
        }
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DebugTextRenderer;
    use lumen_scene::{ManualClock, ShowcaseConfig, ViewportDimensions};

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn context() -> SceneContext<DebugTextRenderer, ManualClock> {
        SceneContext::new(
            &ShowcaseConfig::default(),
            DebugTextRenderer::new(),
            ManualClock::new(),
            ViewportDimensions::from_host(800, 600, 1.0),
        )
    }

    #[test]
    fn each_frame_schedules_the_next() {
        let mut ctx = context();
        let mut driver = AnimationDriver::new();
        let mut scheduler = CountingScheduler::default();
        driver.start(&mut scheduler);
        for _ in 0..5 {
            assert!(driver.on_frame(&mut ctx, &mut scheduler).is_some());
        }
        assert_eq!(scheduler.requests, 6);
        assert_eq!(driver.frames(), 5);
        assert_eq!(ctx.renderer().frames_rendered(), 5);
    }

    #[test]
    fn stop_prevents_rescheduling() {
        let mut ctx = context();
        let mut driver = AnimationDriver::new();
        let mut scheduler = CountingScheduler::default();
        let stop = driver.stop_handle();

        driver.on_frame(&mut ctx, &mut scheduler);
        stop.stop();
        assert!(!driver.is_running());
        assert!(driver.on_frame(&mut ctx, &mut scheduler).is_none());
        driver.start(&mut scheduler);
        assert_eq!(scheduler.requests, 1);
        assert_eq!(ctx.renderer().frames_rendered(), 1);
    }

    #[test]
    fn headless_loop_with_frame_flag() {
        let mut ctx = context();
        let mut driver = AnimationDriver::new();
        let stop = driver.stop_handle();
        let mut flag = FrameFlag::new();
        driver.start(&mut flag);

        let mut last = String::new();
        while flag.take() {
            ctx.clock_mut().advance(1.0);
            if let Some(out) = driver.on_frame(&mut ctx, &mut flag) {
                last = out;
            }
            if driver.frames() == 10 {
                stop.stop();
            }
        }
        assert_eq!(driver.frames(), 10);
        assert!(last.contains("Frame 9"));
        let sphere = ctx.scene().object("sphere").unwrap();
        assert_eq!(sphere.transform.rotation.y, 0.1 * 10.0);
    }
}
