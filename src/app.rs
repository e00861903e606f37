use std::time::{Duration, Instant, SystemTime};

use anyhow::Result;
use log::{debug, info};
use winit::{
    dpi::PhysicalPosition,
    event::MouseScrollDelta,
    window::Window,
};

use crate::{assets::SceneAssets, renderer::Renderer, scene::SceneState};

/// Delay between a resize and the full scene reconstruction it triggers.
const RELOAD_DELAY: Duration = Duration::from_millis(200);

/// Pending reload deadlines. Every resize schedules its own reload; deadlines
/// overlapping within the delay window each fire independently, none cancels
/// another.
#[derive(Debug, Default)]
pub struct ReloadSchedule {
    pending: Vec<Instant>,
}

impl ReloadSchedule {
    pub fn schedule(&mut self, now: Instant) {
        self.pending.push(now + RELOAD_DELAY);
    }

    /// Drains every deadline at or before `now`, returning how many fired.
    pub fn due(&mut self, now: Instant) -> usize {
        let before = self.pending.len();
        self.pending.retain(|deadline| *deadline > now);
        before - self.pending.len()
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Accumulated page offset in pixels, driven by wheel input. Wheel-down is
/// negative, the offset grows downward from 0 and never goes above the top.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollOffset(f32);

impl ScrollOffset {
    /// Folds one wheel event in and returns the new offset. Line deltas count
    /// 60 pixels per line, pixel deltas apply as-is.
    pub fn apply(&mut self, delta: MouseScrollDelta) -> f32 {
        let dy = match delta {
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32,
            MouseScrollDelta::LineDelta(_, y) => y * 60.0,
        };
        self.0 = (self.0 - dy).max(0.0);
        self.0
    }
}

pub struct App {
    window: Window,
    scene: SceneState,
    renderer: Renderer,
    scroll_offset: ScrollOffset,
    reloads: ReloadSchedule,
}

impl App {
    pub async fn new(window: Window) -> Result<Self> {
        let scene = SceneState::new(fresh_seed());
        let assets = SceneAssets::load();
        let renderer = Renderer::new(&window, &scene, &assets).await?;

        Ok(Self {
            window,
            scene,
            renderer,
            scroll_offset: ScrollOffset::default(),
            reloads: ReloadSchedule::default(),
        })
    }

    /// A resized surface invalidates the composition, so the whole scene is
    /// rebuilt from scratch after a short fade rather than re-laid-out.
    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.renderer.resize(size);
        self.reloads.schedule(Instant::now());
        info!("Resized to {}x{}, reload scheduled", size.width, size.height);
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        let t = self.scroll_offset.apply(delta);
        debug!("scroll offset: {}", t);

        self.scene.apply_scroll(t);
    }

    pub fn render(&mut self) {
        let fired = self.reloads.due(Instant::now());
        for _ in 0..fired {
            self.reload();
        }
        if self.reloads.is_pending() {
            // Faded out while the reload timer runs.
            self.renderer.render_blank();
            return;
        }

        self.scene.advance_frame();
        self.renderer.render(&self.scene);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// The hard-reset path: fresh scene state, assets re-read, GPU scene
    /// resources rebuilt. Equivalent to a page reload.
    fn reload(&mut self) {
        info!("Reloading scene");
        self.scene = SceneState::new(fresh_seed());
        self.scroll_offset = ScrollOffset::default();
        let assets = SceneAssets::load();
        self.renderer.rebuild_scene(&self.scene, &assets);
    }
}

fn fresh_seed() -> u64 {
    let seed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    info!("Seeded RNG with {}", seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_resize_schedules_one_reload() {
        let mut schedule = ReloadSchedule::default();
        let t0 = Instant::now();
        schedule.schedule(t0);
        assert!(schedule.is_pending());
        assert_eq!(schedule.due(t0 + Duration::from_millis(199)), 0);
        assert_eq!(schedule.due(t0 + Duration::from_millis(200)), 1);
        assert!(!schedule.is_pending());
    }

    #[test]
    fn line_deltas_count_60_pixels_and_pixel_deltas_apply_as_is() {
        let mut offset = ScrollOffset::default();
        assert_eq!(offset.apply(MouseScrollDelta::LineDelta(0.0, -2.0)), 120.0);
        assert_eq!(
            offset.apply(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
                0.0, -50.0
            ))),
            170.0
        );
    }

    #[test]
    fn scrolling_up_past_the_top_clamps_to_zero() {
        let mut offset = ScrollOffset::default();
        // Wheel-up with nothing scrolled stays at the top.
        assert_eq!(offset.apply(MouseScrollDelta::LineDelta(0.0, 3.0)), 0.0);
        // An upward delta larger than the current offset also clamps.
        offset.apply(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert_eq!(offset.apply(MouseScrollDelta::LineDelta(0.0, 5.0)), 0.0);
    }

    #[test]
    fn overlapping_resizes_each_fire_their_own_reload() {
        // Two resizes inside one 200ms window: neither cancels the other.
        let mut schedule = ReloadSchedule::default();
        let t0 = Instant::now();
        schedule.schedule(t0);
        schedule.schedule(t0 + Duration::from_millis(150));
        assert_eq!(schedule.due(t0 + Duration::from_millis(200)), 1);
        assert!(schedule.is_pending());
        assert_eq!(schedule.due(t0 + Duration::from_millis(350)), 1);
        assert!(!schedule.is_pending());
    }
}
