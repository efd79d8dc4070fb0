//! Per-frame simulation tick
//!
//! One call per display refresh. The host passes its frame timestamp; all
//! real-time delays are measured against it.

use super::Sprite;
use super::phase::Cue;
use super::state::ShowState;
use crate::consts::FADE_ALPHA;
use crate::overlay::Overlay;
use crate::renderer::{Color, Raster};

/// Advance the show by one frame and draw it
pub fn tick(state: &mut ShowState, raster: &mut dyn Raster, overlay: &mut dyn Overlay, now_ms: f64) {
    // Fade the previous frame for motion trails
    let (w, h) = raster.size();
    raster.fill_rect(0.0, 0.0, w as f32, h as f32, Color::BLACK, FADE_ALPHA);

    state.time_ticks += 1;

    for task in state.timers.drain_due(now_ms) {
        state.run_deferred(task, raster, overlay, now_ms);
    }

    for cue in state.scheduler.advance(&mut state.rng) {
        match cue {
            Cue::TextRocket => state.launch_text_rocket(raster, now_ms),
            Cue::AmbientRocket => state.launch_ambient_rocket(raster),
            Cue::Blessing => state.show_blessing(overlay, now_ms),
        }
    }

    // Rockets first so fresh bursts are simulated this frame
    let ShowState {
        rockets,
        sparks,
        glyphs,
        rng,
        stats,
        scheduler,
        ..
    } = state;

    sweep(rockets, raster, now_ms, |detonation| {
        if let Some(detonation) = detonation {
            let burst = detonation.burst(rng);
            log::debug!(
                "Burst at ({:.0}, {:.0}): {} sparks",
                detonation.pos.x,
                detonation.pos.y,
                burst.len()
            );
            stats.bursts += 1;
            stats.sparks_emitted += burst.len() as u64;
            sparks.extend(burst);
        }
    });
    sweep(sparks, raster, now_ms, |()| {});
    sweep(glyphs, raster, now_ms, |()| {});

    stats.phase = scheduler.phase();
    stats.live_rockets = rockets.len();
    stats.live_sparks = sparks.len();
    stats.live_glyphs = glyphs.len();
}

/// Update, draw and compact a collection in one in-place pass
fn sweep<T: Sprite>(
    items: &mut Vec<T>,
    raster: &mut dyn Raster,
    now_ms: f64,
    mut on_event: impl FnMut(T::Event),
) {
    items.retain_mut(|item| {
        let event = item.update(now_ms);
        on_event(event);
        item.draw(raster);
        item.is_alive()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::overlay::LogOverlay;
    use crate::renderer::SoftCanvas;
    use crate::sampler::sample_text;
    use crate::sim::{Phase, Spark};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Tick `n` more frames at 60 fps timestamps
    fn run(state: &mut ShowState, canvas: &mut SoftCanvas, overlay: &mut LogOverlay, n: u64) {
        for _ in 0..n {
            let now = (state.time_ticks + 1) as f64 * FRAME_MS;
            tick(state, canvas, overlay, now);
        }
    }

    #[test]
    fn test_fresh_state() {
        let state = ShowState::new(1);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.time_ticks, 0);
        assert!(state.rockets.is_empty() && state.sparks.is_empty() && state.glyphs.is_empty());
    }

    #[test]
    fn test_text_rocket_launch() {
        let mut state = ShowState::new(5);
        let mut canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();

        run(&mut state, &mut canvas, &mut overlay, 60);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.rockets.is_empty());

        run(&mut state, &mut canvas, &mut overlay, 1);
        assert_eq!(state.phase(), Phase::TextFormation);
        assert_eq!(state.stats.rockets_launched, 1);
        assert_eq!(state.rockets.len(), 1);
        let rocket = &state.rockets[0];
        assert_eq!(rocket.color, Color::WHITE);
        assert_eq!(rocket.target_y, 300.0);
        // Already moved once this frame
        assert!((rocket.pos.x - 400.0).abs() <= 1.0);
        assert!(rocket.pos.y < 600.0);
        assert_eq!(state.pending_timers(), 1);
    }

    #[test]
    fn test_full_show_scenario() {
        let mut state = ShowState::new(2024);
        let mut canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();
        let expected_glyphs = sample_text(&canvas, GREETING, 800, 600).len();
        assert!(expected_glyphs > 0);

        let mut glyph_batch_tick = None;
        let mut ambient_tick = None;
        let mut idle_rockets = 0;
        for _ in 0..1000 {
            let before = state.stats.clone();
            run(&mut state, &mut canvas, &mut overlay, 1);

            if state.stats.glyph_batches > before.glyph_batches {
                glyph_batch_tick = Some(state.time_ticks);
                assert_eq!(state.glyphs.len(), expected_glyphs);
            }
            if ambient_tick.is_none() && state.phase() == Phase::Ambient {
                ambient_tick = Some(state.time_ticks);
            }
            if ambient_tick.is_none() {
                idle_rockets = state.stats.rockets_launched;
            }
        }

        // One white rocket before ambient launches begin
        assert_eq!(idle_rockets, 1);
        // Glyphs arrive one second (about 60 frames) after the tick-61 launch
        let batch = glyph_batch_tick.expect("glyph batch never spawned");
        assert!((120..=123).contains(&batch), "batch at {}", batch);
        assert_eq!(state.stats.glyph_batches, 1);
        assert_eq!(state.stats.glyphs_spawned, expected_glyphs as u64);
        // Tick 61 + 401
        assert_eq!(ambient_tick, Some(462));
        assert!(state.stats.rockets_launched > 1);
        assert!(state.stats.bursts >= 1);
        // Glyphs live 1200 frames, so they are all still on screen
        assert_eq!(state.glyphs.len(), expected_glyphs);
    }

    #[test]
    fn test_glyphs_use_live_dimensions() {
        let mut state = ShowState::new(9);
        let mut canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();
        run(&mut state, &mut canvas, &mut overlay, 61);
        assert_eq!(state.pending_timers(), 1);

        // Host resizes before the deferred sampling fires
        canvas.resize(1000, 400);
        let expected = sample_text(&canvas, GREETING, 1000, 400).len();
        run(&mut state, &mut canvas, &mut overlay, 70);

        assert_eq!(state.stats.glyphs_spawned, expected as u64);
        assert!(state.glyphs.iter().all(|g| g.dest.x < 1000.0 && g.dest.y < 400.0));
    }

    #[test]
    fn test_glyphs_start_at_center_and_gather() {
        let mut state = ShowState::new(77);
        let mut canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();
        state.form_text(&canvas, 0.0);
        assert!(!state.glyphs.is_empty());
        assert!(state.glyphs.iter().all(|g| g.pos == Vec2::new(400.0, 300.0)));
        assert!(state.glyphs.iter().all(|g| !g.gathering));

        for i in 1..=300 {
            tick(&mut state, &mut canvas, &mut overlay, i as f64 * FRAME_MS);
        }
        assert!(state.glyphs.iter().all(|g| g.gathering));
        let mean = state.glyphs.iter().map(|g| g.distance_to_dest()).sum::<f32>()
            / state.glyphs.len() as f32;
        assert!(mean < 1.0, "mean distance {}", mean);
    }

    #[test]
    fn test_sparks_swept_exactly_when_faded() {
        let mut state = ShowState::new(4);
        let mut canvas = SoftCanvas::new(200, 200);
        let mut overlay = LogOverlay::new();
        state.sparks.push(Spark::new(Vec2::new(100.0, 100.0), Vec2::ZERO, Color::WHITE, 2.0));
        state.sparks.push(Spark {
            alpha: 0.005,
            ..Spark::new(Vec2::new(50.0, 50.0), Vec2::ZERO, Color::WHITE, 2.0)
        });

        tick(&mut state, &mut canvas, &mut overlay, 0.0);
        assert_eq!(state.sparks.len(), 1);
        assert!(state.sparks.iter().all(|s| s.alpha > 0.0));
    }

    #[test]
    fn test_rocket_burst_feeds_sparks_same_frame() {
        let mut state = ShowState::new(8);
        let mut canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();
        let mut rocket = crate::sim::Rocket::launch(&mut state.rng, 400.0, 600.0, 599.0, Color::WHITE);
        rocket.vel = Vec2::new(0.0, -5.0);
        state.rockets.push(rocket);

        tick(&mut state, &mut canvas, &mut overlay, 0.0);
        assert!(state.rockets.is_empty());
        assert_eq!(state.stats.bursts, 1);
        assert!((80..120).contains(&state.sparks.len()));
        // Sparks already took their first step
        assert!(state.sparks.iter().all(|s| (s.alpha - 0.99).abs() < 1e-6));
    }

    #[test]
    fn test_blessings_dismissed_after_ten_seconds() {
        let mut state = ShowState::new(12);
        let canvas = SoftCanvas::new(800, 600);
        let mut overlay = LogOverlay::new();
        state.show_blessing(&mut overlay, 1000.0);
        assert_eq!(overlay.len(), 1);
        let (_, text) = overlay.live().next().unwrap();
        assert!(crate::overlay::BLESSINGS.contains(&text));

        for task in state.timers.drain_due(10_999.0) {
            state.run_deferred(task, &canvas, &mut overlay, 10_999.0);
        }
        assert_eq!(overlay.len(), 1);
        for task in state.timers.drain_due(11_000.0) {
            state.run_deferred(task, &canvas, &mut overlay, 11_000.0);
        }
        assert!(overlay.is_empty());
        assert_eq!(state.stats.blessings_dismissed, 1);
    }

    #[test]
    fn test_fade_layer_darkens_old_frames() {
        let mut state = ShowState::new(3);
        let mut canvas = SoftCanvas::new(10, 10);
        let mut overlay = LogOverlay::new();
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, Color::WHITE, 1.0);
        tick(&mut state, &mut canvas, &mut overlay, 0.0);
        assert_eq!(canvas.pixel(5, 5), Some([217, 217, 217, 255]));
    }

    #[test]
    fn test_determinism() {
        let mut a = ShowState::new(99);
        let mut b = ShowState::new(99);
        let mut canvas_a = SoftCanvas::new(320, 240);
        let mut canvas_b = SoftCanvas::new(320, 240);
        let mut overlay_a = LogOverlay::new();
        let mut overlay_b = LogOverlay::new();
        run(&mut a, &mut canvas_a, &mut overlay_a, 700);
        run(&mut b, &mut canvas_b, &mut overlay_b, 700);

        assert_eq!(a.stats, b.stats);
        assert_eq!(a.sparks.len(), b.sparks.len());
        assert_eq!(canvas_a.read_pixels().unwrap(), canvas_b.read_pixels().unwrap());
    }

    #[test]
    fn test_stats_snapshot_phase_and_live_counts() {
        let mut state = ShowState::new(21);
        let mut canvas = SoftCanvas::new(320, 240);
        let mut overlay = LogOverlay::new();
        assert_eq!(state.stats.phase, Phase::Idle);

        run(&mut state, &mut canvas, &mut overlay, 61);
        assert_eq!(state.stats.phase, Phase::TextFormation);
        assert_eq!(state.stats.live_rockets, 1);

        run(&mut state, &mut canvas, &mut overlay, 500);
        assert_eq!(state.stats.phase, Phase::Ambient);
        assert_eq!(state.stats.live_rockets, state.rockets.len());
        assert_eq!(state.stats.live_sparks, state.sparks.len());
        assert_eq!(state.stats.live_glyphs, state.glyphs.len());
        assert!(state.stats.live_glyphs > 0);

        let json = serde_json::to_value(&state.stats).unwrap();
        assert_eq!(json["phase"], "Ambient");
        assert_eq!(json["live_glyphs"], state.glyphs.len());
    }

    #[test]
    fn test_ambient_rocket_spawn_ranges() {
        let mut state = ShowState::new(31);
        let canvas = SoftCanvas::new(800, 600);
        for _ in 0..2000 {
            state.launch_ambient_rocket(&canvas);
        }
        assert_eq!(state.rockets.len(), 2000);
        assert_eq!(state.stats.rockets_launched, 2000);
        for rocket in &state.rockets {
            assert!((0.0..800.0).contains(&rocket.pos.x), "x {}", rocket.pos.x);
            assert_eq!(rocket.pos.y, 600.0);
            assert!((0.0..300.0).contains(&rocket.target_y), "target {}", rocket.target_y);
            // Full saturation at 60% lightness: one channel maxed, one at 51
            let c = rocket.color;
            assert_eq!(c.r.max(c.g).max(c.b), 255);
            assert_eq!(c.r.min(c.g).min(c.b), 51);
        }
        // Hues spread around the wheel rather than sticking to one colour
        assert!(state.rockets.iter().any(|r| r.color.g == 255));
        assert!(state.rockets.iter().any(|r| r.color.b == 255));
    }

    #[test]
    fn test_glyph_hues_stay_pink_to_orange() {
        let mut state = ShowState::new(41);
        let canvas = SoftCanvas::new(800, 600);
        state.form_text(&canvas, 0.0);
        assert!(!state.glyphs.is_empty());
        // Hue 330..390 always peaks in red, with blue falling off toward orange
        assert!(state.glyphs.iter().all(|g| g.color.r == 255));
        assert!(state.glyphs.iter().all(|g| g.color.g == 51 || g.color.b == 51));
    }
}
