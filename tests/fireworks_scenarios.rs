//! End-to-end scenarios for the fireworks scene.
//!
//! Each test drives a seeded scene at a fixed delta, on the software canvas
//! or on a surface that only counts draw calls, and
//! checks what the pools look like afterwards.

use std::time::Duration;

use glam::{Mat4, UVec2, Vec2, Vec3};

use emberglow::emitter::MaskSource;
use emberglow::input::PointerButton;
use emberglow::surface::{Paint, PointCloud, PointStyle, Stroke};
use emberglow::{Canvas, Config, Fireworks, GlyphMask, Scene, Surface};

const TICK: Duration = Duration::from_millis(16);

/// Counts draw calls without rasterizing anything.
#[derive(Default)]
struct CountingSurface {
    fades: usize,
    strokes: usize,
    discs: usize,
}

impl Surface for CountingSurface {
    fn size(&self) -> UVec2 {
        UVec2::new(320, 200)
    }

    fn fade(&mut self, _color: Vec3, _alpha: f32) {
        self.fades += 1;
    }

    fn stroke(&mut self, _path: &[Vec2], _stroke: Stroke) {
        self.strokes += 1;
    }

    fn fill_disc(&mut self, _center: Vec2, _radius: f32, _paint: Paint) {
        self.discs += 1;
    }

    fn draw_points(&mut self, cloud: &mut PointCloud, _view_proj: Mat4, _style: PointStyle) {
        cloud.take_upload();
    }
}

fn config(seed: u64) -> Config {
    Config {
        seed: Some(seed),
        width: 320,
        height: 200,
        ..Config::default()
    }
}

// ============================================================================
// Launch cadence
// ============================================================================

#[test]
fn test_one_projectile_after_one_interval() {
    let config = config(1);
    let mut scene = Fireworks::new(&config).unwrap();
    let mut canvas = Canvas::new(config.width, config.height);

    scene.step(Duration::from_millis(399), &mut canvas);
    assert_eq!(scene.pools().projectiles.len(), 0);

    let report = scene.step(Duration::from_millis(1), &mut canvas);
    assert_eq!(report.emitted.projectiles, 1);
    assert_eq!(scene.pools().projectiles.len(), 1);
}

#[test]
fn test_launches_stop_at_ceiling() {
    let mut config = config(2);
    config.fireworks.projectile.growth = 1.0;
    config.fireworks.projectile.target_band = 0.0;
    let mut scene = Fireworks::new(&config).unwrap();
    let mut canvas = Canvas::new(config.width, config.height);

    // Targets on the top edge keep every projectile in flight for both ticks.
    // Twelve intervals in one long tick fill the sky to the ceiling.
    let report = scene.step(Duration::from_millis(4800), &mut canvas);
    assert_eq!(report.emitted.projectiles, 10);
    assert_eq!(report.bursts, 0);
    assert_eq!(scene.pools().projectiles.len(), 10);

    let report = scene.step(Duration::from_millis(4000), &mut canvas);
    assert_eq!(report.emitted.projectiles, 0);
    assert_eq!(report.bursts, 0);
    assert_eq!(scene.pools().projectiles.len(), 10);
}

// ============================================================================
// Pool accounting
// ============================================================================

#[test]
fn test_pool_sizes_balance_every_tick() {
    let config = config(3);
    let mut scene = Fireworks::new(&config).unwrap();
    let mut surface = CountingSurface::default();
    scene.pointer_moved(Some(Vec2::new(160.0, 100.0)));

    let mut saw_burst = false;
    for _ in 0..450 {
        let before = scene.pools().clone();
        let report = scene.step(TICK, &mut surface);
        let after = scene.pools();

        assert_eq!(
            after.projectiles.len(),
            before.projectiles.len() + report.emitted.projectiles - report.bursts
        );
        assert_eq!(
            after.sparks.len(),
            before.sparks.len() + report.emitted.sparks + report.burst_sparks - report.sparks_culled
        );
        assert_eq!(
            after.glyphs.len(),
            before.glyphs.len() + report.emitted.glyphs - report.glyphs_culled
        );
        saw_burst |= report.bursts > 0;
    }
    assert!(saw_burst);
}

#[test]
fn test_no_dead_entities_survive_a_tick() {
    let config = config(4);
    let mut scene = Fireworks::new(&config).unwrap();
    let mut surface = CountingSurface::default();

    for _ in 0..400 {
        scene.step(TICK, &mut surface);
        let pools = scene.pools();
        assert!(pools.sparks.iter().all(|s| s.alpha > s.decay));
        assert!(pools.glyphs.iter().all(|g| g.alpha > g.decay));
        assert!(pools.projectiles.iter().all(|p| !p.should_burst()));
    }
}

#[test]
fn test_only_survivors_are_drawn() {
    let config = config(10);
    let mut scene = Fireworks::new(&config).unwrap();

    for _ in 0..380 {
        let mut surface = CountingSurface::default();
        scene.step(TICK, &mut surface);
        let pools = scene.pools();
        assert_eq!(surface.fades, 1);
        assert_eq!(surface.strokes, pools.projectiles.len() + pools.sparks.len());
        assert_eq!(surface.discs, pools.glyphs.len());
    }
}

// ============================================================================
// Finale
// ============================================================================

#[test]
fn test_finale_fires_exactly_once() {
    let config = config(5);
    let mut scene = Fireworks::new(&config).unwrap();
    let mut surface = CountingSurface::default();

    let mut firings = 0;
    for _ in 0..(7000 / 16) {
        let report = scene.step(TICK, &mut surface);
        if report.emitted.glyphs > 0 {
            firings += 1;
            assert!(scene.elapsed() >= Duration::from_millis(5000));
            assert!(scene.elapsed() < Duration::from_millis(5016));
        }
    }
    assert_eq!(firings, 1);
    assert!(scene.finale_fired());
}

#[test]
fn test_single_pixel_mask_yields_one_glyph_point() {
    let mut config = config(6);
    config.width = 4;
    config.height = 4;
    config.fireworks.launch_interval_ms = 0;
    config.fireworks.finale.delay_ms = 0;
    config.fireworks.finale.stride = 4;

    let mut mask = GlyphMask::new(4, 4);
    mask.set(0, 0, 255);
    let mut scene = Fireworks::with_mask(&config, MaskSource::Image(mask)).unwrap();
    let mut canvas = Canvas::new(4, 4);

    let report = scene.step(TICK, &mut canvas);
    assert_eq!(report.emitted.glyphs, 1);
    assert_eq!(scene.pools().glyphs.len(), 1);
    assert_eq!(scene.pools().glyphs.as_slice()[0].origin, Vec2::ZERO);
}

// ============================================================================
// Pointer
// ============================================================================

#[test]
fn test_pointer_trail_stops_when_pointer_leaves() {
    let mut config = config(7);
    config.fireworks.launch_interval_ms = 0;
    let mut scene = Fireworks::new(&config).unwrap();
    let mut canvas = Canvas::new(config.width, config.height);

    scene.pointer_moved(Some(Vec2::new(50.0, 50.0)));
    assert_eq!(scene.step(TICK, &mut canvas).emitted.sparks, 2);

    scene.pointer_moved(None);
    assert_eq!(scene.step(TICK, &mut canvas).emitted.sparks, 0);
}

#[test]
fn test_click_launch_bursts_near_pointer() {
    let mut config = config(8);
    config.fireworks.launch_interval_ms = 0;
    let mut scene = Fireworks::new(&config).unwrap();
    let mut canvas = Canvas::new(config.width, config.height);

    let target = Vec2::new(160.0, 60.0);
    scene.pointer_moved(Some(target));
    scene.pointer_button(PointerButton::Primary, true);
    scene.pointer_moved(None);

    for _ in 0..200 {
        let report = scene.step(TICK, &mut canvas);
        if report.bursts > 0 {
            assert!(report.burst_sparks >= 100);
            return;
        }
    }
    panic!("clicked projectile never burst");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_seed_same_frames() {
    let config = config(9);
    let mut a = Fireworks::new(&config).unwrap();
    let mut b = Fireworks::new(&config).unwrap();
    let mut canvas_a = Canvas::new(config.width, config.height);
    let mut canvas_b = Canvas::new(config.width, config.height);

    for _ in 0..120 {
        a.tick(TICK, &mut canvas_a);
        b.tick(TICK, &mut canvas_b);
    }
    assert_eq!(canvas_a.to_rgba8(), canvas_b.to_rgba8());
}
