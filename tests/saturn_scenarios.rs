//! End-to-end scenarios for the Saturn scene and its gesture pipeline.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use emberglow::gesture::synthetic_hand;
use emberglow::{Canvas, Config, ControlRecord, Saturn, Scene, Vec2};

const TICK: Duration = Duration::from_millis(16);

fn config() -> Config {
    let mut config = Config {
        seed: Some(11),
        width: 160,
        height: 90,
        ..Config::default()
    };
    config.saturn.core.count = 300;
    config.saturn.ring.count = 600;
    config
}

fn open_palm_at(x: f32) -> Vec<emberglow::Landmark> {
    synthetic_hand(Vec2::new(x, 0.6), 1.0, &Default::default())
}

#[test]
fn test_idle_scene_sits_at_closed_values() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);

    let frame = scene.step(TICK, &mut canvas);
    assert_eq!(frame.scale, 0.5);
    assert_eq!(frame.camera_distance, 20.0);
    assert_eq!(frame.light, 0.5);
    assert_eq!(frame.chaos, 0.0);
}

#[test]
fn test_open_palm_grows_and_approaches() {
    let config = config();
    let record = Arc::new(ControlRecord::new());
    let mut scene = Saturn::with_record(&config, record);
    let mut canvas = Canvas::new(config.width, config.height);

    scene.tracker().on_results(Some(&open_palm_at(0.5)));

    let mut last_scale = 0.0;
    for _ in 0..300 {
        let frame = scene.step(TICK, &mut canvas);
        assert!(frame.scale >= last_scale);
        last_scale = frame.scale;
    }
    let frame = scene.frame();
    assert!(frame.scale > 1.49);
    assert!(frame.camera_distance < 10.1);
    assert!(frame.chaos > 0.9);
    assert!((scene.camera().distance - frame.camera_distance).abs() < 1e-6);
}

#[test]
fn test_openness_converges_within_smoothing_bound() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);
    scene.tracker().on_results(Some(&open_palm_at(0.5)));

    let epsilon = 1e-2_f32;
    let factor = config.saturn.openness_smoothing;
    let bound = (epsilon.ln() / (1.0 - factor).ln()).ceil() as usize;

    for _ in 0..bound {
        scene.step(TICK, &mut canvas);
    }
    assert!(1.0 - scene.frame().openness < epsilon);
}

#[test]
fn test_chaos_only_near_full_openness() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);
    scene.tracker().on_results(Some(&open_palm_at(0.5)));

    for _ in 0..300 {
        let frame = scene.step(TICK, &mut canvas);
        if frame.eased <= 0.9 {
            assert_eq!(frame.chaos, 0.0);
        } else {
            assert!(frame.chaos > 0.0);
        }
    }
}

#[test]
fn test_hand_on_right_spins_clockwise() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);
    scene.tracker().on_results(Some(&open_palm_at(0.95)));

    for _ in 0..60 {
        scene.step(TICK, &mut canvas);
    }
    assert!(scene.yaw() < 0.0);
    assert!(scene.frame().rotation < 0.0);
}

#[test]
fn test_lost_hand_relaxes_back() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);
    let tracker = scene.tracker();

    tracker.on_results(Some(&open_palm_at(0.5)));
    for _ in 0..200 {
        scene.step(TICK, &mut canvas);
    }
    let open = scene.frame().scale;

    tracker.on_results(None);
    for _ in 0..200 {
        scene.step(TICK, &mut canvas);
    }
    assert!(scene.frame().scale < open);
    assert!(scene.frame().scale < 0.6);
}

#[test]
fn test_last_values_persist_when_inference_stops() {
    let config = config();
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut canvas = Canvas::new(config.width, config.height);

    scene.tracker().on_results(Some(&open_palm_at(0.5)));
    for _ in 0..400 {
        scene.step(TICK, &mut canvas);
    }
    // No further reports: the record keeps the last hand.
    let frame = scene.step(TICK, &mut canvas);
    assert!(frame.openness > 0.99);
}

#[test]
fn test_detector_on_another_thread() {
    let config = config();
    let record = Arc::new(ControlRecord::new());
    let mut scene = Saturn::with_record(&config, record);
    let mut canvas = Canvas::new(config.width, config.height);
    let tracker = scene.tracker();

    let detector = thread::spawn(move || {
        for i in 0..50 {
            let openness = i as f32 / 49.0;
            let hand = synthetic_hand(Vec2::new(0.5, 0.5), openness, &Default::default());
            tracker.on_results(Some(&hand));
        }
    });

    for _ in 0..20 {
        scene.tick(TICK, &mut canvas);
    }
    detector.join().unwrap();

    for _ in 0..400 {
        scene.tick(TICK, &mut canvas);
    }
    assert!(scene.frame().openness > 0.99);
}

#[test]
fn test_population_sizes_are_fixed() {
    let config = config();
    let mut scene = Saturn::new(&config);
    let mut canvas = Canvas::new(config.width, config.height);
    for _ in 0..30 {
        scene.tick(TICK, &mut canvas);
    }
    assert_eq!(scene.core().len(), 300);
    assert_eq!(scene.ring().len(), 600);
    assert_eq!(scene.core().cloud().len(), 300);
    assert_eq!(scene.ring().cloud().len(), 600);
}

#[test]
fn test_scene_draws_something() {
    let config = config();
    let mut scene = Saturn::new(&config);
    let mut canvas = Canvas::new(config.width, config.height);
    scene.tick(TICK, &mut canvas);

    let lit = canvas.to_rgba8().pixels().filter(|p| p.0[0] > 0 || p.0[1] > 0).count();
    assert!(lit > 0);
}
