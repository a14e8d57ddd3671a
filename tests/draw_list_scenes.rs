//! Scenes ticked into the GPU draw list, checking what the window host
//! would hand to the renderer.

use std::sync::Arc;
use std::time::Duration;

use emberglow::gpu::{DrawList, Layer};
use emberglow::{Config, ControlRecord, Fireworks, Saturn, Surface};

const TICK: Duration = Duration::from_millis(16);

#[test]
fn test_fireworks_frame_starts_with_fade() {
    let mut config = Config {
        seed: Some(5),
        width: 320,
        height: 200,
        ..Config::default()
    };
    // Targets on the top edge keep projectiles in flight.
    config.fireworks.projectile.growth = 1.0;
    config.fireworks.projectile.target_band = 0.0;
    let mut scene = Fireworks::new(&config).unwrap();
    let mut frame = DrawList::new(config.width, config.height);

    for _ in 0..100 {
        frame.reset();
        scene.step(TICK, &mut frame);
    }

    let fade = frame.shapes()[0];
    assert_eq!(fade.a, [160.0, 100.0]);
    assert_eq!(fade.a, fade.b);
    assert_eq!(fade.color[3], config.fireworks.fade_alpha);
    assert!(fade.radius >= frame.size().as_vec2().length() - 1e-3);

    // Projectiles in flight draw trail segments over the fade.
    assert!(scene.pools().projectiles.len() > 0);
    assert!(frame.shapes().len() > 1);
    assert!(matches!(frame.layers(), [Layer::Shapes(_)]));
    assert!(frame.batches().is_empty());
}

#[test]
fn test_saturn_frame_clears_then_draws_two_clouds() {
    let mut config = Config {
        seed: Some(6),
        width: 160,
        height: 90,
        ..Config::default()
    };
    config.saturn.core.count = 300;
    config.saturn.ring.count = 600;
    let mut scene = Saturn::with_record(&config, Arc::new(ControlRecord::new()));
    let mut frame = DrawList::new(config.width, config.height);

    scene.step(TICK, &mut frame);

    assert_eq!(frame.shapes().len(), 1);
    assert_eq!(frame.shapes()[0].color[3], 1.0);
    assert_eq!(frame.batches().len(), 2);
    assert_eq!(frame.points().len(), 900);
    assert_eq!(frame.layers(), &[Layer::Shapes(0..1), Layer::Points(0..900)]);

    assert_eq!(frame.batches()[0].params[0], config.saturn.core.size);
    assert_eq!(frame.batches()[1].params[0], config.saturn.ring.size);
    assert!(frame.points()[..300].iter().all(|p| p.batch == 0));
    assert!(frame.points()[300..].iter().all(|p| p.batch == 1));
    assert_eq!(frame.dropped_batches(), 0);
}
