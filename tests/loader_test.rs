use floating_forms::{
    Config, Showcase, Variant,
    data_structures::scene_graph::SceneNode,
    loader::{LoadOutcome, LoadState, ModelLoader, UnavailableAsset},
    palette::SCHEMES,
    procedural::{ORBITER_COUNT, PARTICLE_COUNT, RING_COUNT, is_ring},
};
use instant::Duration;
use rand::{SeedableRng, rngs::StdRng};

mod common;

use crate::common::test_utils::{
    DT, Driver, HEIGHT, ReadyAsset, SEED, SlowAsset, StalledAsset, WIDTH, model,
};

#[test]
fn knot_falls_back_on_the_first_frame() {
    let mut driver = Driver::of(Variant::Knot);
    assert!(driver.showcase.is_loading());
    assert!(driver.showcase.scene().model().is_none());

    driver.frames(1);

    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Fallback));
    let model = model(driver.showcase.scene());
    assert_eq!(model.children().len(), 1 + ORBITER_COUNT);
    assert_eq!(model.children()[0].name(), "torus-knot");
}

#[test]
fn tower_waits_for_the_delay_before_falling_back() {
    let mut driver = Driver::of(Variant::Tower);

    // 62 frames of 16 ms stay just below one second
    driver.frames(62);
    assert!(driver.showcase.is_loading());
    assert!(driver.showcase.scene().model().is_none());
    let indicator = driver.showcase.indicator();
    assert!(indicator.is_visible());
    assert!(indicator.progress() > 50.0 && indicator.progress() <= 95.0);

    driver.frames(1);
    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Fallback));
    assert!(!driver.showcase.indicator().is_visible());
    assert_eq!(driver.showcase.indicator().progress(), 100.0);

    let model = model(driver.showcase.scene());
    let names: Vec<&str> = model.children().iter().map(|child| child.name()).collect();
    assert_eq!(
        names,
        vec!["base", "waist", "tip", "ring-0", "ring-1", "ring-2", "particles"]
    );
    let rings = model.children().iter().filter(|child| is_ring(&***child)).count();
    assert_eq!(rings, RING_COUNT);
    let particles = model.children()[6].as_flat().expect("particle cloud");
    assert_eq!(particles.vertices.len(), PARTICLE_COUNT);
}

#[test]
fn progress_is_capped_while_loading() {
    let config = Config::new(Variant::Tower)
        .with_seed(SEED)
        .with_load_delay(Duration::from_secs(10));
    let mut driver = Driver::new(Showcase::new(config, WIDTH, HEIGHT));
    driver.frames(300);
    assert!(driver.showcase.is_loading());
    assert_eq!(driver.showcase.indicator().progress(), 95.0);
}

#[test]
fn tower_model_glows_in_the_current_scheme() {
    let driver = Driver::settled(Variant::Tower);
    let scheme = SCHEMES[0].colors();
    let model = model(driver.showcase.scene());
    for child in model.children() {
        if let Some(mesh) = child.as_mesh() {
            let emissive = mesh.material.emissive.expect("tower parts glow");
            assert!(scheme.contains(&emissive), "{} glows off-scheme", child.name());
        }
    }
}

#[test]
fn working_source_installs_its_model() {
    let config = Config::new(Variant::Tower).with_seed(SEED);
    let mut driver = Driver::new(Showcase::with_source(config, WIDTH, HEIGHT, &mut ReadyAsset));
    driver.settle();

    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Loaded));
    assert_eq!(model(driver.showcase.scene()).name(), "asset");
    assert!(!driver.showcase.indicator().is_visible());
}

#[test]
fn stalled_source_falls_back_after_the_delay() {
    let config = Config::new(Variant::Tower).with_seed(SEED);
    let mut driver = Driver::new(Showcase::with_source(config, WIDTH, HEIGHT, &mut StalledAsset));
    driver.settle();

    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Fallback));
    assert_eq!(model(driver.showcase.scene()).name(), "model");
}

#[test]
fn fetch_progresses_between_frames() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let delay = Duration::from_millis(100);
    let mut loader = ModelLoader::start(Variant::Tower, delay, &mut SlowAsset { polls: 5 });

    // ready on the fifth frame, installed once the delay is over
    for _ in 0..6 {
        assert!(loader.advance(DT, &SCHEMES[0], &mut rng).is_none());
    }
    let (outcome, model) = loader
        .advance(DT, &SCHEMES[0], &mut rng)
        .expect("settles after 112ms");
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(model.name(), "slow-asset");
}

#[test]
fn slow_source_finishing_in_time_is_installed() {
    let config = Config::new(Variant::Tower).with_seed(SEED);
    let mut driver = Driver::new(Showcase::with_source(config, WIDTH, HEIGHT, &mut SlowAsset { polls: 30 }));
    driver.settle();

    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Loaded));
    assert_eq!(model(driver.showcase.scene()).name(), "slow-asset");
}

#[test]
fn slow_source_missing_the_delay_falls_back() {
    let config = Config::new(Variant::Tower).with_seed(SEED);
    let mut driver = Driver::new(Showcase::with_source(config, WIDTH, HEIGHT, &mut SlowAsset { polls: 500 }));
    driver.settle();

    assert_eq!(driver.showcase.outcome(), Some(LoadOutcome::Fallback));
    assert_eq!(model(driver.showcase.scene()).name(), "model");
}

#[test]
fn loader_settles_exactly_once() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut loader = ModelLoader::start(Variant::Knot, Duration::ZERO, &mut UnavailableAsset::default());
    assert!(matches!(loader.state(), LoadState::Loading { .. }));

    let first = loader.advance(DT, &SCHEMES[0], &mut rng);
    assert!(matches!(first, Some((LoadOutcome::Fallback, _))));
    assert!(matches!(loader.state(), LoadState::Fallback));

    for _ in 0..10 {
        assert!(loader.advance(DT, &SCHEMES[0], &mut rng).is_none());
    }
}

#[test]
fn scene_keeps_a_single_model() {
    let mut driver = Driver::settled(Variant::Tower);
    let meshes = driver.showcase.scene().mesh_count();
    // 20 cubes plus base, waist, tip and three rings
    assert_eq!(meshes, 26);

    driver.frames(120);
    assert_eq!(driver.showcase.scene().mesh_count(), meshes);

    let scene = driver.showcase.scene_mut();
    let previous = scene.replace_model(Box::new(
        floating_forms::data_structures::scene_graph::ContainerNode::new("replacement"),
    ));
    assert_eq!(previous.map(|model| model.name().to_string()), Some("model".to_string()));
    assert_eq!(scene.roots().filter(|root| root.name() == "model").count(), 0);
    assert_eq!(scene.mesh_count(), 20);
}
