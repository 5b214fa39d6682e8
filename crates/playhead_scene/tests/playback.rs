// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end playback through the public API.

use playhead_scene::{drive, BasicMobject, Scene, SceneConfig, Wait};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn test_play_session_completes_and_updaters_run() {
    init_tracing();

    let mut entity = BasicMobject::new();
    entity.add_updater(|state, dt| state.position[0] += dt);
    let entity = entity.handle();

    let mut scene = Scene::new(SceneConfig::default());
    scene.add_entity(entity.clone());

    let finished = scene.play(vec![Wait::handle(0.15)]);
    let scene = scene.shared();

    let (_, completed) = tokio::join!(drive(&scene), finished.wait());
    assert!(completed);
    assert!(!scene.lock().is_playing());
    // Updaters accumulated the ticked playback span
    assert!(entity.lock().visual().position[0] > 0.0);
}

#[tokio::test]
async fn test_undo_restores_the_pre_play_scene() {
    init_tracing();

    let mut entity = BasicMobject::new();
    entity.add_updater(|state, dt| state.position[0] += dt);
    let entity = entity.handle();

    let mut scene = Scene::new(SceneConfig::default());
    scene.add_entity(entity.clone());
    scene.save_state(Some("before play"));

    let finished = scene.play(vec![Wait::handle(0.1)]);
    let scene = scene.shared();
    let (_, completed) = tokio::join!(drive(&scene), finished.wait());
    assert!(completed);

    let mut scene = scene.lock();
    assert!(entity.lock().visual().position[0] > 0.0);
    assert!(scene.undo());
    assert_eq!(entity.lock().visual().position[0], 0.0);
}
