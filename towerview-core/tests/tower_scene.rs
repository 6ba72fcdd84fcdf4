use approx::assert_relative_eq;
use std::collections::HashSet;
use std::path::PathBuf;

use towerview_core::{
    Camera, Device, Equipment, Level, Placement, Rgb, RenderableKind, Scene, SceneBackend,
    SceneManager, Status, TowerDataset, ViewerConfig,
};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/sample_tower.json")
}

fn manager() -> SceneManager<Scene> {
    let config = ViewerConfig::default();
    let scene = Scene::lit(Camera::from_config(&config.camera, 800, 900), &config.lights);
    SceneManager::new(scene, Placement::new(config.placement), config.camera.framing_factor)
}

fn assert_in_sync(manager: &SceneManager<Scene>) {
    let tracked: HashSet<_> = manager.devices().iter().copied().chain(manager.tower()).collect();
    let attached: HashSet<_> = manager.backend().objects().iter().map(|r| r.id()).collect();
    assert_eq!(tracked, attached);
    assert_eq!(manager.backend().objects().len(), tracked.len());
}

#[test]
fn busy_level_becomes_one_ring() {
    let mut manager = manager();
    manager
        .refresh_components(180.0, &[Level::new(72.0, Status::Busy)], &[])
        .unwrap();

    let rings: Vec<_> = manager
        .backend()
        .objects()
        .iter()
        .filter(|r| r.kind == RenderableKind::Level)
        .collect();
    assert_eq!(rings.len(), 1);
    assert_relative_eq!(rings[0].position.y, -18.0);
    assert_eq!(rings[0].color, Rgb(0x6666ff));
}

#[test]
fn panel_antenna_box_size_and_height() {
    let mut manager = manager();
    let device = Device::new(147.0, Status::Busy, Equipment::with_dimensions(11.9, 96.6, 7.1));
    manager.refresh_components(180.0, &[], &[device]).unwrap();

    let id = manager.devices()[0];
    let boxed = manager.backend().get(id).unwrap();
    let (min, max) = boxed.mesh.bounds().unwrap();
    assert_relative_eq!(max.x - min.x, 0.991_666, epsilon = 1e-4);
    assert_relative_eq!(max.y - min.y, 8.05, epsilon = 1e-4);
    assert_relative_eq!(max.z - min.z, 0.591_666, epsilon = 1e-4);
    assert_relative_eq!(boxed.position.y, 57.0);
    assert_eq!(boxed.color, Rgb(0x0000ff));
}

#[test]
fn sample_dataset_renders_every_record() {
    let dataset = TowerDataset::load(sample_path()).unwrap();
    assert_eq!(dataset.levels.len(), 18);
    assert_eq!(dataset.devices.len(), 36);

    let mut manager = manager();
    manager
        .refresh_components(dataset.tower.height, &dataset.levels, &dataset.devices)
        .unwrap();
    assert_eq!(manager.devices().len(), 18 + 36);
    assert_in_sync(&manager);
    assert_relative_eq!(manager.backend().camera().distance(), 270.0, epsilon = 1e-2);

    // Empty-mount placeholders stay in the scene as zero-size boxes
    let empty = manager
        .backend()
        .objects()
        .iter()
        .filter(|r| r.kind == RenderableKind::Device && r.vertical_extent() == 0.0)
        .count();
    assert_eq!(empty, 3);

    let triangles = manager.backend().project(160, 90);
    assert!(!triangles.is_empty());
}

#[test]
fn interleaved_operations_keep_tracking_exact() {
    let mut manager = manager();
    let dataset = TowerDataset::load(sample_path()).unwrap();
    manager
        .refresh_components(180.0, &dataset.levels[..4], &dataset.devices[..4])
        .unwrap();
    assert_in_sync(&manager);

    let ids = manager.devices().to_vec();
    manager.remove_device(ids[1]).unwrap();
    manager.remove_device(ids[6]).unwrap();
    assert!(manager.remove_device(ids[1]).is_err());
    assert_in_sync(&manager);

    let placement = manager.placement().clone();
    let extra = towerview_core::components::device_renderable(&placement, 180.0, &dataset.devices[5]).unwrap();
    manager.add_device(extra);
    assert_in_sync(&manager);

    manager.refresh_components(120.0, &[], &[]).unwrap();
    assert!(manager.devices().is_empty());
    assert_eq!(manager.backend().objects().len(), 1);
    assert_in_sync(&manager);
}

#[test]
fn second_tower_replaces_first() {
    let mut manager = manager();
    manager.refresh_components(180.0, &[], &[]).unwrap();
    let first = manager.tower().unwrap();
    manager.refresh_components(60.0, &[], &[]).unwrap();
    let second = manager.tower().unwrap();

    assert!(!manager.backend().is_attached(first));
    assert!(manager.backend().is_attached(second));
    let towers = manager
        .backend()
        .objects()
        .iter()
        .filter(|r| r.kind == RenderableKind::Tower)
        .count();
    assert_eq!(towers, 1);
    assert_relative_eq!(manager.backend().camera().distance(), 90.0, epsilon = 1e-2);
}

#[test]
fn shipped_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../towerview.toml");
    let config = ViewerConfig::load(path).unwrap();
    assert!(config.render.auto_rotate);
    assert_eq!(config.placement, ViewerConfig::default().placement);
    assert_eq!(config.camera, ViewerConfig::default().camera);
}
