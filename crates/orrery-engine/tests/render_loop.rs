mod common;

use std::sync::Arc;

use common::{write_default_assets, write_program, Call, Kind, Lifecycle, RecordingDevice};
use orrery_engine::device::ViewRect;
use orrery_engine::math::{translate, view_projection, Location, Mat4, Vec3};
use orrery_engine::render::{RenderActor, RenderSettings, SceneObject};
use orrery_engine::scene::{SharedScene, WindowSize, DEFAULT_FIELD_OF_VIEW};
use orrery_engine::Error;

fn scene() -> Arc<SharedScene> {
    Arc::new(SharedScene::new(
        Location::looking_at_origin(Vec3::new(0.0, 10.0, 8.0)),
        DEFAULT_FIELD_OF_VIEW,
    ))
}

fn settings(root: &std::path::Path) -> RenderSettings {
    RenderSettings {
        assets_dir: root.to_path_buf(),
        sphere_depth: 1,
        ..RenderSettings::default()
    }
}

fn frames(calls: &[Call]) -> Vec<&[Call]> {
    calls
        .split_inclusive(|c| *c == Call::Finish)
        .filter(|frame| frame.contains(&Call::Present))
        .collect()
}

#[test]
fn renders_until_stop_and_releases_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    let device = RecordingDevice::stopping_after(scene.clone(), 3);

    RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .expect("render");

    assert_eq!(device.presents(), 3);
    assert_eq!(frames(&device.calls()).len(), 3);
    // Two programs, skybox + two object cube maps, skybox and sphere meshes.
    assert_eq!(device.created(Kind::Program), 2);
    assert_eq!(device.created(Kind::Texture), 3);
    assert_eq!(device.created(Kind::VertexArray), 2);
    device.assert_balanced();
}

#[test]
fn scene_objects_are_released_in_reverse_load_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    let device = RecordingDevice::stopping_after(scene.clone(), 1);

    RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .expect("render");

    // Shaders only live until their program is linked.
    let mut created = Vec::new();
    let mut deleted = Vec::new();
    for event in device.lifecycle() {
        match event {
            Lifecycle::Created(kind, id) if kind != Kind::Shader => created.push(id),
            Lifecycle::Deleted(kind, id) if kind != Kind::Shader => deleted.push(id),
            _ => {}
        }
    }

    assert_eq!(created.len(), 2 + 3 + 2 * 2);
    created.reverse();
    assert_eq!(deleted, created);
    device.assert_balanced();
}

#[test]
fn frame_draws_skybox_then_objects() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    let device = RecordingDevice::stopping_after(scene.clone(), 1);

    RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .expect("render");

    let calls = device.calls();
    let frame: Vec<&Call> = calls
        .iter()
        .skip_while(|c| !matches!(c, Call::Clear(_)))
        .collect();

    assert_eq!(*frame[0], Call::Clear([0.0; 4]));
    assert_eq!(*frame[1], Call::DepthWrite(false));
    assert!(matches!(frame[2], Call::UseProgram(_)));
    assert!(matches!(frame[3], Call::BindCubeMap(_)));
    assert!(matches!(frame[4], Call::SetMat4(0, _)));
    assert!(matches!(frame[5], Call::Draw { count: 36, .. }));
    assert_eq!(*frame[6], Call::DepthWrite(true));
    assert!(matches!(frame[7], Call::UseProgram(_)));
    assert_ne!(frame[2], frame[7]);

    let sphere_draws = frame
        .iter()
        .filter(|c| matches!(c, Call::Draw { count, .. } if *count == 36 * 4))
        .count();
    assert_eq!(sphere_draws, 2);
    assert_eq!(*frame[frame.len() - 2], Call::Present);
    assert_eq!(*frame[frame.len() - 1], Call::Finish);
}

#[test]
fn skybox_follows_the_camera() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    let camera = Location::looking_at_origin(Vec3::new(2.0, -3.0, 5.0));
    scene.set_camera(camera);
    scene.set_window_size(WindowSize::new(800, 600));
    let device = RecordingDevice::stopping_after(scene.clone(), 1);

    RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .expect("render");

    let vp = view_projection(&camera, DEFAULT_FIELD_OF_VIEW, 800.0 / 600.0);
    let uploads: Vec<Mat4> = device
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SetMat4(_, m) => Some(m),
            _ => None,
        })
        .collect();

    assert_eq!(uploads.len(), 3);
    assert!(uploads[0].abs_diff_eq(vp * translate(camera.position), 1e-5));
    assert!(uploads[1].abs_diff_eq(vp, 1e-5));
}

#[test]
fn resize_is_applied_once_per_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    scene.set_window_size(WindowSize::new(640, 480));
    scene.mark_resize();
    let device = RecordingDevice::stopping_after(scene.clone(), 3);

    RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .expect("render");

    let calls = device.calls();
    let frames = frames(&calls);
    let rect = ViewRect::full(640, 480);
    assert_eq!(frames[0][0], Call::Resize(640, 480));
    assert!(frames[0].contains(&Call::Viewport(rect)));
    assert!(frames[0].contains(&Call::Scissor(rect)));
    for frame in &frames[1..] {
        assert!(!frame.iter().any(|c| matches!(c, Call::Resize(..) | Call::Viewport(_))));
    }
    assert!(!scene.resize_pending());
}

#[test]
fn objects_sharing_a_cube_map_share_the_texture() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    let device = RecordingDevice::stopping_after(scene.clone(), 1);
    let settings = RenderSettings {
        objects: vec![
            SceneObject::new(Vec3::ZERO, 1.0, "moon"),
            SceneObject::new(Vec3::X * 4.0, 0.5, "moon"),
            SceneObject::new(Vec3::Y * 4.0, 0.5, "moon"),
        ],
        ..settings(dir.path())
    };

    RenderActor::new(scene.clone(), settings)
        .run(&device)
        .expect("render");

    assert_eq!(device.created(Kind::Texture), 2);
    device.assert_balanced();
}

#[test]
fn setup_failure_is_returned_without_leaks() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_program(dir.path(), "skybox");
    write_program(dir.path(), "planet");
    let scene = scene();
    let device = RecordingDevice::new();

    let err = RenderActor::new(scene.clone(), settings(dir.path()))
        .run(&device)
        .unwrap_err();

    assert!(matches!(err, Error::ResourceAcquisition { .. }), "{err}");
    assert_eq!(device.presents(), 0);
    assert_eq!(device.created(Kind::Program), 2);
    device.assert_balanced();
}

#[test]
fn missing_uniform_fails_setup() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let device = RecordingDevice::new();
    *device.uniforms.borrow_mut() = vec!["model".to_string()];

    let err = RenderActor::new(scene(), settings(dir.path()))
        .run(&device)
        .unwrap_err();

    assert!(matches!(err, Error::MissingUniform { ref name } if name == "mvp"));
    device.assert_balanced();
}

#[test]
fn present_failure_stops_the_loop() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let device = RecordingDevice::new();
    device.fail_present.set(true);

    let err = RenderActor::new(scene(), settings(dir.path()))
        .run(&device)
        .unwrap_err();

    assert!(matches!(err, Error::Windowing(_)));
    assert!(!device.calls().contains(&Call::Finish));
    device.assert_balanced();
}

#[test]
fn stop_before_start_draws_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_default_assets(dir.path());
    let scene = scene();
    scene.request_stop();
    let device = RecordingDevice::new();

    RenderActor::new(scene, settings(dir.path()))
        .run(&device)
        .expect("render");

    assert_eq!(device.presents(), 0);
    assert!(device.calls().is_empty());
    device.assert_balanced();
}
