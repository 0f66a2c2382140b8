mod common;

use std::io::ErrorKind;

use common::{write_cube_map, write_program, Kind, RecordingDevice};
use orrery_engine::assets::{load_cube_map, load_program, AssetRoot};
use orrery_engine::Error;

#[test]
fn loads_program_and_releases_shaders() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_program(dir.path(), "skybox");
    let device = RecordingDevice::new();

    let program = AssetRoot::new(dir.path())
        .program(&device, "skybox")
        .expect("load program");

    assert!(!program.is_empty());
    assert_eq!(device.created(Kind::Shader), 2);
    assert_eq!(device.live_of(Kind::Shader), 0);

    drop(program);
    device.assert_balanced();
}

#[test]
fn missing_source_is_a_resource_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let device = RecordingDevice::new();

    let err = load_program(&device, &dir.path().join("programs/absent")).unwrap_err();
    match &err {
        Error::ResourceAcquisition { path, source } => {
            assert!(path.ends_with("main.vert.wgsl"), "{}", path.display());
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.os_code().is_some());
    assert_eq!(device.created(Kind::Shader), 0);
}

#[test]
fn compile_failure_releases_the_other_shader() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_program(dir.path(), "broken");
    let device = RecordingDevice::new();
    *device.compile_error_marker.borrow_mut() = Some("fragment".to_string());

    let err = AssetRoot::new(dir.path())
        .program(&device, "broken")
        .unwrap_err();

    assert!(matches!(err, Error::Compile { .. }), "{err}");
    assert_eq!(device.created(Kind::Shader), 1);
    device.assert_balanced();
}

#[test]
fn loads_cube_map_faces_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cube_map(dir.path(), "stars", 3);
    let device = RecordingDevice::new();

    let cube = AssetRoot::new(dir.path())
        .cube_map(&device, "stars")
        .expect("load cube map");

    assert!(!cube.is_empty());
    assert_eq!(device.face_sizes(), vec![(3, 3); 6]);

    drop(cube);
    device.assert_balanced();
}

#[test]
fn face_lookup_falls_back_to_other_extensions() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cube_map(dir.path(), "mixed", 2);
    let face_dir = dir.path().join("cubemaps/mixed");
    let img = image::open(face_dir.join("negy.png")).expect("open face");
    img.save(face_dir.join("negy.bmp")).expect("save bmp");
    std::fs::remove_file(face_dir.join("negy.png")).expect("remove png");

    let device = RecordingDevice::new();
    let cube = load_cube_map(&device, &face_dir).expect("load cube map");
    assert!(!cube.is_empty());
}

#[test]
fn missing_face_names_the_png_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cube_map(dir.path(), "partial", 2);
    let face_dir = dir.path().join("cubemaps/partial");
    std::fs::remove_file(face_dir.join("posz.png")).expect("remove face");
    let device = RecordingDevice::new();

    let err = load_cube_map(&device, &face_dir).unwrap_err();
    match err {
        Error::ResourceAcquisition { path, source } => {
            assert!(path.ends_with("posz.png"), "{}", path.display());
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(device.created(Kind::Texture), 0);
}

#[test]
fn corrupt_face_is_a_decode_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cube_map(dir.path(), "corrupt", 2);
    let face_dir = dir.path().join("cubemaps/corrupt");
    std::fs::write(face_dir.join("posx.png"), b"not an image").expect("overwrite face");
    let device = RecordingDevice::new();

    let err = load_cube_map(&device, &face_dir).unwrap_err();
    assert!(
        matches!(&err, Error::ImageDecode { path, .. } if path.ends_with("posx.png")),
        "{err}"
    );
    assert_eq!(err.os_code(), None);
    assert_eq!(device.created(Kind::Texture), 0);
}

#[test]
fn mismatched_faces_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cube_map(dir.path(), "uneven", 4);
    let face_dir = dir.path().join("cubemaps/uneven");
    image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]))
        .save(face_dir.join("negz.png"))
        .expect("write small face");
    let device = RecordingDevice::new();

    let err = load_cube_map(&device, &face_dir).unwrap_err();
    assert!(matches!(err, Error::CubeMapFaces(_)), "{err}");
    assert_eq!(device.created(Kind::Texture), 0);
}
