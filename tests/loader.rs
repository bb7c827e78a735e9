use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use image::ImageFormat;
use tempfile::tempdir;
use wmremover::app::loader::{LoadSource, LoadedImage, Loader};
use wmremover::error::EditorError;

mod common;
use common::{encode, solid_image, write_image};

fn wait_for_load(loader: &mut Loader) -> LoadedImage {
    let start = Instant::now();
    loop {
        if let Some(loaded) = loader.poll() {
            return loaded;
        }
        if start.elapsed() > Duration::from_secs(5) {
            panic!("timed out waiting for load");
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn loader_decodes_files_from_disk() {
    let tmp = tempdir().unwrap();
    let img_path = tmp.path().join("sample.png");
    write_image(&img_path, &solid_image(4, 3, [10, 20, 30, 255]));

    let mut loader = Loader::new();
    let generation = loader.load(LoadSource::Path(img_path.clone()));
    assert!(loader.loading_active);

    let loaded = wait_for_load(&mut loader);
    assert_eq!(loaded.generation, generation);
    assert_eq!(loaded.label, img_path.display().to_string());
    let image = loaded.result.unwrap();
    assert_eq!(image.dimensions(), (4, 3));
    assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert!(!loader.loading_active);
}

#[test]
fn newer_request_supersedes_older_ones() {
    let first = encode(&solid_image(2, 2, [1, 1, 1, 255]), ImageFormat::Png);
    let second = encode(&solid_image(6, 5, [2, 2, 2, 255]), ImageFormat::Png);

    let mut loader = Loader::new();
    loader.load(LoadSource::Bytes {
        name: "first.png".into(),
        bytes: Arc::from(first),
    });
    let latest = loader.load(LoadSource::Bytes {
        name: "second.png".into(),
        bytes: Arc::from(second),
    });
    assert_eq!(loader.generation(), latest);

    let loaded = wait_for_load(&mut loader);
    assert_eq!(loaded.generation, latest);
    assert_eq!(loaded.label, "second.png");
    assert_eq!(loaded.result.unwrap().dimensions(), (6, 5));
}

#[test]
fn capped_loader_downscales_large_images() {
    let bytes = encode(&solid_image(400, 100, [9, 9, 9, 255]), ImageFormat::Png);
    let mut loader = Loader::with_max_size(Some((200, 200)));
    loader.load(LoadSource::Bytes {
        name: "wide.png".into(),
        bytes: Arc::from(bytes),
    });
    assert_eq!(wait_for_load(&mut loader).result.unwrap().dimensions(), (200, 50));
}

#[test]
fn undecodable_bytes_report_an_error() {
    let mut loader = Loader::new();
    loader.load(LoadSource::Bytes {
        name: "garbage.png".into(),
        bytes: Arc::from(&b"definitely not an image"[..]),
    });
    let loaded = wait_for_load(&mut loader);
    assert!(matches!(loaded.result, Err(EditorError::Decode(_))));
}

#[test]
fn missing_file_reports_io_error() {
    let tmp = tempdir().unwrap();
    let mut loader = Loader::new();
    loader.load(LoadSource::Path(tmp.path().join("missing.png")));
    let loaded = wait_for_load(&mut loader);
    assert!(matches!(loaded.result, Err(EditorError::Io { .. })));
}
