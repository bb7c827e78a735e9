use std::{
    path::Path,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use image::{GenericImageView, ImageFormat, ImageReader};
use tempfile::tempdir;
use wmremover::app::saver::{SaveRequest, SaveStatus, Saver};
use wmremover::fs_utils::temp_path_for;

mod common;
use common::solid_image;

fn wait_for_save(saver: &mut Saver, expected_path: &Path) -> SaveStatus {
    let start = Instant::now();
    loop {
        for status in saver.check_completions() {
            if status.path == expected_path {
                return status;
            }
        }
        if start.elapsed() > Duration::from_secs(5) {
            panic!("timed out waiting for save");
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn saver_writes_decodable_png() {
    let tmp = tempdir().unwrap();
    // Use a single saver thread for test determinism
    let mut saver = Saver::new(1);
    let image = Arc::new(solid_image(5, 4, [20, 30, 40, 255]).to_rgba8());
    let target_path = tmp.path().join("output.png");

    saver
        .queue_save(SaveRequest {
            image: Arc::clone(&image),
            path: target_path.clone(),
        })
        .unwrap();
    assert_eq!(saver.pending_saves, vec![target_path.clone()]);

    let status = wait_for_save(&mut saver, &target_path);
    status.result.unwrap();
    assert!(status.size.unwrap() > 0);
    assert!(saver.pending_saves.is_empty());
    assert!(!temp_path_for(&target_path).unwrap().exists());

    let reader = ImageReader::open(&target_path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    assert_eq!(reader.format(), Some(ImageFormat::Png));
    let decoded = reader.decode().unwrap();
    assert_eq!(decoded.dimensions(), (5, 4));
    assert_eq!(decoded.to_rgba8(), *image);
}

#[test]
fn saver_reports_failures() {
    let tmp = tempdir().unwrap();
    let mut saver = Saver::new(1);
    let image = Arc::new(solid_image(2, 2, [0, 0, 0, 255]).to_rgba8());
    let target_path = tmp.path().join("missing-dir").join("output.png");

    saver
        .queue_save(SaveRequest {
            image,
            path: target_path.clone(),
        })
        .unwrap();

    let status = wait_for_save(&mut saver, &target_path);
    assert!(status.result.is_err());
    assert_eq!(status.size, None);
    assert!(!target_path.exists());
}
