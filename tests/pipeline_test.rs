use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use indicatif::ProgressBar;
use tempfile::TempDir;

use showcase_bgremove::mocks::{MockExtractor, RecordingReporter, ReportEvent, UniformMask};
use showcase_bgremove::{BackgroundRemover, BgRemoveError, Config, ConsoleReporter, Cutout};

fn config_for(dir: &Path) -> Config {
    Config {
        target_dir: dir.to_path_buf(),
        ..Config::default()
    }
}

fn png_bytes(color: [u8; 3]) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb(color)));
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("public/products");

    let extractor = MockExtractor::new();
    let remover = BackgroundRemover::new(&extractor, &config_for(&missing));
    let mut reporter = RecordingReporter::default();

    let err = remover.process_directory(&mut reporter).unwrap_err();

    assert!(matches!(err, BgRemoveError::TargetDirectoryNotFound { .. }));
    assert_eq!(extractor.call_count(), 0);
    assert!(reporter.events.is_empty());
    assert!(!missing.exists());
}

#[test]
fn test_only_png_files_are_processed() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.png"), b"aaa").unwrap();
    fs::write(dir.join("b.png"), b"bbb").unwrap();
    fs::write(dir.join("notes.txt"), b"keep me").unwrap();

    let extractor = MockExtractor::new();
    let remover = BackgroundRemover::new(&extractor, &config_for(dir));
    let mut reporter = ConsoleReporter::new(Vec::new(), ProgressBar::hidden());

    let summary = remover.process_directory(&mut reporter).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert_eq!(summary.total, 2);
    assert!(summary.failed.is_empty());
    assert_eq!(extractor.call_count(), 2);
    assert!(output.starts_with(&format!("Processing 2 images in {}...\n", dir.display())));
    assert!(output.contains("Finished a.png\n"));
    assert!(output.contains("Finished b.png\n"));
    assert!(output.ends_with("All done.\n"));

    assert_eq!(fs::read(dir.join("a.png")).unwrap(), b"cutout:aaa");
    assert_eq!(fs::read(dir.join("b.png")).unwrap(), b"cutout:bbb");
    assert_eq!(fs::read(dir.join("notes.txt")).unwrap(), b"keep me");
}

#[test]
fn test_subdirectories_are_not_descended() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("archive")).unwrap();
    fs::write(dir.join("archive/old.png"), b"old").unwrap();
    fs::write(dir.join("UPPER.PNG"), b"upper").unwrap();

    let extractor = MockExtractor::new();
    let remover = BackgroundRemover::new(&extractor, &config_for(dir));
    let summary = remover
        .process_directory(&mut RecordingReporter::default())
        .unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(extractor.call_count(), 0);
    assert_eq!(fs::read(dir.join("archive/old.png")).unwrap(), b"old");
    assert_eq!(fs::read(dir.join("UPPER.PNG")).unwrap(), b"upper");
}

#[test]
fn test_failure_does_not_short_circuit() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.png"), b"bad input").unwrap();
    fs::write(dir.join("b.png"), b"good input").unwrap();
    fs::write(dir.join("c.png"), b"bad again").unwrap();

    let extractor = MockExtractor::failing_on(b"bad");
    let remover = BackgroundRemover::new(&extractor, &config_for(dir));
    let mut reporter = RecordingReporter::default();

    let summary = remover.process_directory(&mut reporter).unwrap();

    assert_eq!(extractor.call_count(), 3);
    assert_eq!(summary.succeeded, vec!["b.png"]);
    let mut failed: Vec<_> = summary.failed.iter().map(|f| f.name.as_str()).collect();
    failed.sort();
    assert_eq!(failed, vec!["a.png", "c.png"]);

    // A failed transform leaves the original untouched.
    assert_eq!(fs::read(dir.join("a.png")).unwrap(), b"bad input");
    assert_eq!(fs::read(dir.join("c.png")).unwrap(), b"bad again");
    assert_eq!(fs::read(dir.join("b.png")).unwrap(), b"cutout:good input");

    let failures = reporter
        .events
        .iter()
        .filter(|e| matches!(e, ReportEvent::FileFailed { .. }))
        .count();
    assert_eq!(failures, 2);
    assert_eq!(reporter.events.last(), Some(&ReportEvent::RunFinished));
}

#[test]
fn test_each_file_read_once_in_event_order() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.png"), b"a").unwrap();
    fs::write(dir.join("b.png"), b"b").unwrap();

    let extractor = MockExtractor::new();
    let remover = BackgroundRemover::new(&extractor, &config_for(dir));
    let mut reporter = RecordingReporter::default();
    remover.process_directory(&mut reporter).unwrap();

    let mut seen = extractor.calls();
    seen.sort();
    assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec()]);

    // start, then started/finished pairs, then finish
    assert_eq!(reporter.events.len(), 6);
    for pair in reporter.events[1..5].chunks(2) {
        match pair {
            [ReportEvent::FileStarted(started), ReportEvent::FileFinished(finished)] => {
                assert_eq!(started, finished)
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}

#[test]
fn test_rerun_transforms_again() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.png"), b"raw").unwrap();

    let extractor = MockExtractor::new();
    let remover = BackgroundRemover::new(&extractor, &config_for(dir));
    remover
        .process_directory(&mut RecordingReporter::default())
        .unwrap();
    remover
        .process_directory(&mut RecordingReporter::default())
        .unwrap();

    assert_eq!(extractor.call_count(), 2);
    assert_eq!(extractor.calls()[1], b"cutout:raw");
    assert_eq!(fs::read(dir.join("a.png")).unwrap(), b"cutout:cutout:raw");
}

#[test]
fn test_corrupt_image_is_reported_and_run_completes() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.png"), b"this is not an image").unwrap();

    let remover = BackgroundRemover::new(Cutout::new(UniformMask::new(255)), &config_for(dir));
    let mut reporter = ConsoleReporter::new(Vec::new(), ProgressBar::hidden());

    let summary = remover.process_directory(&mut reporter).unwrap();
    let output = String::from_utf8(reporter.into_inner()).unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert!(output.contains("Failed to process a.png: failed to decode image: "));
    assert!(output.ends_with("All done.\n"));
    assert_eq!(
        fs::read(dir.join("a.png")).unwrap(),
        b"this is not an image"
    );
}

#[test]
fn test_real_cutout_replaces_file_with_transparent_png() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("product.png"), png_bytes([90, 60, 30])).unwrap();

    let remover = BackgroundRemover::new(Cutout::new(UniformMask::new(0)), &config_for(dir));
    let summary = remover
        .process_directory(&mut RecordingReporter::default())
        .unwrap();
    assert_eq!(summary.succeeded, vec!["product.png"]);

    let written = fs::read(dir.join("product.png")).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);

    let decoded = image::load_from_memory(&written).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (6, 4));
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}
