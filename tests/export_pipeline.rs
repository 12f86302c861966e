//! End-to-end export tests using in-memory snapshot providers

use image::{Rgba, RgbaImage};
use panelpress::{
    export_panel, Bitmap, CaptureOptions, Error, ExportConfig, Exporter, LayoutMode,
    SnapshotProvider, StaticProvider,
};
use sha2::{Digest, Sha256};
use std::time::Duration;

fn panel(width: u32, height: u32) -> StaticProvider {
    StaticProvider::new(Bitmap::from_rgba(RgbaImage::from_pixel(
        width,
        height,
        Rgba([200, 64, 32, 255]),
    )))
}

#[test]
fn fit_export_produces_single_page_pdf() {
    let mut provider = panel(1000, 2000);
    let doc = export_panel(&mut provider, &ExportConfig::default()).unwrap();
    assert!(doc.bytes.starts_with(b"%PDF"));
    assert_eq!(doc.page_count(), 1);
    assert!(!doc.placements[0].page_break);
}

#[test]
fn tile_export_produces_one_page_per_slice() {
    let mut provider = panel(1900, 6371);
    let config = ExportConfig {
        mode: LayoutMode::TileAcrossPages,
        ..Default::default()
    };
    let doc = export_panel(&mut provider, &config).unwrap();
    assert_eq!(doc.page_count(), 3);
    assert!(doc.bytes.starts_with(b"%PDF"));
}

#[test]
fn repeated_export_of_unchanged_panel_yields_identical_plans() {
    let config = ExportConfig {
        mode: LayoutMode::TileAcrossPages,
        ..Default::default()
    };
    let mut provider = panel(1400, 8000);
    let first = export_panel(&mut provider, &config).unwrap();
    let second = export_panel(&mut provider, &config).unwrap();

    // Encoder output may differ run to run; the placement plans must not.
    let digest = |plan: &[panelpress::PlacementInstruction]| {
        hex::encode(Sha256::digest(serde_json::to_vec(plan).unwrap()))
    };
    assert_eq!(first.placements, second.placements);
    assert_eq!(digest(&first.placements), digest(&second.placements));
}

#[test]
fn capture_failure_aborts_without_output() {
    struct FailingProvider;
    impl SnapshotProvider for FailingProvider {
        fn capture(&mut self, _region: &str, _opts: &CaptureOptions) -> panelpress::Result<Bitmap> {
            Err(Error::CaptureFailure(
                "embedded image blocked rasterization".to_string(),
            ))
        }
    }

    let result = export_panel(&mut FailingProvider, &ExportConfig::default());
    assert!(matches!(result, Err(Error::CaptureFailure(_))));
}

#[test]
fn invalid_geometry_fails_before_any_capture() {
    struct CountingProvider {
        calls: usize,
    }
    impl SnapshotProvider for CountingProvider {
        fn capture(&mut self, _region: &str, _opts: &CaptureOptions) -> panelpress::Result<Bitmap> {
            self.calls += 1;
            Ok(Bitmap::from_rgba(RgbaImage::from_pixel(
                10,
                10,
                Rgba([0, 0, 0, 255]),
            )))
        }
    }

    let mut provider = CountingProvider { calls: 0 };
    let config = ExportConfig {
        margins: panelpress::MarginPolicy::Ratio(0.6),
        ..Default::default()
    };
    let result = export_panel(&mut provider, &config);
    assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    assert_eq!(provider.calls, 0, "capture must not run on bad geometry");
}

#[tokio::test]
async fn concurrent_export_is_rejected_while_one_is_in_flight() {
    struct SlowProvider;
    impl SnapshotProvider for SlowProvider {
        fn capture(&mut self, _region: &str, _opts: &CaptureOptions) -> panelpress::Result<Bitmap> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Bitmap::from_rgba(RgbaImage::from_pixel(
                400,
                300,
                Rgba([1, 1, 1, 255]),
            )))
        }
    }

    let exporter = Exporter::new(SlowProvider);
    let racing = exporter.clone();

    let first = tokio::spawn(async move { racing.export(ExportConfig::default()).await });

    // Let the first export reach the worker before racing it
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = exporter.export(ExportConfig::default()).await;
    assert!(matches!(second, Err(Error::ExportInProgress)));

    let first = first.await.unwrap().unwrap();
    assert!(first.bytes.starts_with(b"%PDF"));

    // Once idle again, a manual retry succeeds
    let retry = exporter.export(ExportConfig::default()).await.unwrap();
    assert!(retry.bytes.starts_with(b"%PDF"));
    exporter.close().await.unwrap();
}

#[tokio::test]
async fn stalled_capture_times_out_when_configured() {
    struct StalledProvider;
    impl SnapshotProvider for StalledProvider {
        fn capture(&mut self, _region: &str, _opts: &CaptureOptions) -> panelpress::Result<Bitmap> {
            std::thread::sleep(Duration::from_secs(10));
            Err(Error::CaptureFailure("unreachable".to_string()))
        }
    }

    let exporter = Exporter::new(StalledProvider);
    let config = ExportConfig {
        timeout_ms: Some(100),
        ..Default::default()
    };
    let result = exporter.export(config).await;
    assert!(matches!(result, Err(Error::Timeout(100))));
}

#[test]
fn png_file_provider_round_trips_through_a_temp_file() {
    use panelpress::PngFileProvider;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.png");

    let image = RgbaImage::from_pixel(320, 640, Rgba([10, 120, 220, 255]));
    image.save(&path).unwrap();

    let mut provider = PngFileProvider::new();
    let config = ExportConfig {
        region: path.to_string_lossy().to_string(),
        mode: LayoutMode::TileAcrossPages,
        ..Default::default()
    };
    let doc = export_panel(&mut provider, &config).unwrap();
    assert!(doc.bytes.starts_with(b"%PDF"));
    assert!(doc.page_count() >= 1);
}
