//! Property-style tests for the placement planner

use panelpress::{
    plan_placements, ExportConfig, ImageRegion, LayoutMode, MarginPolicy, PageSize,
};
use sha2::{Digest, Sha256};

fn a4_config(mode: LayoutMode) -> ExportConfig {
    ExportConfig {
        mode,
        page_size: PageSize::A4,
        margins: MarginPolicy::Fixed { x: 10.0, y: 10.0 },
        ..Default::default()
    }
}

fn plan_digest(plan: &[panelpress::PlacementInstruction]) -> String {
    let json = serde_json::to_vec(plan).expect("plan serializes");
    hex::encode(Sha256::digest(&json))
}

#[test]
fn fit_box_is_contained_with_a_binding_axis_across_aspects() {
    let config = a4_config(LayoutMode::FitOnePage);
    // width:height ratios from 0.1 to 10
    for i in 1..=100 {
        let ratio = i as f64 / 10.0;
        let height = 1200u32;
        let width = ((height as f64) * ratio).round().max(1.0) as u32;

        let plan = plan_placements(width, height, &config).expect("valid plan");
        assert_eq!(plan.len(), 1);
        let p = &plan[0];

        assert!(p.dest_width <= 190.0 + 1e-9, "overflow at ratio {}", ratio);
        assert!(p.dest_height <= 277.0 + 1e-9, "overflow at ratio {}", ratio);
        let binds_width = (p.dest_width - 190.0).abs() < 1e-6;
        let binds_height = (p.dest_height - 277.0).abs() < 1e-6;
        assert!(binds_width || binds_height, "no binding axis at ratio {}", ratio);
    }
}

#[test]
fn fit_centering_never_enters_the_margin_band() {
    let config = a4_config(LayoutMode::FitOnePage);
    for &(w, h) in &[(100u32, 1000u32), (1000, 100), (500, 500), (190, 277)] {
        let plan = plan_placements(w, h, &config).unwrap();
        let p = &plan[0];
        // offset = margin + (printable - final) / 2 on the non-binding axis
        let expected_x = 10.0 + (190.0 - p.dest_width) / 2.0;
        let expected_y = 10.0 + (277.0 - p.dest_height) / 2.0;
        assert!((p.dest_x - expected_x).abs() < 1e-9);
        assert!((p.dest_y - expected_y).abs() < 1e-9);
        assert!(p.dest_x >= 10.0 - 1e-9);
        assert!(p.dest_y >= 10.0 - 1e-9);
        assert!(p.dest_x + p.dest_width <= 200.0 + 1e-6);
        assert!(p.dest_y + p.dest_height <= 287.0 + 1e-6);
    }
}

#[test]
fn tall_panel_scenario_fills_height_and_centers_horizontally() {
    // Bitmap 1000x2000 on A4 minus 10mm margins (printable 190x277)
    let config = a4_config(LayoutMode::FitOnePage);
    let plan = plan_placements(1000, 2000, &config).unwrap();
    let p = &plan[0];

    assert!((p.dest_height - 277.0).abs() < 1e-9);
    assert!((p.dest_width - 138.5).abs() < 1e-9);
    // Top-anchored on the binding axis, centered on the other
    assert!((p.dest_y - 10.0).abs() < 1e-9);
    assert!((p.dest_x - 35.75).abs() < 1e-9);
}

#[test]
fn tile_page_count_is_ceil_of_destination_height() {
    let config = a4_config(LayoutMode::TileAcrossPages);
    // scale = 1900px / 190mm = 10 px per mm
    for &(src_height, expected_pages) in &[
        (2770u32, 1usize), // exactly one page
        (5540, 2),         // exactly two pages, no trailing blank
        (5541, 3),         // one extra source row spills onto a third page
        (6371, 3),         // 2.3 pages of content
        (100, 1),
    ] {
        let plan = plan_placements(1900, src_height, &config).unwrap();
        assert_eq!(
            plan.len(),
            expected_pages,
            "source height {} expected {} pages",
            src_height,
            expected_pages
        );
    }
}

#[test]
fn tile_slices_partition_source_and_sum_destination_exactly() {
    let config = a4_config(LayoutMode::TileAcrossPages);
    let plan = plan_placements(1900, 6371, &config).unwrap();

    let mut cursor = 0u32;
    for p in &plan {
        match p.region {
            ImageRegion::Crop { x, y, width, height } => {
                assert_eq!(x, 0);
                assert_eq!(width, 1900);
                assert_eq!(y, cursor, "slices must be contiguous");
                cursor += height;
            }
            ImageRegion::Whole => panic!("tiled plans always crop"),
        }
    }
    assert_eq!(cursor, 6371, "slices must cover the whole bitmap");

    let dest_total: f64 = plan.iter().map(|p| p.dest_height).sum();
    assert!((dest_total - 637.1).abs() < 1e-6);

    // 2.3 pages: third strictly shorter than the first two, no fourth
    assert_eq!(plan.len(), 3);
    assert!(plan[2].dest_height < plan[1].dest_height);
}

#[test]
fn tile_page_breaks_follow_page_order() {
    let config = a4_config(LayoutMode::TileAcrossPages);
    let plan = plan_placements(1900, 9000, &config).unwrap();
    assert!(!plan[0].page_break);
    for p in &plan[1..] {
        assert!(p.page_break);
    }
}

#[test]
fn planning_is_idempotent() {
    for mode in [LayoutMode::FitOnePage, LayoutMode::TileAcrossPages] {
        let config = a4_config(mode);
        let first = plan_placements(1234, 5678, &config).unwrap();
        let second = plan_placements(1234, 5678, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(plan_digest(&first), plan_digest(&second));
    }
}

#[test]
fn collapsing_margin_ratio_fails_before_planning() {
    let config = ExportConfig {
        margins: MarginPolicy::Ratio(0.6),
        ..Default::default()
    };
    let result = plan_placements(1000, 1000, &config);
    assert!(matches!(
        result,
        Err(panelpress::Error::InvalidGeometry(_))
    ));
}
