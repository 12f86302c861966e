//! panelpress CLI: capture a panel and export it as a paginated PDF.

use clap::Parser;
use panelpress::{
    export_panel, ExportConfig, LayoutMode, MarginPolicy, PageSize, PngFileProvider,
};

#[derive(Parser, Debug)]
#[command(
    name = "panelpress",
    about = "Capture a rendered panel and export it as a paginated PDF"
)]
struct Args {
    /// PNG/JPEG file path or data URI to use as the captured panel
    #[arg(long, conflicts_with = "url")]
    input: Option<String>,

    /// URL of the page hosting the panel (requires the `cdp` feature)
    #[arg(long, requires = "region")]
    url: Option<String>,

    /// CSS selector of the panel region on the page
    #[arg(long)]
    region: Option<String>,

    /// Output PDF path
    #[arg(long, short, default_value = "panel.pdf")]
    out: String,

    /// Layout mode: fit (one page) or tile (across pages)
    #[arg(long, default_value = "fit")]
    mode: String,

    /// Page size: a4, letter, or WxH in millimetres
    #[arg(long, default_value = "a4")]
    page: String,

    /// Fixed margin in millimetres (both axes)
    #[arg(long, conflicts_with = "margin_ratio")]
    margin: Option<f64>,

    /// Margin as a ratio of each page dimension (e.g. 0.1)
    #[arg(long)]
    margin_ratio: Option<f64>,

    /// Capture resolution multiplier (>= 1.0)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Overall export timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Load the full export configuration from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["mode", "page", "margin", "margin_ratio", "scale"])]
    config: Option<String>,
}

fn build_config(args: &Args) -> panelpress::Result<ExportConfig> {
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            panelpress::Error::ConfigError(format!("Failed to read {}: {}", path, e))
        })?;
        let mut config: ExportConfig = serde_json::from_str(&raw).map_err(|e| {
            panelpress::Error::ConfigError(format!("Failed to parse {}: {}", path, e))
        })?;
        if let Some(region) = args.region.clone().or_else(|| args.input.clone()) {
            config.region = region;
        }
        return Ok(config);
    }

    let mode = match args.mode.as_str() {
        "fit" => LayoutMode::FitOnePage,
        "tile" => LayoutMode::TileAcrossPages,
        other => {
            return Err(panelpress::Error::ConfigError(format!(
                "Unrecognized mode: {} (expected fit or tile)",
                other
            )))
        }
    };

    let margins = match (args.margin, args.margin_ratio) {
        (Some(mm), _) => MarginPolicy::Fixed { x: mm, y: mm },
        (None, Some(r)) => MarginPolicy::Ratio(r),
        (None, None) => MarginPolicy::default(),
    };

    let region = args
        .region
        .clone()
        .or_else(|| args.input.clone())
        .unwrap_or_default();

    Ok(ExportConfig {
        region,
        resolution_multiplier: args.scale,
        page_size: PageSize::parse(&args.page)?,
        margins,
        mode,
        timeout_ms: args.timeout_ms,
        ..Default::default()
    })
}

#[cfg(feature = "cdp")]
fn export_live(url: &str, config: &ExportConfig) -> panelpress::Result<panelpress::ExportedDocument> {
    let mut provider = panelpress::ChromeSnapshotProvider::open(
        url,
        panelpress::capture::chrome::ChromeConfig::default(),
    )?;
    export_panel(&mut provider, config)
}

#[cfg(not(feature = "cdp"))]
fn export_live(_url: &str, _config: &ExportConfig) -> panelpress::Result<panelpress::ExportedDocument> {
    Err(panelpress::Error::ConfigError(
        "Live capture requires building with the `cdp` feature".to_string(),
    ))
}

fn run(args: &Args) -> panelpress::Result<()> {
    let config = build_config(args)?;

    let doc = if let Some(url) = &args.url {
        export_live(url, &config)?
    } else if args.input.is_some() {
        let mut provider = PngFileProvider::new();
        export_panel(&mut provider, &config)?
    } else {
        return Err(panelpress::Error::ConfigError(
            "Provide --input or --url".to_string(),
        ));
    };

    std::fs::write(&args.out, &doc.bytes)
        .map_err(|e| panelpress::Error::WriteFailure(format!("Failed to write {}: {}", args.out, e)))?;

    log::info!(
        "Wrote {} ({} page(s), {} bytes)",
        args.out,
        doc.page_count(),
        doc.bytes.len()
    );
    println!("Exported {} page(s) to {}", doc.page_count(), args.out);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        // Diagnostics go to the log; the user gets one generic message and
        // can simply re-trigger the export.
        log::error!("Export failed: {}", e);
        eprintln!("Export failed. Check the log for details and try again.");
        std::process::exit(1);
    }
}
