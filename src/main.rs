use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui::{self, Rect};

use wmremover::app::WatermarkRemoverApp;
use wmremover::config::{parse_rect, EditorConfig, MAX_DISPLAY_HEIGHT};
use wmremover::fs_utils::default_export_path;
use wmremover::image_utils::DOWNSCALE_CAP;
use wmremover::inpaint::InpaintParams;
use wmremover::{headless, logging};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Watermark remover with content-aware fill"
)]
struct Args {
    /// Image to open
    #[arg(value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Region to remove as X,Y,W,H in image pixels. Runs without a window; repeatable
    #[arg(long = "rect", value_name = "X,Y,W,H", value_parser = parse_rect_arg)]
    rects: Vec<Rect>,

    /// Output file for headless mode (defaults to ./watermark-removed.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory the save dialog starts in
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Seed for the fill jitter, for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum display height at 100% zoom
    #[arg(long, default_value_t = MAX_DISPLAY_HEIGHT)]
    max_height: f32,

    /// Maximum jitter of mirrored source pixels
    #[arg(long, default_value_t = 2)]
    jitter: i32,

    /// Sigma of the seam blur (0 disables blending)
    #[arg(long, default_value_t = 4.0)]
    blur: f32,

    /// Downscale images larger than 3840x2160 on load (off: keep full resolution)
    #[arg(long, default_value_t = false)]
    downscale: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_rect_arg(value: &str) -> Result<Rect, String> {
    parse_rect(value).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let config = EditorConfig {
        max_display_height: args.max_height.max(1.0),
        inpaint: InpaintParams {
            jitter: args.jitter.max(0),
            blur_sigma: args.blur.max(0.0),
            ..InpaintParams::default()
        },
        max_buffer_size: args.downscale.then_some(DOWNSCALE_CAP),
        seed: args.seed,
        ..EditorConfig::default()
    };

    if !args.rects.is_empty() {
        let input = args
            .image
            .as_deref()
            .ok_or_else(|| anyhow!("--rect needs an input image"))?;
        let output = match args.output {
            Some(path) => path,
            None => default_export_path(&std::env::current_dir()?),
        };
        let report = headless::run(input, &args.rects, &output, config)?;
        println!("{}", report.output.display());
        return Ok(());
    }

    log::info!("starting editor");
    let initial = args.image;
    let export_dir = args.export_dir;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 820.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Watermark Remover",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(WatermarkRemoverApp::new(
                cc,
                config,
                initial,
                export_dir,
            )))
        }),
    )
    .map_err(|err| anyhow!("{err}"))?;

    Ok(())
}
