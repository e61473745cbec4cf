use anyhow::{Context, Result};
use bgstudio::background::{
    parse_hex_color, BackgroundProvider, BlurStrength, HttpFetcher, StyleName, Theme,
};
use bgstudio::capture::{CaptureSource, PhotoFile};
use bgstudio::compositor::Threshold;
use bgstudio::output::{side_by_side, OutputSink, PngFileSink};
use bgstudio::segmentation::{self, SelfieSegmenter, TensorLayout};
use bgstudio::studio::{Studio, StudioRequest};
use clap::Parser;
use image::Rgb;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo of a person (JPEG or PNG)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Take the photo from this webcam instead of a file
    #[arg(long, conflicts_with = "input")]
    camera: Option<u32>,

    /// Path to segmentation model (ONNX file)
    #[arg(short, long, required_unless_present = "list_styles")]
    model: Option<PathBuf>,

    /// Model input width
    #[arg(long, default_value_t = SelfieSegmenter::DEFAULT_WIDTH)]
    model_width: u32,

    /// Model input height
    #[arg(long, default_value_t = SelfieSegmenter::DEFAULT_HEIGHT)]
    model_height: u32,

    /// Tensor layout the model expects
    #[arg(long, value_enum, default_value_t = TensorLayout::Nhwc)]
    layout: TensorLayout,

    /// Background style, by label or key (see --list-styles)
    #[arg(short, long, default_value = "blur-background")]
    style: StyleName,

    /// Fill color for the Solid Color style
    #[arg(long, default_value = "#00FF00", value_parser = parse_color)]
    color: Rgb<u8>,

    /// Blur kernel size for the Blur Background style (odd, 5-95)
    #[arg(long, default_value = "35", value_parser = parse_blur_strength)]
    blur_strength: BlurStrength,

    /// Image to use with the Custom style
    #[arg(long)]
    custom_background: Option<PathBuf>,

    /// Edge sharpness: mask values above this keep the photo
    #[arg(short, long, default_value = "0.2", value_parser = parse_threshold)]
    threshold: Threshold,

    /// Where to write the portrait [default: ./studio_portrait.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the original and the result side by side
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Also write the segmentation matte as a grayscale image
    #[arg(long)]
    save_matte: Option<PathBuf>,

    /// Timeout for downloading stock backgrounds, in seconds
    #[arg(long, default_value_t = 15)]
    fetch_timeout_secs: u64,

    /// Print the background gallery and exit
    #[arg(long)]
    list_styles: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_color(s: &str) -> Result<Rgb<u8>, String> {
    parse_hex_color(s).map_err(|e| e.to_string())
}

fn parse_blur_strength(s: &str) -> Result<BlurStrength, String> {
    let kernel: u32 = s.parse().map_err(|e| format!("{}", e))?;
    BlurStrength::new(kernel).map_err(|e| e.to_string())
}

fn parse_threshold(s: &str) -> Result<Threshold, String> {
    let value: f32 = s.parse().map_err(|e| format!("{}", e))?;
    Threshold::new(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    if args.list_styles {
        print_gallery();
        return Ok(());
    }

    let model_path = args
        .model
        .clone()
        .context("--model is required to process a photo")?;

    // The model is loaded before anything else; without it nothing can run
    let mut model = segmentation::create_default_model(
        &model_path,
        args.model_width,
        args.model_height,
        args.layout,
    )?;
    tracing::info!(
        "Segmentation model loaded successfully (input {:?})",
        model.input_size()
    );

    let Some(mut source) = photo_source(&args)? else {
        tracing::info!("No photo supplied (use --input or --camera), nothing to do");
        return Ok(());
    };

    let upload = custom_upload(&args)?;

    let request = StudioRequest {
        style: args
            .style
            .with_params(args.blur_strength, args.color, upload),
        threshold: args.threshold,
    };

    let fetcher = HttpFetcher::new(Duration::from_secs(args.fetch_timeout_secs))?;
    let backgrounds = BackgroundProvider::new(Box::new(fetcher));

    tracing::info!("Reading photo from {}", source.describe());
    let photo = source
        .capture_photo()
        .context("Failed to get the photo")?;

    let mut studio = Studio::new(model.as_mut(), &backgrounds);
    let result = studio
        .process(photo, &request)
        .context("Failed to process the photo")?;

    let mut sink = match &args.output {
        Some(path) => PngFileSink::new(path),
        None => PngFileSink::in_dir("."),
    };
    sink.write_image(&result.output)?;

    if let Some(path) = &args.preview {
        PngFileSink::new(path).write_image(&side_by_side(&result.original, &result.output))?;
    }

    if let Some(path) = &args.save_matte {
        result
            .mask
            .to_gray_image()
            .save(path)
            .with_context(|| format!("Failed to save matte to {}", path.display()))?;
        tracing::info!("Wrote matte to {}", path.display());
    }

    println!("{}", sink.path().display());

    Ok(())
}

/// Bytes of `--custom-background`, read only when the Custom style uses them
fn custom_upload(args: &Args) -> Result<Option<Vec<u8>>> {
    if args.style != StyleName::Custom {
        if let Some(path) = &args.custom_background {
            tracing::debug!("Ignoring {} for style {:?}", path.display(), args.style);
        }
        return Ok(None);
    }

    args.custom_background
        .as_ref()
        .map(|path| {
            std::fs::read(path)
                .with_context(|| format!("Failed to read custom background {}", path.display()))
        })
        .transpose()
}

fn photo_source(args: &Args) -> Result<Option<Box<dyn CaptureSource>>> {
    if let Some(path) = &args.input {
        return Ok(Some(Box::new(PhotoFile::new(path))));
    }

    match args.camera {
        #[cfg(feature = "camera")]
        Some(index) => {
            let camera = bgstudio::capture::WebcamCapture::new(index)
                .context("Failed to initialize webcam capture")?;
            Ok(Some(Box::new(camera)))
        }
        #[cfg(not(feature = "camera"))]
        Some(_) => anyhow::bail!("--camera needs a build with the `camera` feature"),
        None => Ok(None),
    }
}

fn print_gallery() {
    for theme in Theme::ALL {
        println!("{}", theme.label());
        for (label, key) in theme.styles() {
            println!("  {:<22} {}", label, key);
        }
    }
}
