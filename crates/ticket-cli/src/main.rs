mod commands;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use ticket_core::{
    list_images, CropSession, Decoder, DetectorConfig, FsDecoder, JpegFileSink, MappingPolicy,
    PixelRect, RegionDetector, SessionConfig,
};

#[derive(Parser)]
#[command(name = "ticket-cropper")]
#[command(version, about = "Crop scanned tickets out of a folder of scans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON settings file; flags given on the command line take precedence
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    session: SessionArgs,

    #[command(flatten)]
    detector: DetectorArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the region detected in a single scan
    Detect {
        /// Scan to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the pixel region as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Print the effective settings as JSON
    Config {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        detector: DetectorArgs,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Directory holding the pending scans
    #[arg(short, long, value_name = "DIR", default_value = "todo")]
    input: PathBuf,

    /// Directory cropped tickets are written to [default: done]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Display area the scan is fitted into [default: 800x600]
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,

    /// Initial JPEG quality, 1-100 [default: 90]
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// When a resized view maps the selection back to the image [default: crop-time]
    #[arg(long, value_name = "POLICY")]
    mapping: Option<MappingArg>,
}

impl SessionArgs {
    /// Overlay the flags that were given on `config`.
    fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(dir) = &self.output {
            config = config.set_output_dir(dir);
        }
        if let Some((width, height)) = self.viewport {
            config = config.set_viewport(width, height);
        }
        if let Some(quality) = self.quality {
            config = config.set_default_quality(quality);
        }
        if let Some(mapping) = self.mapping {
            config = config.set_mapping(mapping.into());
        }
        config
    }
}

#[derive(Args)]
struct DetectorArgs {
    /// Fraction of the width on the right treated as scanner margin [default: 0.45]
    #[arg(long, value_name = "FRACTION")]
    margin: Option<f64>,

    /// Padding added around the detected region, in pixels [default: 10]
    #[arg(long, value_name = "PX")]
    padding: Option<f64>,

    /// Clamp the padded region to the image bounds
    #[arg(long)]
    clamp: bool,
}

impl DetectorArgs {
    /// Overlay the flags that were given on `config`.
    fn apply(&self, mut config: DetectorConfig) -> DetectorConfig {
        if let Some(margin) = self.margin {
            config = config.set_margin_fraction(margin);
        }
        if let Some(padding) = self.padding {
            config = config.set_padding(padding);
        }
        if self.clamp {
            config = config.set_clamp_to_image(true);
        }
        config
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MappingArg {
    /// Use the view as it is when cropping
    CropTime,
    /// Use the view as it was when the selection was made
    CommitTime,
}

impl From<MappingArg> for MappingPolicy {
    fn from(arg: MappingArg) -> Self {
        match arg {
            MappingArg::CropTime => MappingPolicy::CropTime,
            MappingArg::CommitTime => MappingPolicy::CommitTime,
        }
    }
}

fn parse_viewport(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    if !(w > 0.0 && h > 0.0) {
        return Err(format!("viewport must have a positive size, got '{s}'"));
    }
    Ok((w, h))
}

/// Read settings from a JSON file, or the defaults when no file is given.
///
/// Keys left out of the file keep their default values.
fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(config)
}

/// The settings a run uses: the file (or defaults), then the flags.
fn resolve(base: SessionConfig, session: &SessionArgs, detector: &DetectorArgs) -> SessionConfig {
    let detector = detector.apply(base.detector.clone());
    session.apply(base).set_detector(detector)
}

/// JSON report for `detect --json`.
#[derive(Serialize)]
struct Detection<'a> {
    file: &'a Path,
    image_width: u32,
    image_height: u32,
    /// Pixels a crop of the detected region would keep.
    region: Option<PixelRect>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let base = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Detect {
            file,
            json,
            detector,
        }) => detect(&file, json, detector.apply(base.detector)),
        Some(Commands::Config { session, detector }) => {
            let config = resolve(base, &session, &detector);
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        None => interactive(
            &cli.session.input,
            resolve(base, &cli.session, &cli.detector),
        ),
    }
}

fn detect(file: &Path, json: bool, config: DetectorConfig) -> anyhow::Result<()> {
    let image = FsDecoder
        .decode(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let rect = RegionDetector::new(config).detect(&image);

    if json {
        let report = Detection {
            file,
            image_width: image.width,
            image_height: image.height,
            region: rect.and_then(|r| r.to_pixel_rect(image.width, image.height)),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match rect {
        Some(rect) => println!("{rect}"),
        None => println!("No ticket region found in {}", file.display()),
    }
    Ok(())
}

fn interactive(input: &Path, config: SessionConfig) -> anyhow::Result<()> {
    let entries = list_images(input)
        .with_context(|| format!("Failed to read input directory {}", input.display()))?;
    if entries.is_empty() {
        bail!("No PNG or JPEG scans found in {}", input.display());
    }

    let mut session = CropSession::new(entries, config, FsDecoder, JpegFileSink);
    if let Err(e) = session.load(0) {
        log::error!("{e}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    commands::run(&mut session, stdin.lock(), stdout.lock())
}
