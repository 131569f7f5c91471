use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use image_processor::config::Config;
use image_processor::utils::batch;
use image_processor::{GrayscaleWeights, ImageProcessor, Pipeline, Preset, Transform};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How to transform the image. `--chain` and `--preset` are exclusive with
/// each other and with the single-step flags; the single-step flags run as
/// grayscale, then brightness, then compress.
#[derive(clap::Args)]
struct Edits {
    /// Steps separated by ';', e.g. "grayscale;brightness:30;compress:2"
    #[arg(long, conflicts_with_all = ["preset", "compress", "grayscale", "weights", "brightness"])]
    chain: Option<Pipeline>,

    /// gray-bright-compress, compress-gray-bright, bright-gray or batch
    #[arg(long, conflicts_with_all = ["compress", "grayscale", "weights", "brightness"])]
    preset: Option<Preset>,

    /// Convert to grayscale
    #[arg(short, long)]
    grayscale: bool,

    /// Grayscale weights "r,g,b" (implies --grayscale)
    #[arg(long)]
    weights: Option<GrayscaleWeights>,

    /// Brightness change in percent
    #[arg(short, long, allow_negative_numbers = true,
          value_parser = clap::value_parser!(i32).range(-100..=100))]
    brightness: Option<i32>,

    /// Downscale factor; without a value uses the configured default
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    compress: Option<Option<u32>>,
}

impl Edits {
    fn into_pipeline(self, config: &Config) -> Pipeline {
        if let Some(chain) = self.chain {
            return chain;
        }
        if let Some(preset) = self.preset {
            return preset.pipeline();
        }

        let mut pipeline = Pipeline::new();
        if self.grayscale || self.weights.is_some() {
            let weights = self.weights.unwrap_or(config.gray_weights);
            pipeline.push(Transform::Grayscale(weights));
        }
        if let Some(percent) = self.brightness {
            pipeline.push(Transform::Brightness(percent));
        }
        if let Some(factor) = self.compress {
            let factor = factor.unwrap_or(config.compress_factor);
            pipeline.push(Transform::Compress(factor));
        }
        pipeline
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Edit one image and save the result
    Process {
        #[arg(short, long)]
        input: PathBuf,
        /// Defaults to <input-stem>_processed<ext> next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print statistics before and after editing
        #[arg(long)]
        stats: bool,
        #[command(flatten)]
        edits: Edits,
    },
    /// Print statistics of an image
    Stats {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Apply the same edits to every image in a directory
    Batch {
        /// Defaults to IMAGE_PROCESSOR_BATCH_DIR or ./images
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Defaults to the input directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        edits: Edits,
    },
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{style}{}{style:#} {}:{}] {}",
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;

    match cli.command {
        Commands::Process {
            input,
            output,
            stats,
            edits,
        } => {
            let pipeline = edits.into_pipeline(&config);
            let mut processor = ImageProcessor::open(&input)
                .with_context(|| format!("failed to load {}", input.display()))?;

            if stats {
                if let Some(s) = processor.stats() {
                    println!("Before:\n{s}\n");
                }
            }

            processor
                .apply_pipeline(&pipeline)
                .with_context(|| format!("failed to apply {pipeline}"))?;
            println!("Applied chain: {pipeline}");

            if stats {
                if let Some(s) = processor.stats() {
                    println!("After:\n{s}\n");
                }
            }

            let saved = processor.save(output.as_deref())?;
            println!("Saved: {}", saved.display());
        }

        Commands::Stats { input } => {
            let processor = ImageProcessor::open(&input)
                .with_context(|| format!("failed to load {}", input.display()))?;
            if let Some(s) = processor.stats() {
                println!("{s}");
            }
        }

        Commands::Batch {
            input_dir,
            output_dir,
            edits,
        } => {
            let mut pipeline = edits.into_pipeline(&config);
            if pipeline.is_empty() {
                pipeline = Preset::Batch.pipeline();
            }
            let input_dir = input_dir.unwrap_or_else(|| config.batch_dir.clone());
            let output_dir = output_dir.unwrap_or_else(|| input_dir.clone());

            let report = batch::process_directory(&input_dir, &output_dir, &pipeline)
                .with_context(|| format!("failed to read {}", input_dir.display()))?;

            for (input, output) in &report.processed {
                println!("{} -> {}", input.display(), output.display());
            }
            for (input, err) in &report.failed {
                eprintln!("{}: {err}", input.display());
            }
            if report.total() == 0 {
                println!("No images found in {}", input_dir.display());
            }
            if !report.is_success() {
                bail!(
                    "{} of {} images failed",
                    report.failed.len(),
                    report.total()
                );
            }
        }
    }

    Ok(())
}
