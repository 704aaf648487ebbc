use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use spectral_watermark as wm;

#[derive(Parser)]
#[command(name = "watermark")]
#[command(author, version, about = "Spread spectrum image watermarking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Embed {
    /// The file to operate on.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Watermark length.
    #[arg(default_value_t = 1000, long)]
    length: usize,

    /// Watermark strength.
    #[arg(default_value_t = 0.1, long)]
    alpha: f64,

    /// Seed for the watermark generator, drawn from the operating system if absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Marked image, defaults to <FILE>_watermarked.png.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Watermark record, defaults to <FILE>_watermark.json.
    #[arg(short, long)]
    record: Option<PathBuf>,

    /// Description stored in the record.
    #[arg(short, long)]
    description: Option<String>,

    /// Write a visualization of the luminance coefficients to this file.
    #[arg(long)]
    dump_coefficients: Option<PathBuf>,

    /// Overwrite existing output files.
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct Extract {
    /// The original file.
    #[arg(value_name = "BASE")]
    base_file: PathBuf,

    /// The suspect file.
    #[arg(value_name = "DERIVED")]
    derived_file: PathBuf,

    /// Record holding the configuration to extract with.
    #[arg(short, long)]
    record: PathBuf,

    /// Write the extracted watermark as json to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct Test {
    /// The original file.
    #[arg(value_name = "BASE")]
    base_file: PathBuf,

    /// The suspect file.
    #[arg(value_name = "DERIVED")]
    derived_file: PathBuf,

    /// Records with the watermarks to check against.
    #[arg(value_name = "RECORD", required = true)]
    records: Vec<PathBuf>,

    /// Similarity threshold, in standard deviations of an unrelated watermark.
    #[arg(default_value_t = 6.0, long)]
    sigma: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a fresh watermark into a file.
    Embed(Embed),
    /// Extract the watermark estimate from a derived file.
    Extract(Extract),
    /// Test a derived file against recorded watermarks.
    Test(Test),
}

/// `<dir>/<stem><suffix>` next to the input file.
fn sibling(file: &Path, suffix: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    file.with_file_name(format!("{stem}{suffix}"))
}

fn refuse_overwrite(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} exists, use --force to overwrite", path.display());
    }
    Ok(())
}

fn embed(args: &Embed) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| sibling(&args.file, "_watermarked.png"));
    let record_path = args
        .record
        .clone()
        .unwrap_or_else(|| sibling(&args.file, "_watermark.json"));
    refuse_overwrite(&output, args.force)?;
    refuse_overwrite(&record_path, args.force)?;

    let image = wm::io::load(&args.file)
        .with_context(|| format!("could not load image at {}", args.file.display()))?;
    let (width, height) = image.dimensions();
    let config = wm::WatermarkConfig::new(args.length, args.alpha);
    let writer = wm::Writer::new(image, config)?;

    if let Some(path) = &args.dump_coefficients {
        wm::util::dump_buffer_as_image(width, height, writer.coefficients(), path)
            .with_context(|| format!("could not write coefficients to {}", path.display()))?;
    }

    let mut rng = match args.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    let (marked, watermark) = writer.mark(&mut rng)?;

    wm::io::save(&output, &marked)
        .with_context(|| format!("could not save image to {}", output.display()))?;

    let mut record = wm::WatermarkRecord::new(config);
    record.description = args.description.clone();
    record.push(watermark)?;
    record
        .save(&record_path)
        .with_context(|| format!("could not save record to {}", record_path.display()))?;

    info!(image = %output.display(), record = %record_path.display(), "Embedded watermark");
    println!("Marked image: {}", output.display());
    println!("Watermark record: {}", record_path.display());
    Ok(())
}

fn extract(args: &Extract) -> Result<()> {
    let record = wm::WatermarkRecord::load(&args.record)
        .with_context(|| format!("could not load record {}", args.record.display()))?;
    let extracted =
        wm::io::extract_from_image(&args.base_file, &args.derived_file, record.config)?;

    let text = serde_json::to_string_pretty(&extracted)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!(path = %path.display(), "Wrote extracted watermark");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn test(args: &Test) -> Result<()> {
    let base = wm::io::load(&args.base_file)
        .with_context(|| format!("could not load image at {}", args.base_file.display()))?;
    let derived = wm::io::load(&args.derived_file)
        .with_context(|| format!("could not load image at {}", args.derived_file.display()))?;
    let derived = wm::Reader::derived(&derived);

    for record_path in args.records.iter() {
        let record = wm::WatermarkRecord::load(record_path)
            .with_context(|| format!("could not load record {}", record_path.display()))?;
        let reader = wm::Reader::base(&base, record.config)?;
        let extracted = reader.extract(&derived)?;
        let tester = wm::Tester::new(extracted.data());

        for (i, watermark) in record.watermarks.iter().enumerate() {
            match tester.similarity(watermark.data()) {
                Ok(sim) => println!(
                    "{} #{i}: similarity {:.3}, exceeds {} sigma: {}",
                    record_path.display(),
                    sim.similarity,
                    args.sigma,
                    sim.exceeds_sigma(args.sigma)
                ),
                Err(wm::WatermarkError::UndefinedSimilarity) => println!(
                    "{} #{i}: derived image is identical to the base at the marked coefficients",
                    record_path.display()
                ),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spectral_watermark=info,watermark=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Embed(v) => embed(v),
        Commands::Extract(v) => extract(v),
        Commands::Test(v) => test(v),
    }
}
