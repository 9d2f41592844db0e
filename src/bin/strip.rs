use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use test_strip_reader::annotate::{annotate_regions, write_debug_artifacts};
use test_strip_reader::image_io::save_image;
use test_strip_reader::{PipelineConfig, PipelineReport, process_file};

#[derive(Parser, Debug)]
#[command(
    name = "reader_cli",
    about = "Enhance a test strip photo and report the color of each detected pad",
    version
)]
struct Cli {
    /// Photo of the test strip (JPEG, PNG, ...)
    input: PathBuf,

    /// Where to write the enhanced image
    output: PathBuf,

    /// JSON file overriding the default pipeline parameters
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// JPEG quality for the output image (1-100)
    #[arg(long, short = 'q', value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Also write the enhanced image with detected regions outlined
    #[arg(long, short = 'a')]
    annotate: Option<PathBuf>,

    /// Directory for the threshold mask and overlay
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Write the run report as JSON
    #[arg(long, short = 'j')]
    json: Option<PathBuf>,
}

fn write_text_file(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("Image size: {}x{}", report.width, report.height);
    println!("Detected {} test regions", report.samples.len());
    for (i, sample) in report.samples.iter().enumerate() {
        let r = sample.region;
        let [red, green, blue] = sample.color;
        println!(
            "  region {}: ({}, {}) {}x{}  rgb({red}, {green}, {blue}) {}",
            i + 1,
            r.x,
            r.y,
            r.width,
            r.height,
            sample.hex()
        );
    }
    let stats = &report.stats;
    println!(
        "HSV means: hue {:.1}, saturation {:.1}, value {:.1} over {} pixels",
        stats.mean_hue, stats.mean_saturation, stats.mean_value, stats.pixel_count
    );
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(q) = cli.quality {
        config.output.jpeg_quality = q;
    }

    let (report, analysis) = process_file(&cli.input, &cli.output, &config)?;
    println!("Processed image saved to {}", cli.output.display());
    print_report(&report);

    if cli.annotate.is_some() || cli.debug_dir.is_some() {
        let overlay = annotate_regions(&analysis.processed, &analysis.samples);
        if let Some(path) = &cli.annotate {
            save_image(&overlay, path, config.output.jpeg_quality)?;
            println!("Annotated image saved to {}", path.display());
        }
        if let Some(dir) = &cli.debug_dir {
            write_debug_artifacts(dir, &analysis.mask, &overlay)?;
        }
    }

    if let Some(path) = &cli.json {
        write_text_file(path, &report.to_json()?)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error processing {}: {e}", cli.input.display());
            ExitCode::FAILURE
        }
    }
}
