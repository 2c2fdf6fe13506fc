use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const IMAGES: [&str; 2] = [
    "public/illustration-slack-1.png",
    "public/illustration-slack-2.png",
];

#[derive(Debug, PartialEq)]
enum Outcome {
    Optimized,
    Skipped,
    Failed(String),
}

fn main() {
    env_logger::init();

    let paths: Vec<&Path> = IMAGES.iter().map(Path::new).collect();
    optimize_all(&paths);
}

/// Optimizes each file in turn. Missing or failing files never stop the run.
fn optimize_all(paths: &[&Path]) -> Vec<Outcome> {
    paths
        .iter()
        .map(|path| {
            if !path.exists() {
                log::warn!("Skipping, not found: {}", path.display());
                return Outcome::Skipped;
            }

            match optimize_in_place(path) {
                Ok(()) => {
                    println!("Optimized {}", path.display());
                    Outcome::Optimized
                }
                Err(e) => {
                    log::error!("Failed to optimize {}: {}", path.display(), e);
                    Outcome::Failed(e.to_string())
                }
            }
        })
        .collect()
}

/// Re-encodes `path` at maximum compression with adaptive filtering,
/// via a sibling `.opt.png` that is renamed over the original.
fn optimize_in_place(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    optimize_into(path, path)
}

/// Encodes `source` into its `.opt.png` sibling and moves that to `dest`.
/// The sibling never outlives a failure.
fn optimize_into(source: &Path, dest: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let out = optimized_path(source);
    let result = write_optimized(source, &out).and_then(|()| Ok(fs::rename(&out, dest)?));
    if result.is_err() {
        let _ = fs::remove_file(&out);
    }
    result
}

fn write_optimized(path: &Path, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    let mut writer = BufWriter::new(File::create(out)?);
    let encoder = PngEncoder::new_with_quality(&mut writer, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(img.as_bytes(), img.width(), img.height(), img.color())?;
    writer.flush()?;
    log::debug!("Encoded {} ({}x{}, {:?})", out.display(), img.width(), img.height(), img.color());
    Ok(())
}

fn optimized_path(path: &Path) -> PathBuf {
    path.with_extension("opt.png")
}
