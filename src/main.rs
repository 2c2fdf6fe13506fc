mod compose;
mod config;
mod error;
mod generator;
mod writer;

use std::path::Path;
use config::{GeneratorConfig, CONFIG_FILE};
use error::IconError;
use generator::IconGenerator;

fn main() -> Result<(), IconError> {
    env_logger::init();

    let config = GeneratorConfig::load(Path::new(CONFIG_FILE))?;
    let generator = IconGenerator::load(config)?;
    let written = generator.generate()?;
    log::info!("Generated {} icon assets", written.len());
    Ok(())
}
