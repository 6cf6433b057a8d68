mod config;
mod error;
mod grid;
mod impedance;
mod model;
mod synthesis;
mod traveltime;
mod visualisation;
mod wavelet;

use anyhow::{anyhow, Result};
use config::Config;
use model::{GridSource, LayeredModelSource};
use std::path::Path;
use synthesis::SynthesisPipeline;
use visualisation::{Renderer, SectionVisualiser};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = if Path::new(CONFIG_PATH).exists() {
        Config::from_file(CONFIG_PATH)?
    } else {
        println!("No {} found, using built-in defaults", CONFIG_PATH);
        Config::default()
    };
    config.print_summary();

    let model = LayeredModelSource::new(&config.model).load()?;
    let pipeline = SynthesisPipeline::new(&model, &config);
    let section = pipeline.run()?;

    let visualiser = SectionVisualiser::new(
        &config.visualization.output_dir,
        config.visualization.image_width,
        config.visualization.image_height,
    );
    visualiser
        .render(&section)
        .map_err(|e| anyhow!("Failed to render sections: {}", e))?;

    println!("Done! Final shapes:");
    println!("  RC_time:    {:?}", section.rc_time.dim());
    println!("  seis_time:  {:?}", section.seis_time.dim());
    println!("  seis_depth: {:?}", section.seis_depth.dim());
    Ok(())
}
