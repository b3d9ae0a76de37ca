use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;

use voicesep::{IsolationConfig, IsolationPipeline};

fn main() -> Result<()> {
    // Initialize env_logger to output to stderr (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Usage: voicesep <input.wav> [passes]"))?;

    let mut config = match std::env::var_os("VOICESEP_CONFIG") {
        Some(path) => {
            let path = Path::new(&path);
            info!("Loading config from {}", path.display());
            IsolationConfig::from_file(path)?
        }
        None => IsolationConfig::default(),
    };

    if let Some(passes) = args.next() {
        config.passes = passes
            .parse()
            .with_context(|| format!("Invalid pass count: {}", passes))?;
    }

    // Working directory next to the caller, named after the input file.
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Input has no usable file name: {}", input.display()))?;
    let work_dir = PathBuf::from(format!("{}_isolated", stem));

    let mut pipeline = IsolationPipeline::new(config, work_dir)?;
    let report = pipeline.run(&input)?;

    info!(
        "Done after {} passes, final output: {}",
        report.passes.len(),
        report.final_output.display()
    );

    Ok(())
}
