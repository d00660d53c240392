use anyhow::Context;
use clap::Parser as ClapParser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rhythm::overlay::Overlay;
use rhythm::{format_error, Canvas, Inflater, RhythmConfig};

#[derive(ClapParser, Debug)]
#[command(
    name = "rhythm",
    version,
    about = "Inflate Rhythm overlay documents into spec layer trees"
)]
struct Cli {
    /// Path to a Rhythm document. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
    /// Config file to use instead of the user config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Pixels per dp.
    #[arg(long)]
    density: Option<f32>,
    /// Pixels per sp.
    #[arg(long)]
    scaled_density: Option<f32>,
    /// Pixels per inch.
    #[arg(long)]
    xdpi: Option<f32>,
    /// Surface width in pixels for --render.
    #[arg(long)]
    width: Option<u32>,
    /// Surface height in pixels for --render.
    #[arg(long)]
    height: Option<u32>,
    /// Draw every overlay and print the recorded canvas commands.
    #[arg(long)]
    render: bool,
    /// Print the layer trees as JSON.
    #[arg(long)]
    json: bool,
    /// Log inflation progress to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = RhythmConfig::discover(cli.config.as_deref())?;
    if let Some(density) = cli.density {
        config.scale.density = density;
    }
    if let Some(scaled_density) = cli.scaled_density {
        config.scale.scaled_density = scaled_density;
    }
    if let Some(xdpi) = cli.xdpi {
        config.scale.xdpi = xdpi;
    }
    if let Some(width) = cli.width {
        config.surface.width = width;
    }
    if let Some(height) = cli.height {
        config.surface.height = height;
    }
    debug!(config = ?config.path(), scale = ?config.scale, "settings resolved");

    let source = read_source(cli.input.as_deref())?;
    let mut inflater = Inflater::new(config.scale);
    let overlays = match inflater.inflate_str(&source) {
        Ok(overlays) => overlays,
        Err(err) => {
            eprintln!("{}", format_error(&source, &err));
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        let summaries: Vec<_> = overlays.iter().map(Overlay::summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("failed to serialize overlays")?
        );
    } else {
        for overlay in &overlays {
            print!("{}", overlay.summary().outline());
        }
    }

    if cli.render {
        let bounds = config.surface.bounds();
        for (index, overlay) in overlays.iter().enumerate() {
            let mut canvas = Canvas::new();
            overlay.draw(&mut canvas, bounds);
            println!("-- overlay {} --", index + 1);
            for command in canvas.commands() {
                println!("{command:?}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("rhythm=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_source(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read document {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}
