//! anim3d terminal viewer
//!
//! Loads an STL or OBJ model (or a cube when none is given) and animates it
//! with the keys configured in the options file.

use std::path::PathBuf;

use anim3d_core::{Mesh, Model};
use anim3d_terminal::{AppOptions, TerminalApp};
use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "anim3d-terminal", version, about = "Animate 3D models in the terminal")]
struct Cli {
    /// Model file (.stl or .obj). Shows a cube when omitted.
    model: Option<PathBuf>,

    /// TOML options file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the target frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Print the effective options as TOML and exit.
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => AppOptions::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => AppOptions::default(),
    };
    if let Some(fps) = cli.fps {
        options.fps = fps;
    }
    options.validate().context("invalid options")?;

    if cli.print_config {
        print!("{}", options.to_toml_string()?);
        return Ok(());
    }

    let model = match &cli.model {
        Some(path) => Model::load(path)
            .with_context(|| format!("loading model {}", path.display()))?,
        None => Model::new(vec![Mesh::cube(1.5)]),
    };
    log::info!(
        "{} sub-meshes, {} triangles",
        model.meshes.len(),
        model.triangle_count()
    );

    let mut app = TerminalApp::new(model, options).context("initialising terminal")?;
    app.run().context("running terminal viewer")?;
    Ok(())
}
