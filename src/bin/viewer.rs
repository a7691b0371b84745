use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use mandelbrot_viewer::{
    AppState, PixelsPresenterFactory, RunGuiCommand, WgpuPresenterFactory, load_state, save_state,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Renderer {
    /// Three passes on the GPU through wgpu.
    Gpu,
    /// Software passes on the rayon pool, shown through pixels.
    Cpu,
}

/// Interactive Mandelbrot viewer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Session file loaded at startup and saved on exit.
    #[arg(long)]
    state: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Renderer::Gpu)]
    renderer: Renderer,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let state = match &args.state {
        Some(path) => load_state(path),
        None => AppState::default(),
    };

    let final_state = match args.renderer {
        Renderer::Gpu => RunGuiCommand::new(WgpuPresenterFactory::new()).execute(state)?,
        Renderer::Cpu => RunGuiCommand::new(PixelsPresenterFactory::new()).execute(state)?,
    };

    if let Some(path) = &args.state {
        save_state(&final_state, path)?;
    }

    Ok(())
}
