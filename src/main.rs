use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mandelbrot_viewer::{AppState, ExportController, PpmFilePresenter, load_state};

/// Headless Mandelbrot renderer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Session file to render from; defaults apply when absent.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one frame to a binary PPM image.
    Export {
        #[arg(long, default_value_t = 1200)]
        width: u32,
        #[arg(long, default_value_t = 900)]
        height: u32,
        #[arg(long, default_value = "output/mandelbrot.ppm")]
        out: PathBuf,
        /// Supersample 2x2 regardless of the session setting.
        #[arg(long)]
        ssaa: bool,
        /// Palette animation time in seconds.
        #[arg(long, default_value_t = 0.0)]
        time: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut state = match &cli.state {
        Some(path) => load_state(path),
        None => AppState::default(),
    };

    match cli.command {
        Command::Export {
            width,
            height,
            out,
            ssaa,
            time,
        } => {
            if ssaa {
                state.set_ssaa(true);
            }

            let mut controller = ExportController::new(PpmFilePresenter::new());
            controller.generate(&state, width, height, time)?;
            controller.write(&out)?;
        }
    }

    Ok(())
}
