//! pmesh — promptmesh CLI
//!
//! Command-line front end for retrieval, generation, and catalog
//! maintenance. The GUI application drives the same engine API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promptmesh::{ConfigOverrides, Engine, EngineConfig, DEFAULT_SCORE_THRESHOLD, KNOWN_MODELS};

/// Promptmesh text-to-3D engine
#[derive(Parser)]
#[command(name = "pmesh")]
#[command(version)]
#[command(about = "Turn a description into a displayable 3D asset")]
struct Args {
    /// Config file path (default: ~/.promptmesh/config.toml)
    #[arg(short, long, env = "PROMPTMESH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the saved asset best matching a description
    Retrieve {
        /// Description to match
        text: String,
        /// Similarity floor below which nothing matches
        #[arg(short, long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
        threshold: f32,
    },

    /// Generate a new 3D asset from a description
    Generate {
        /// Prompt describing the asset
        text: String,
        /// Diffusion model name
        #[arg(short, long, default_value = "flux_1_schnell")]
        model: String,
        /// Inference steps
        #[arg(long)]
        steps: Option<u32>,
        /// Guidance scale
        #[arg(long)]
        guidance_scale: Option<f32>,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Negative prompt
        #[arg(long)]
        negative_prompt: Option<String>,
        /// Max sequence length (sequence-sensitive models only)
        #[arg(long)]
        max_sequence_length: Option<u32>,
    },

    /// Transcribe an audio recording to text
    Transcribe {
        /// Audio file path
        audio: PathBuf,
    },

    /// Save an asset file with a description
    Save {
        /// Path of the asset to import
        source: PathBuf,
        /// Catalog filename
        filename: String,
        /// Description used for retrieval
        description: String,
    },

    /// Delete a saved asset and its catalog entry
    Delete {
        /// Catalog filename
        filename: String,
    },

    /// List the catalog
    List,

    /// List known diffusion model names
    Models,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig::load(args.config.as_deref())?;
    let mut engine = Engine::builder().config(config).build()?;

    match args.command {
        Command::Retrieve { text, threshold } => {
            let matched = engine.retrieve_with_threshold(&text, threshold)?;
            match matched.path {
                Some(path) => println!("{} (score {:.2})", path.display(), matched.score),
                None => println!("no match (best score {:.2})", matched.score),
            }
        }
        Command::Generate {
            text,
            model,
            steps,
            guidance_scale,
            seed,
            negative_prompt,
            max_sequence_length,
        } => {
            let overrides = ConfigOverrides {
                steps,
                guidance_scale,
                seed,
                negative_prompt,
                max_sequence_length,
            };
            let result = engine.generate(&text, &model, &overrides)?;
            println!("image: {}", result.image.display());
            println!("model: {}", result.model.display());
        }
        Command::Transcribe { audio } => {
            println!("{}", engine.transcribe(&audio)?);
        }
        Command::Save {
            source,
            filename,
            description,
        } => {
            let dest = engine.save_asset(&source, &filename, &description)?;
            println!("saved {}", dest.display());
        }
        Command::Delete { filename } => {
            if engine.delete_asset(&filename)? {
                println!("deleted {filename}");
            } else {
                println!("no asset file for {filename}; catalog entry cleared");
            }
        }
        Command::List => {
            for (filename, description) in engine.catalog() {
                println!("{filename}\t{description}");
            }
        }
        Command::Models => {
            for model in KNOWN_MODELS {
                println!("{model}");
            }
        }
    }

    Ok(())
}
