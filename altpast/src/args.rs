use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};

/// Alternative past: reimagine a photo from the story behind it
#[derive(Debug, Parser)]
#[command(name = "altpast", about = "Transcribe, analyze and reimagine photos with their stories")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "altpast.toml", env = "ALTPAST_CONFIG", global = true)]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ALTPAST_LISTEN", global = true)]
    pub listen: Option<SocketAddr>,

    /// Include error details in responses
    #[arg(long, env = "ALTPAST_DEVELOPMENT", global = true)]
    pub development: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Analyze a local photo with its story and generate the alternative version
    Reimagine(ReimagineArgs),
}

#[derive(Debug, clap::Args)]
pub struct ReimagineArgs {
    /// Source photo
    #[arg(long)]
    pub image: PathBuf,

    /// The story told about the photo
    #[arg(long)]
    pub story: String,

    /// Where to write the generated image
    #[arg(long)]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let args = Args::try_parse_from(["altpast"]).unwrap();

        assert!(args.command.is_none());
        assert_eq!(args.config, PathBuf::from("altpast.toml"));
    }

    #[test]
    fn reimagine_takes_image_story_and_output() {
        let args = Args::try_parse_from([
            "altpast",
            "reimagine",
            "--image",
            "grandma.jpg",
            "--story",
            "She used to love travel.",
            "--output",
            "out.png",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        let Some(Command::Reimagine(reimagine)) = args.command else {
            panic!("expected reimagine");
        };

        assert_eq!(reimagine.image, PathBuf::from("grandma.jpg"));
        assert_eq!(reimagine.story, "She used to love travel.");
        assert_eq!(args.config, PathBuf::from("custom.toml"));
    }

    #[test]
    fn reimagine_requires_a_story() {
        assert!(Args::try_parse_from(["altpast", "reimagine", "--image", "a.jpg", "--output", "b.png"]).is_err());
    }
}
