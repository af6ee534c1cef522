use clap::Parser;
use std::path::PathBuf;

use crate::error::RectifyError;
use crate::rectify::RectifyOptions;
use crate::transform::Interpolation;

pub const USAGE: &str = "Usage: quad-rectify <image_path> <corners_json_path> <output_path>";

#[derive(Parser, Debug)]
#[command(name = "quad-rectify")]
#[command(
    version,
    about = "Flatten a photographed quadrilateral into a 1050x1400 image with a four-point perspective warp",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Source image path
    #[arg(allow_hyphen_values = true)]
    pub image: PathBuf,

    /// JSON file with four {"x", "y"} corners: top-left, top-right, bottom-right, bottom-left
    #[arg(allow_hyphen_values = true)]
    pub corners: PathBuf,

    /// Output image path (format follows the extension)
    #[arg(allow_hyphen_values = true)]
    pub output: PathBuf,

    /// Sampling kernel: nearest, bilinear or bicubic
    #[arg(long, default_value = "bilinear", value_parser = parse_interpolation)]
    pub interpolation: Interpolation,

    /// Show parsed arguments, corners and the homography on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> RectifyOptions {
        RectifyOptions {
            interpolation: self.interpolation,
        }
    }
}

/// Turn an argument parsing failure into the usage error reported on stdout
pub fn usage_error(err: &clap::Error) -> RectifyError {
    let reason = err.kind().as_str().unwrap_or("invalid arguments");
    RectifyError::Usage(format!("{} ({})", USAGE, reason))
}

fn parse_interpolation(s: &str) -> Result<Interpolation, String> {
    match s.to_ascii_lowercase().as_str() {
        "nearest" => Ok(Interpolation::Nearest),
        "bilinear" | "linear" => Ok(Interpolation::Bilinear),
        "bicubic" | "cubic" => Ok(Interpolation::Bicubic),
        _ => Err(format!(
            "Invalid interpolation '{}', expected nearest, bilinear or bicubic",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_positionals() {
        let cli = Cli::try_parse_from(["quad-rectify", "in.jpg", "corners.json", "out.png"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("in.jpg"));
        assert_eq!(cli.corners, PathBuf::from("corners.json"));
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.interpolation, Interpolation::Bilinear);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_wrong_argument_count() {
        for args in [
            vec!["quad-rectify", "in.jpg", "corners.json"],
            vec!["quad-rectify", "in.jpg", "corners.json", "out.png", "extra"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            let usage = usage_error(&err);
            assert_eq!(usage.kind(), "UsageError");
            assert!(usage.to_string().starts_with(USAGE));
        }
    }

    #[test]
    fn test_interpolation_flag() {
        let cli = Cli::try_parse_from([
            "quad-rectify",
            "in.jpg",
            "c.json",
            "out.png",
            "--interpolation",
            "Bicubic",
        ])
        .unwrap();
        assert_eq!(cli.options().interpolation, Interpolation::Bicubic);
        assert!(parse_interpolation("lanczos").is_err());
    }

    #[test]
    fn test_help_and_version_are_usage_errors() {
        for args in [
            vec!["quad-rectify", "--help"],
            vec!["quad-rectify", "-h"],
            vec!["quad-rectify", "a.png", "c.json", "out.png", "--version"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(usage_error(&err).kind(), "UsageError");
        }
    }

    #[test]
    fn test_hyphenated_paths() {
        let cli = Cli::try_parse_from(["quad-rectify", "-img.png", "-c.json", "-out.png"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("-img.png"));
        assert_eq!(cli.corners, PathBuf::from("-c.json"));
        assert_eq!(cli.output, PathBuf::from("-out.png"));
    }
}
