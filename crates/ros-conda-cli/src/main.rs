//! Main CLI entry point for ros-conda

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use ros_conda_core::Platform;
use tracing_subscriber::EnvFilter;

mod commands;

/// ros-conda - Generate conda recipes from ROS packages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Backend configuration file path (global option)
    #[arg(short, long, global = true, value_name = "FILE", default_value = commands::DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the recipe for a ROS package
    Generate {
        /// Directory containing package.xml
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        manifest_path: PathBuf,

        /// Project model (YAML or JSON) the recipe is based on
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,

        /// Target platform, e.g. linux-64 or osx-arm64 (default: current)
        #[arg(long, value_name = "PLATFORM")]
        platform: Option<Platform>,

        /// Override the configured ROS distribution
        #[arg(long, value_name = "DISTRO")]
        distro: Option<String>,

        /// Treat the package as an editable install
        #[arg(long)]
        editable: bool,

        /// Write the recipe here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the conda packages dependencies map to
    Map {
        /// Dependency names as written in package.xml
        #[arg(required = true, value_name = "DEPENDENCY")]
        dependencies: Vec<String>,

        /// Override the configured ROS distribution
        #[arg(long, value_name = "DISTRO")]
        distro: Option<String>,

        /// Target platform (default: current)
        #[arg(long, value_name = "PLATFORM")]
        platform: Option<Platform>,
    },

    /// Validate configuration, mapping data, templates and a package
    Validate {
        /// Directory containing package.xml to check as well
        #[arg(short, long, value_name = "DIR")]
        manifest_path: Option<PathBuf>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, value_name = "FILE", default_value = commands::DEFAULT_CONFIG)]
        output: PathBuf,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,

        /// ROS distribution to configure
        #[arg(long, value_name = "DISTRO", default_value = "humble")]
        distro: String,
    },
}

fn main() -> Result<()> {
    // Install color-eyre for better error reports
    color_eyre::install()?;

    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    let result = match cli.command {
        Commands::Generate { manifest_path, model, platform, distro, editable, output } => {
            let command = commands::GenerateCommand {
                config_path: cli.config,
                manifest_path,
                model_path: model,
                platform: platform.unwrap_or_else(Platform::current),
                distro,
                editable,
                output,
            };
            command.execute()
        }

        Commands::Map { dependencies, distro, platform } => {
            let command = commands::MapCommand::new(
                cli.config,
                dependencies,
                distro,
                platform.unwrap_or_else(Platform::current),
            );
            command.execute()
        }

        Commands::Validate { manifest_path } => {
            let command = commands::ValidateCommand::new(cli.config, manifest_path);
            command.execute()
        }

        Commands::Init { output, force, distro } => {
            let command = commands::InitCommand::new(output, force, distro);
            command.execute()
        }
    };

    // Handle command execution result
    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn setup_logging(verbose: u8, quiet: u8) -> Result<()> {
    let log_level = match (verbose, quiet) {
        (0, 0) => "info",
        (1, 0) => "debug",
        (v, 0) if v >= 2 => "trace",
        (0, 1) => "warn",
        (0, 2) => "error",
        (0, q) if q > 2 => "off",
        _ => "info", // If both are set, default to info
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Recipes go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "ros-conda",
            "-vv",
            "generate",
            "--manifest-path",
            "src/demo_nodes_cpp",
            "--platform",
            "osx-arm64",
            "-c",
            "backend.yaml",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("backend.yaml"));
        match cli.command {
            Commands::Generate { manifest_path, platform, editable, .. } => {
                assert_eq!(manifest_path, PathBuf::from("src/demo_nodes_cpp"));
                assert_eq!(platform, Some(Platform::OsxArm64));
                assert!(!editable);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_map_requires_dependencies() {
        assert!(Cli::try_parse_from(["ros-conda", "map"]).is_err());
        assert!(Cli::try_parse_from(["ros-conda", "map", "rclcpp", "--distro", "jazzy"]).is_ok());
    }
}
