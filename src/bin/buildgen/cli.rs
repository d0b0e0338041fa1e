//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Buildgen - declarative build-file generation and project scaffolding
#[derive(Parser)]
#[command(name = "buildgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project from a recipe
    New(NewArgs),

    /// Generate build files from a project config, or a boilerplate config
    Generate(GenerateArgs),

    /// List available recipes
    Recipes(RecipesArgs),

    /// Manage project templates
    Templates(TemplatesArgs),

    /// Manage user configuration (~/.buildgen/config.toml)
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Python environment tool choice for `py/*` recipes.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvToolArg {
    Uv,
    Venv,
}

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Recipe to use (e.g. cpp/executable, py/pybind11)
    #[arg(short, long, default_value = "cpp/executable")]
    pub recipe: String,

    /// Output directory (defaults to ./<name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Environment tool for py/* recipes
    #[arg(long, value_enum, default_value = "uv")]
    pub env_tool: EnvToolArg,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Write a boilerplate project config to this path
    #[arg(long, value_name = "PATH", conflicts_with = "config")]
    pub init: Option<PathBuf>,

    /// Generate build files from this config (JSON or YAML)
    #[arg(long = "from", value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Generate the Makefile only
    #[arg(long, conflicts_with = "cmake_only")]
    pub makefile_only: bool,

    /// Generate the CMakeLists.txt only
    #[arg(long)]
    pub cmake_only: bool,

    /// Generate a Makefile frontend that wraps the CMake build
    #[arg(long, conflicts_with_all = ["makefile_only", "cmake_only"])]
    pub frontend: bool,

    /// Directory to write the build files into (defaults to the config's
    /// directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecipesArgs {
    /// Filter by category (cpp, c, py)
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommands,
}

#[derive(Subcommand)]
pub enum TemplatesCommands {
    /// List template search roots
    List,

    /// Show template resolution details for a recipe
    Show {
        /// Recipe name (e.g. py/pybind11)
        recipe: String,
    },

    /// Copy a recipe's built-in templates for customization
    Copy {
        /// Recipe name (e.g. py/pybind11)
        recipe: String,

        /// Copy to ~/.buildgen/templates/ instead of ./.buildgen/templates/
        #[arg(long)]
        global: bool,

        /// Skip the shared common/ templates
        #[arg(long)]
        skip_common: bool,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a default config file
    Init,

    /// Display the current resolved config
    Show,

    /// Print the config file path
    Path,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
