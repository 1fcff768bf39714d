use clap::{Parser, Subcommand};
use placeguide_core::config::ErrorPolicy;
use placeguide_core::models::Coordinate;
use std::path::PathBuf;

/// PlaceGuide - POI quality screening and nearby grouping
#[derive(Parser, Debug)]
#[command(name = "placeguide")]
#[command(about = "Screen place candidates and group the ones that sit together", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show the full check trace for every candidate
    #[arg(long, global = true)]
    pub explain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a batch of candidates and group the accepted ones
    Evaluate(EvaluateArgs),

    /// List the configured categories
    Categories(CategoriesArgs),

    /// Distance and walking time between two coordinates
    Distance(DistanceArgs),

    /// Show resolved settings and where each value came from
    Config(ConfigArgs),
}

/// Error policy selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ErrorPolicyArg {
    /// Record failing candidates and continue
    Skip,
    /// Fail the batch if any candidate cannot be evaluated
    Abort,
}

impl From<ErrorPolicyArg> for ErrorPolicy {
    fn from(arg: ErrorPolicyArg) -> Self {
        match arg {
            ErrorPolicyArg::Skip => ErrorPolicy::Skip,
            ErrorPolicyArg::Abort => ErrorPolicy::Abort,
        }
    }
}

#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// JSON file holding an array of candidates
    pub input: PathBuf,

    /// Category table (TOML)
    #[arg(long, value_name = "PATH")]
    pub categories: Option<PathBuf>,

    /// Anchor coordinate the distance checks are measured from
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub anchor: Option<Coordinate>,

    /// Clustering threshold in meters (0 or less disables merging)
    #[arg(long, value_name = "METERS", allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// What to do with candidates that cannot be evaluated
    #[arg(long, value_enum)]
    pub error_policy: Option<ErrorPolicyArg>,

    /// Settings file (defaults to ./placeguide.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the nearby groups as a GeoJSON FeatureCollection
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    /// Category table (TOML)
    #[arg(long, value_name = "PATH")]
    pub categories: Option<PathBuf>,

    /// Settings file (defaults to ./placeguide.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DistanceArgs {
    /// First coordinate
    #[arg(value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub from: Coordinate,

    /// Second coordinate
    #[arg(value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub to: Coordinate,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Settings file (defaults to ./placeguide.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
