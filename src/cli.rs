use clap::{ArgAction, Parser, Subcommand};
use endomondo_sync::config::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "endomondo-sync",
    about = "Download and upload workouts through the Endomondo mobile API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// Base URL of the mobile API
    #[arg(long, global = true, env = "ENDOMONDO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Country code sent when pairing
    #[arg(long, global = true, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Exchange credentials for an auth token and print it
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "ENDOMONDO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List workouts started in a date range (RFC 3339 or YYYY-MM-DD)
    List {
        #[arg(long, env = "ENDOMONDO_TOKEN", hide_env_values = true)]
        token: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Show one workout
    Show {
        #[arg(long, env = "ENDOMONDO_TOKEN", hide_env_values = true)]
        token: String,

        #[arg(value_name = "WORKOUT_ID")]
        id: String,
    },

    /// Upload a GPX file as a new workout
    Upload {
        #[arg(long, env = "ENDOMONDO_TOKEN", hide_env_values = true)]
        token: String,

        /// Sport name, e.g. running, cycling_sport, hiking
        #[arg(long, default_value = "running")]
        sport: String,

        #[arg(value_name = "GPX")]
        gpx: PathBuf,
    },
}
