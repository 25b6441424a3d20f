//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use crashwatch_core::error::CoreError;
use crashwatch_core::filter::{parse_date_input, CrashFilter};

use crate::backoff::BackoffConfig;
use crate::review::ReviewDecision;

#[derive(Parser, Debug)]
#[command(author, version, about = "Watch the crash query service from a terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the crash query service
    #[arg(
        long,
        env = "CRASHWATCH_URL",
        default_value = "http://localhost:3333",
        global = true
    )]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5, global = true)]
    pub request_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll for new crashes and print the dashboard on every change
    Watch(WatchArgs),
    /// Print the crash list, chart and filter options once
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show details for one crash (camera_id-frame_id)
        #[arg(long, value_name = "CRASH")]
        select: Option<String>,
    },
    /// Download the snapshot image of a crash
    Image {
        /// Crash selector (camera_id-frame_id)
        selector: String,

        /// File to write the JPEG to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Approve or disapprove a crash
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between polls while the service is healthy
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Upper bound in seconds on the delay after repeated failures
    #[arg(long, default_value_t = 30)]
    pub max_backoff_secs: u64,

    /// Start with this crash (camera_id-frame_id) instead of the latest
    #[arg(long, value_name = "CRASH")]
    pub crash: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl WatchArgs {
    pub fn backoff(&self) -> BackoffConfig {
        BackoffConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_delay: Duration::from_secs(self.max_backoff_secs.max(self.interval_secs)),
            ..Default::default()
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only crashes in this city
    #[arg(long)]
    pub city: Option<String>,

    /// Only crashes in this district
    #[arg(long)]
    pub district: Option<String>,

    /// Earliest crash date, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Latest crash date, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,
}

impl FilterArgs {
    pub fn into_filter(self) -> Result<CrashFilter, CoreError> {
        let start = self.start_date.as_deref().map(parse_date_input).transpose()?;
        let end = self.end_date.as_deref().map(parse_date_input).transpose()?;

        Ok(CrashFilter {
            city: self.city,
            district: self.district,
            start_date: start.flatten(),
            end_date: end.flatten(),
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum ReviewAction {
    /// Confirm the crash and show its approximate location
    Approve {
        /// Crash selector (camera_id-frame_id, or `latest`)
        selector: String,
    },
    /// Mark the crash as a false positive
    Disapprove {
        /// Crash selector (camera_id-frame_id, or `latest`)
        selector: String,
    },
}

impl ReviewAction {
    pub fn decision(&self) -> ReviewDecision {
        match self {
            ReviewAction::Approve { .. } => ReviewDecision::Approve,
            ReviewAction::Disapprove { .. } => ReviewDecision::Disapprove,
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            ReviewAction::Approve { selector } | ReviewAction::Disapprove { selector } => selector,
        }
    }
}
