//! Command-line argument definitions

use chamber_domain::{AgentRole, VoteDecision};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "star-chamber",
    version,
    about = "Threshold authorization for high-risk actions"
)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Explicit configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip configuration files and use built-in defaults
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the active policy table
    Policies,

    /// Resolve an action type to its governing policy
    Resolve {
        /// Action type tag (unknown tags resolve to the default policy)
        action_type: String,
    },

    /// Open a chamber session and adjudicate ballots from a JSON file
    Adjudicate {
        /// Unique token for the gated action
        #[arg(long)]
        action_id: String,

        /// Action type tag, resolved against the policy table
        #[arg(long)]
        action_type: String,

        /// What the gated action will do
        #[arg(long)]
        description: String,

        /// Consensus window override in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// JSON array of ballots:
        /// [{"role": "...", "decision": "...", "rationale": "...", "confidence": 0.9}]
        #[arg(long)]
        ballots: PathBuf,
    },
}

/// One ballot read from the adjudication file
#[derive(Debug, Clone, Deserialize)]
pub struct BallotEntry {
    pub role: AgentRole,
    pub decision: VoteDecision,
    #[serde(default)]
    pub rationale: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}
