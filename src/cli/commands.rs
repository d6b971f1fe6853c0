use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "headlines")]
#[command(about = "Watch a feed and report only the headlines that are new")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll a feed and print new headlines, remembering what was seen across restarts
    Run {
        /// Cache key for this feed (a short name)
        #[arg(short, long)]
        name: String,

        /// Feed URL to poll
        #[arg(short, long)]
        url: String,

        /// Identify entries by headline text instead of link
        #[arg(long)]
        headline_as_id: bool,

        /// Seconds to wait between polls
        #[arg(long, default_value_t = 300)]
        interval: u64,

        /// Number of polls before exiting (0 polls forever)
        #[arg(long, default_value_t = 1)]
        polls: u64,
    },

    /// Compare two saved payloads and print the headlines that are new in the second
    Diff {
        /// Payload treated as the restart baseline
        baseline: String,

        /// Payload checked for new headlines
        current: String,

        /// Identify entries by headline text instead of link
        #[arg(long)]
        headline_as_id: bool,

        /// Print new headlines as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print every headline of a saved payload together with its identity
    Show {
        /// Path to a feed payload
        path: String,

        /// Identify entries by headline text instead of link
        #[arg(long)]
        headline_as_id: bool,
    },
}
