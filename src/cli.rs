use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// deploy-relay — Vercel deployment notifications for Discord
#[derive(Parser)]
#[command(name = "deploy-relay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind (defaults to RELAY_PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the Discord payload a deployment event would produce, without sending it
    Preview {
        /// Path to a deployment event JSON file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}
