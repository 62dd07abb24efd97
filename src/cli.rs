mod control;
mod db;
mod decisions;
mod heartbeat;
mod home_assistant;
mod tick;

use clap::{Parser, Subcommand};

use crate::cli::{decisions::DecisionsArgs, tick::TickArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices, decide, and steer the heating.
    #[clap(name = "tick")]
    Tick(Box<TickArgs>),

    /// Inspect the decision journal.
    #[clap(name = "decisions")]
    Decisions(Box<DecisionsArgs>),
}
