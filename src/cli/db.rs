use std::path::PathBuf;

use clap::Parser;

use crate::db::DecisionLog;

#[derive(Parser)]
pub struct DbArgs {
    /// Decision journal location.
    #[clap(long = "decision-log", env = "DECISION_LOG_PATH", default_value = "data/decisions.jsonl")]
    path: PathBuf,
}

impl DbArgs {
    pub fn open(&self) -> DecisionLog {
        DecisionLog::at(self.path.clone())
    }
}
