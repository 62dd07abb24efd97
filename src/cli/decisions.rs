use chrono::NaiveDate;
use clap::Parser;

use crate::{cli::db::DbArgs, prelude::*, tables::build_decisions_table};

#[derive(Parser)]
pub struct DecisionsArgs {
    /// Only entries of this local calendar date.
    #[clap(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// At most this many entries, most recent first.
    #[clap(long)]
    limit: Option<usize>,

    #[clap(flatten)]
    db: DbArgs,
}

impl DecisionsArgs {
    pub fn run(self) -> Result {
        let decisions = self.db.open().query(self.date, self.limit)?;
        info!(len = decisions.len(), "queried the journal");
        println!("{}", build_decisions_table(&decisions));
        Ok(())
    }
}
