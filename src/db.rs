use std::{
    fs,
    io::Write as _,
    path::PathBuf,
};

use chrono::{Local, NaiveDate, TimeDelta};

use crate::{core::engine::Decision, prelude::*};

/// Append-only decision journal: newline-delimited JSON with a sliding
/// two-day retention window (today and yesterday).
#[must_use]
pub struct DecisionLog {
    path: PathBuf,
}

impl DecisionLog {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a single self-contained line and flush it before returning.
    #[instrument(skip_all)]
    pub fn append(&self, decision: &Decision) -> Result {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let mut line = serde_json::to_string(decision)?;
        line.push('\n');
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    /// Drop every entry whose local calendar date is older than yesterday.
    ///
    /// Rotating an already-clean journal is a no-op.
    #[instrument(skip_all)]
    pub fn rotate(&self) -> Result {
        self.rotate_at(Local::now().date_naive())
    }

    fn rotate_at(&self, today: NaiveDate) -> Result {
        if !self.path.is_file() {
            return Ok(());
        }
        let yesterday = today - TimeDelta::days(1);
        let mut buffer = String::new();
        for decision in self.read_all()? {
            if decision.timestamp.date_naive() >= yesterday {
                buffer.push_str(&serde_json::to_string(&decision)?);
                buffer.push('\n');
            }
        }
        // Rewrite through a staging file so that an interrupted rotation
        // never leaves a half-written journal behind.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, buffer)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Retained entries, most recent first.
    pub fn query(&self, date: Option<NaiveDate>, limit: Option<usize>) -> Result<Vec<Decision>> {
        if let Some(limit) = limit {
            ensure!(limit > 0, "the limit must be positive, got {limit}");
        }
        let mut decisions = self.read_all()?;
        decisions.reverse();
        if let Some(date) = date {
            decisions.retain(|decision| decision.timestamp.date_naive() == date);
        }
        if let Some(limit) = limit {
            decisions.truncate(limit);
        }
        Ok(decisions)
    }

    /// Entries in appended order, skipping malformed lines.
    fn read_all(&self) -> Result<Vec<Decision>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read `{}`", self.path.display()))?;
        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<Decision>(line) {
                Ok(decision) => Some(decision),
                Err(error) => {
                    warn!("skipping a malformed journal line: {error:#}");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use chrono::{DateTime, TimeZone};

    use super::*;
    use crate::{core::engine::Action, quantity::price::KilowattHourPrice};

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn decision(timestamp: DateTime<Local>, action: Action) -> Decision {
        Decision {
            timestamp,
            action,
            price: KilowattHourPrice(6.29),
            reason: "outside the blocked window (price 6.29 c/kWh)".to_string(),
            rank: None,
        }
    }

    fn journal() -> (tempfile::TempDir, DecisionLog) {
        let directory = tempfile::tempdir().unwrap();
        let log = DecisionLog::at(directory.path().join("decisions.jsonl"));
        (directory, log)
    }

    #[test]
    fn test_round_trips_appended_entries() -> Result {
        let (_directory, log) = journal();
        let decisions =
            vec![decision(at(15, 9), Action::Heat), decision(at(15, 10), Action::Block)];
        for decision in &decisions {
            log.append(decision)?;
        }
        let mut queried = log.query(None, None)?;
        queried.reverse();
        assert_eq!(queried, decisions);
        Ok(())
    }

    #[test]
    fn test_query_filters_by_date() -> Result {
        let (_directory, log) = journal();
        log.append(&decision(at(14, 23), Action::Heat))?;
        log.append(&decision(at(15, 9), Action::Block))?;
        let queried = log.query(Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()), None)?;
        assert_eq!(queried.len(), 1);
        assert_eq!(queried[0].timestamp, at(15, 9));
        Ok(())
    }

    #[test]
    fn test_query_limits_most_recent_first() -> Result {
        let (_directory, log) = journal();
        for hour in 9..13 {
            log.append(&decision(at(15, hour), Action::Heat))?;
        }
        let queried = log.query(None, Some(2))?;
        assert_eq!(queried.len(), 2);
        assert_eq!(queried[0].timestamp, at(15, 12));
        assert_eq!(queried[1].timestamp, at(15, 11));
        Ok(())
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let (_directory, log) = journal();
        assert!(log.query(None, Some(0)).is_err());
    }

    #[test]
    fn test_rotation_retains_two_days_and_is_idempotent() -> Result {
        let (_directory, log) = journal();
        for day in 11..=15 {
            log.append(&decision(at(day, 12), Action::Heat))?;
        }
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        log.rotate_at(today)?;
        let retained = log.query(None, None)?;
        assert_eq!(retained.len(), 2);
        assert!(retained.iter().all(|decision| decision.timestamp.date_naive()
            >= NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()));

        log.rotate_at(today)?;
        assert_eq!(log.query(None, None)?, retained);
        Ok(())
    }

    #[test]
    fn test_malformed_lines_are_skipped() -> Result {
        let (_directory, log) = journal();
        log.append(&decision(at(15, 9), Action::Heat))?;
        {
            let mut file = fs::OpenOptions::new().append(true).open(&log.path)?;
            writeln!(file, "not json")?;
        }
        log.append(&decision(at(15, 10), Action::Block))?;
        assert_eq!(log.query(None, None)?.len(), 2);
        Ok(())
    }
}
