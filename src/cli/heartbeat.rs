use std::time::Duration;

use clap::Parser;
use reqwest::{Client, Url};

use crate::prelude::*;

/// Dead-man's-switch ping: the monitor hears about completed ticks at the
/// configured URL and about aborted ones at its `/fail` path.
#[derive(Parser)]
pub struct HeartbeatArgs {
    #[clap(long = "heartbeat-url", env = "HEALTHCHECK_URL")]
    pub url: Option<Url>,
}

impl HeartbeatArgs {
    /// Report the tick's outcome, swallowing ping failures.
    pub async fn report(&self, success: bool) {
        if let Some(url) = &self.url
            && let Err(error) = Self::ping(url, success).await
        {
            warn!("failed to report to the healthcheck: {error:#}");
        }
    }

    #[instrument(skip_all, fields(success = success))]
    async fn ping(url: &Url, success: bool) -> Result {
        info!("pinging the healthcheck…");
        Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?
            .get(outcome_url(url, success)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn outcome_url(url: &Url, success: bool) -> Result<Url> {
    if success {
        return Ok(url.clone());
    }
    let mut url = url.clone();
    url.path_segments_mut().map_err(|()| anyhow!("invalid heartbeat URL"))?.push("fail");
    Ok(url)
}
