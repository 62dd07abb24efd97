use chrono::{Local, Timelike};
use clap::Parser;
use reqwest::Url;

use crate::{
    api::spot_hinta,
    cli::{
        control::ControlArgs,
        db::DbArgs,
        heartbeat::HeartbeatArgs,
        home_assistant::HomeAssistantArgs,
    },
    core::{engine::DecisionEngine, series::QuarterIndex},
    prelude::*,
    tables::build_decisions_table,
};

#[derive(Parser)]
pub struct TickArgs {
    #[clap(long = "price-api-url", env = "SPOT_HINTA_API_URL", default_value = "https://api.spot-hinta.fi")]
    price_api_url: Url,

    /// Compute and record the decision without steering Home Assistant.
    #[clap(long)]
    scout: bool,

    #[clap(flatten)]
    control: ControlArgs,

    #[clap(flatten)]
    home_assistant: HomeAssistantArgs,

    #[clap(flatten)]
    db: DbArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl TickArgs {
    pub async fn run(self) -> Result {
        let result = self.execute().await;
        self.heartbeat.report(result.is_ok()).await;
        result
    }

    async fn execute(&self) -> Result {
        let curve = self.control.curve()?;
        let max_shutoff_quarters = self.control.max_shutoff_quarters()?;

        let now = Local::now().with_nanosecond(0).unwrap();
        let prices = spot_hinta::Api::new(self.price_api_url.clone())?;
        let series = prices.get_price_series(now.date_naive()).await?;
        info!(len = series.len(), "fetched the price series");

        let current_price = match prices.get_current_price().await {
            Ok(price) => price,
            Err(error) => {
                warn!("failed to fetch the current price, falling back to the series: {error:#}");
                series
                    .get(QuarterIndex::of(now))
                    .map(|point| point.price)
                    .context("the current price is unknown")?
            }
        };

        let home_assistant = self.home_assistant.new_client()?;
        let base_temperature =
            self.home_assistant.base_temperature(&home_assistant, self.control.base_temperature).await;
        let setpoint = curve.setpoint(base_temperature, current_price);
        info!(
            price = %current_price,
            base = %base_temperature,
            offset = %curve.offset(current_price),
            %setpoint,
            "computed the setpoint",
        );

        let decision = DecisionEngine::builder()
            .series(&series)
            .always_on_threshold(self.control.always_on_threshold)
            .max_shutoff_quarters(max_shutoff_quarters)
            .build()
            .decide(now, current_price);
        info!(action = %decision.action, reason = decision.reason.as_str(), "decided");

        if self.scout {
            info!("scouting, leaving Home Assistant untouched");
        } else {
            self.home_assistant.apply(&home_assistant, setpoint, decision.action).await;
        }

        // A storage hiccup must never block the control decision itself.
        let log = self.db.open();
        if let Err(error) = log.append(&decision).and_then(|()| log.rotate()) {
            warn!("failed to persist the decision: {error:#}");
        }

        println!("{}", build_decisions_table(std::slice::from_ref(&decision)));
        Ok(())
    }
}
