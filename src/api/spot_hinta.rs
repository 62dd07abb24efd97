use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use reqwest::Url;
use serde::Deserialize;

use crate::{
    core::series::{PricePoint, PriceSeries},
    prelude::*,
    quantity::price::KilowattHourPrice,
};

pub struct Api {
    client: reqwest::Client,
    base_url: Url,
}

impl Api {
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch the published quarter-hour prices and keep the given day's.
    ///
    /// The feed also carries the day ahead once published; callers pass the
    /// day they are ranking.
    #[instrument(skip_all)]
    pub async fn get_price_series(&self, on: NaiveDate) -> Result<PriceSeries> {
        info!(?on, "fetching…");
        let url = self.base_url.join("TodayAndDayForward")?;
        let items: Vec<PriceItem> =
            self.client.get(url).send().await?.error_for_status()?.json().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.timestamp.date_naive() == on)
            .map(|item| item.to_point())
            .collect())
    }

    /// Fetch the price of the running quarter.
    #[instrument(skip_all)]
    pub async fn get_current_price(&self) -> Result<KilowattHourPrice> {
        let url = self.base_url.join("JustNow")?;
        let item: PriceItem =
            self.client.get(url).send().await?.error_for_status()?.json().await?;
        Ok(item.to_point().price)
    }
}

#[derive(Deserialize)]
struct PriceItem {
    #[serde(rename = "DateTime")]
    timestamp: DateTime<Local>,

    /// EUR per kilowatt-hour.
    #[serde(rename = "PriceNoTax")]
    price_no_tax: f64,
}

impl PriceItem {
    fn to_point(&self) -> PricePoint {
        PricePoint::new(self.timestamp, KilowattHourPrice::from_euros(self.price_no_tax))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::series::QuarterIndex;

    #[test]
    fn test_deserialize_price_items_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            [
                {
                    "Rank": 34,
                    "DateTime": "2026-03-01T13:15:00+02:00",
                    "PriceNoTax": 0.1234,
                    "PriceWithTax": 0.1530
                },
                {
                    "Rank": 1,
                    "DateTime": "2026-03-02T19:00:00+02:00",
                    "PriceNoTax": 0.0421,
                    "PriceWithTax": 0.0522
                }
            ]
        "#;
        let items = serde_json::from_str::<Vec<PriceItem>>(RESPONSE)?;
        assert_eq!(items.len(), 2);
        let point = items[0].to_point();
        assert_relative_eq!(point.price.0, 12.34);
        assert_eq!(
            point.timestamp,
            DateTime::parse_from_rfc3339("2026-03-01T13:15:00+02:00")?,
        );
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_get_price_series_ok() -> Result {
        let api = Api::new(Url::parse("https://api.spot-hinta.fi")?)?;
        let series = api.get_price_series(Local::now().date_naive()).await?;
        assert!(!series.is_empty());
        assert!(series.len() <= QuarterIndex::PER_DAY);
        Ok(())
    }
}
