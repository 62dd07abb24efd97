use std::time::Duration;

use reqwest::{
    ClientBuilder,
    Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::prelude::*;

pub struct Client {
    client: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(base_url: Url, access_token: &str) -> Result<Self> {
        let headers = HeaderMap::from_iter([(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        )]);
        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Read an entity state as a number.
    #[instrument(skip_all, fields(entity_id = entity_id))]
    pub async fn get_numeric_state(&self, entity_id: &str) -> Result<f64> {
        let state: State = self
            .client
            .get(self.states_url(entity_id)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(state.value)
    }

    /// Create or update a read-only sensor entity.
    #[instrument(skip_all, fields(entity_id = entity_id))]
    pub async fn set_numeric_state(
        &self,
        entity_id: &str,
        value: f64,
        unit_of_measurement: &str,
        friendly_name: &str,
    ) -> Result {
        let payload = StateUpdate {
            state: format!("{value:.2}"),
            attributes: Attributes { unit_of_measurement, friendly_name },
        };
        self.client
            .post(self.states_url(entity_id)?)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Flip a switch entity.
    #[instrument(skip_all, fields(entity_id = entity_id, on = on))]
    pub async fn turn_switch(&self, entity_id: &str, on: bool) -> Result {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .extend(["api", "services", "switch", if on { "turn_on" } else { "turn_off" }]);
        self.client
            .post(url)
            .json(&ServiceCall { entity_id })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn states_url(&self, entity_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .extend(["api", "states", entity_id]);
        Ok(url)
    }
}

#[must_use]
#[serde_as]
#[derive(Deserialize)]
struct State {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(rename = "state")]
    value: f64,
}

#[derive(Serialize)]
struct StateUpdate<'a> {
    state: String,
    attributes: Attributes<'a>,
}

#[derive(Serialize)]
struct Attributes<'a> {
    unit_of_measurement: &'a str,
    friendly_name: &'a str,
}

#[derive(Serialize)]
struct ServiceCall<'a> {
    entity_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_state_ok() -> Result {
        // language=JSON
        const RESPONSE: &str = r#"
            {
                "entity_id": "input_number.heating_base_temperature",
                "state": "21.5",
                "attributes": {},
                "last_changed": "2026-01-15T06:00:00.326747+00:00",
                "last_updated": "2026-01-15T06:00:00.326747+00:00"
            }
        "#;
        let state = serde_json::from_str::<State>(RESPONSE)?;
        assert_eq!(state.value, 21.5);
        Ok(())
    }

    #[test]
    fn test_non_numeric_state_is_rejected() {
        // language=JSON
        const RESPONSE: &str = r#"{"state": "unavailable"}"#;
        assert!(serde_json::from_str::<State>(RESPONSE).is_err());
    }
}
