use clap::Parser;
use reqwest::Url;

use crate::{
    api::home_assistant::Client,
    core::engine::Action,
    prelude::*,
    quantity::temperature::Celsius,
};

#[derive(Parser)]
pub struct HomeAssistantArgs {
    #[clap(long = "ha-url", env = "HA_URL")]
    url: Url,

    #[clap(long = "ha-token", env = "HA_API_TOKEN")]
    token: String,

    /// `input_number` entity overriding the configured base temperature.
    #[clap(long, env = "BASE_TEMPERATURE_INPUT")]
    base_temperature_input: Option<String>,

    /// Read-only sensor entity the computed setpoint is published to.
    #[clap(long, env = "SETPOINT_OUTPUT")]
    setpoint_output: Option<String>,

    /// Switch blocking the central heating. The switch is inverted: ON
    /// means blocked.
    #[clap(long, env = "CENTRAL_HEATING_SHUTOFF_SWITCH")]
    central_heating_switch: Option<String>,
}

impl HomeAssistantArgs {
    pub fn new_client(&self) -> Result<Client> {
        Client::new(self.url.clone(), &self.token)
    }

    /// Resolve the base temperature from the override input, falling back
    /// on errors.
    pub async fn base_temperature(&self, client: &Client, fallback: Celsius) -> Celsius {
        let Some(entity_id) = &self.base_temperature_input else {
            return fallback;
        };
        match client.get_numeric_state(entity_id).await {
            Ok(value) => Celsius(value),
            Err(error) => {
                warn!("failed to read the base temperature, using the fallback: {error:#}");
                fallback
            }
        }
    }

    /// Publish the setpoint and steer the shutoff switch.
    ///
    /// Steering failures are warnings: the decision has already been made
    /// and must still be recorded.
    pub async fn apply(&self, client: &Client, setpoint: Celsius, action: Action) {
        if let Some(entity_id) = &self.setpoint_output
            && let Err(error) = client
                .set_numeric_state(entity_id, setpoint.0, "°C", "Calculated heating setpoint")
                .await
        {
            warn!("failed to publish the setpoint: {error:#}");
        }
        if let Some(entity_id) = &self.central_heating_switch
            && let Err(error) = client.turn_switch(entity_id, action == Action::Block).await
        {
            warn!("failed to steer the shutoff switch: {error:#}");
        }
    }
}
