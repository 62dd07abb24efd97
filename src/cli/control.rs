use clap::Parser;

use crate::{
    core::setpoint::SetpointCurve,
    prelude::*,
    quantity::{price::KilowattHourPrice, temperature::Celsius},
};

#[derive(Parser)]
pub struct ControlArgs {
    /// Fallback base temperature when no override input is configured or
    /// reachable.
    #[clap(long, env = "BASE_TEMPERATURE", default_value = "21.0")]
    pub base_temperature: Celsius,

    /// Maximum symmetric setpoint swing around the base temperature.
    #[clap(long, env = "TEMP_VARIATION", default_value = "0.5")]
    temp_variation: Celsius,

    /// Labeled anchor where the price-to-offset curve crosses zero.
    #[clap(long, env = "PRICE_LOW_THRESHOLD", default_value = "10.0")]
    price_low_threshold: KilowattHourPrice,

    /// Price at which the offset bottoms out at the negative variation.
    #[clap(long, env = "PRICE_HIGH_THRESHOLD", default_value = "20.0")]
    price_high_threshold: KilowattHourPrice,

    /// Below this price the heating is always permitted to run.
    #[clap(long, env = "PRICE_ALWAYS_ON_THRESHOLD", default_value = "5.0")]
    pub always_on_threshold: KilowattHourPrice,

    /// Daily cap on blocked hours.
    #[clap(long, env = "MAX_SHUTOFF_HOURS", default_value = "6.0")]
    max_shutoff_hours: f64,
}

impl ControlArgs {
    pub fn curve(&self) -> Result<SetpointCurve> {
        let curve = SetpointCurve::try_new(self.price_high_threshold, self.temp_variation)?;
        if (2.0 * self.price_low_threshold.0 - self.price_high_threshold.0).abs() > f64::EPSILON {
            warn!(
                low = %self.price_low_threshold,
                high = %self.price_high_threshold,
                "the low anchor is off the curve's zero crossing",
            );
        }
        Ok(curve)
    }

    pub fn max_shutoff_quarters(&self) -> Result<usize> {
        ensure!(
            self.max_shutoff_hours >= 0.0,
            "the shutoff cap must not be negative, got {}",
            self.max_shutoff_hours,
        );
        Ok((self.max_shutoff_hours * 4.0) as usize)
    }
}
