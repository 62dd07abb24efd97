use crate::{
    prelude::*,
    quantity::{price::KilowattHourPrice, temperature::Celsius},
};

/// Linear mapping from a spot price to a setpoint offset.
///
/// The offset runs from `+variation` at a zero price down to `-variation` at
/// the high threshold, crossing zero halfway in between. Prices outside the
/// range are clamped, never rejected.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct SetpointCurve {
    high: KilowattHourPrice,
    variation: Celsius,
}

impl SetpointCurve {
    pub fn try_new(high: KilowattHourPrice, variation: Celsius) -> Result<Self> {
        ensure!(
            high > KilowattHourPrice::zero(),
            "the high price threshold must be positive, got {high}",
        );
        ensure!(
            variation >= Celsius::zero(),
            "the temperature variation must not be negative, got {variation}",
        );
        Ok(Self { high, variation })
    }

    pub fn offset(&self, price: KilowattHourPrice) -> Celsius {
        let clamped = price.0.clamp(0.0, self.high.0);
        Celsius(self.variation.0 * (1.0 - 2.0 * clamped / self.high.0))
    }

    pub fn setpoint(&self, base: Celsius, price: KilowattHourPrice) -> Celsius {
        base + self.offset(price)
    }
}
