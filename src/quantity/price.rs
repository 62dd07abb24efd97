quantity!(KilowattHourPrice, "c/kWh", 2);

impl KilowattHourPrice {
    /// The price feed publishes EUR per kilowatt-hour.
    pub fn from_euros(euros: f64) -> Self {
        Self(100.0 * euros)
    }
}
