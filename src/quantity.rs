#[macro_use]
pub mod macros;

pub mod price;
pub mod temperature;
