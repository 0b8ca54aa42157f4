pub mod fsutils;
pub mod math;
