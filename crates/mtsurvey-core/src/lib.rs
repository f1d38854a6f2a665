pub mod coerce;
pub mod error;
pub mod metadata;
pub mod mirror;
pub mod scaffold;
pub mod session;
