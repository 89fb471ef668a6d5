pub mod geographic;
pub mod landmark;
