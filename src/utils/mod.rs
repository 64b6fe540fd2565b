//! Small HTTP helpers shared by the API and web layers.

pub mod cookie;
pub mod flags;
