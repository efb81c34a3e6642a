//! thrustdb builds a canonical JSON database of rocket-motor
//! specifications from the ThrustCurve catalog API: fetch the listings,
//! normalize the vendor-supplied fields (most notably the free-form
//! ejection-delay strings), reconcile thrust curves, and emit one sorted
//! motor array.

pub mod clients;
pub mod config;
pub mod corrections;
pub mod delays;
pub mod domain;
pub mod errors;
pub mod services;
pub mod utils;
