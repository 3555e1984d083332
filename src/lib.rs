//! Single-dwelling heat-source and hot-water dispatch simulator.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Heat sources, cylinder and system sizing.
pub mod devices;
pub mod io;
/// Envelope, draw resolution, timeline driver and KPIs.
pub mod sim;
