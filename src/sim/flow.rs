//! Water flow to thermal power conversion.

/// Thermal power carried by 1 L/min of water per kelvin of temperature rise (kW).
///
/// 4.18 kJ/(kg·K) × 1 kg/L ÷ 60 s/min.
pub const KW_PER_LPM_PER_K: f64 = 0.0697;

/// Delivered hot-water temperature used to size draws (°C).
pub const HOT_WATER_C: f64 = 45.0;

/// Mains cold-water temperature used to size draws (°C).
pub const COLD_WATER_C: f64 = 10.0;

/// Temperature rise applied to every draw event (°C).
pub const DRAW_DELTA_T_C: f64 = HOT_WATER_C - COLD_WATER_C;

/// Converts a flow rate and temperature rise into thermal power.
///
/// A non-positive (or non-finite) `delta_t_c` returns exactly `0.0`, as does a
/// non-positive flow. Output is proportional to `flow_lpm`.
///
/// # Examples
///
/// ```
/// use heatsim::sim::flow::flow_to_kw;
///
/// assert!((flow_to_kw(4.0, 35.0) - 9.758).abs() < 1e-9);
/// assert_eq!(flow_to_kw(4.0, -5.0), 0.0);
/// ```
pub fn flow_to_kw(flow_lpm: f64, delta_t_c: f64) -> f64 {
    if !delta_t_c.is_finite() || delta_t_c <= 0.0 || flow_lpm.is_nan() || flow_lpm <= 0.0 {
        return 0.0;
    }
    KW_PER_LPM_PER_K * flow_lpm * delta_t_c
}

/// Thermal power of a draw at the standard hot/cold reference pair.
pub fn draw_kw(flow_lpm: f64) -> f64 {
    flow_to_kw(flow_lpm, DRAW_DELTA_T_C)
}
