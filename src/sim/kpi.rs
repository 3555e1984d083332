//! Post-hoc KPI computation from a simulated timeline.

use std::fmt;

use serde::Serialize;

use crate::devices::SystemConfig;
use crate::devices::boiler::is_cycling;

use super::engine::Timeline;
use super::types::DT_HOURS;

/// Aggregate key performance indicators for one simulated day.
///
/// Computed from the [`Timeline`] arrays so reported metrics always agree
/// with the per-step data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Heat delivered over the day (kWh).
    pub delivered_kwh: f64,
    /// Fuel or electricity consumed over the day (kWh).
    pub input_kwh: f64,
    /// Delivered over input; a daily COP for heat pumps.
    pub seasonal_efficiency: f64,
    /// Coldest end-of-step room temperature (°C).
    pub min_room_temp_c: f64,
    /// Warmest end-of-step room temperature (°C).
    pub max_room_temp_c: f64,
    /// Largest single-step input (kW).
    pub peak_input_kw: f64,
    /// Steps firing below minimum modulation.
    pub cycling_steps: usize,
    /// Hot water demanded but not delivered (kWh).
    pub unmet_dhw_kwh: f64,
    /// Lowest cylinder reserve or service level seen (0–100).
    pub min_dhw_reserve_pct: f64,
}

impl KpiReport {
    /// Computes all KPIs from a complete timeline.
    ///
    /// `system` supplies the minimum modulation used to count cycling steps.
    pub fn from_timeline(timeline: &Timeline, system: &SystemConfig) -> Self {
        if timeline.is_empty() {
            return Self {
                delivered_kwh: 0.0,
                input_kwh: 0.0,
                seasonal_efficiency: 0.0,
                min_room_temp_c: 0.0,
                max_room_temp_c: 0.0,
                peak_input_kw: 0.0,
                cycling_steps: 0,
                unmet_dhw_kwh: 0.0,
                min_dhw_reserve_pct: 0.0,
            };
        }

        let delivered_kwh = timeline.heat_delivered_kw.iter().sum::<f64>() * DT_HOURS;
        let input_kwh = timeline.input_power_kw.iter().sum::<f64>() * DT_HOURS;
        // Shortfall is a running rate, so weight it by how long the draws ran
        let unmet_dhw_kwh = timeline
            .dhw_shortfall_kw
            .iter()
            .zip(&timeline.dhw_active_fraction)
            .map(|(kw, fraction)| kw * fraction)
            .sum::<f64>()
            * DT_HOURS;

        let min_room_temp_c = timeline
            .room_temp_c
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let max_room_temp_c = timeline
            .room_temp_c
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let peak_input_kw = timeline.input_power_kw.iter().copied().fold(0.0, f64::max);
        let min_dhw_reserve_pct = timeline
            .dhw_reserve_pct
            .iter()
            .copied()
            .fold(100.0, f64::min);

        let cycling_steps = if system.is_combustion() {
            timeline
                .heat_delivered_kw
                .iter()
                .filter(|&&kw| is_cycling(kw, system.min_kw))
                .count()
        } else {
            0
        };

        let seasonal_efficiency = if input_kwh > 0.0 {
            delivered_kwh / input_kwh
        } else {
            0.0
        };

        Self {
            delivered_kwh,
            input_kwh,
            seasonal_efficiency,
            min_room_temp_c,
            max_room_temp_c,
            peak_input_kw,
            cycling_steps,
            unmet_dhw_kwh,
            min_dhw_reserve_pct,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Heat delivered:        {:.2} kWh", self.delivered_kwh)?;
        writeln!(f, "Energy input:          {:.2} kWh", self.input_kwh)?;
        writeln!(f, "Seasonal efficiency:   {:.3}", self.seasonal_efficiency)?;
        writeln!(
            f,
            "Room temperature:      {:.2} to {:.2} °C",
            self.min_room_temp_c, self.max_room_temp_c
        )?;
        writeln!(f, "Peak input:            {:.2} kW", self.peak_input_kw)?;
        writeln!(f, "Cycling steps:         {}", self.cycling_steps)?;
        writeln!(f, "Unmet hot water:       {:.2} kWh", self.unmet_dhw_kwh)?;
        write!(f, "Min DHW reserve:       {:.1}%", self.min_dhw_reserve_pct)
    }
}
