use crate::sim::flow::{DRAW_DELTA_T_C, KW_PER_LPM_PER_K};

/// Energy to raise one litre of water by one kelvin (kWh).
const KWH_PER_LITRE_K: f64 = KW_PER_LPM_PER_K / 60.0;

/// A stored hot-water cylinder that buffers draws against a finite source.
///
/// `Cylinder` models usable stored energy between the cold feed and the draw
/// temperature. Its reserve (0–100) is not held here: the timeline driver owns
/// it and passes it in each step.
///
/// # Flow Convention
/// - Draw load beyond the source's spare capacity drains the reserve
/// - Spare capacity left after the draw reheats the reserve towards 100
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Usable stored energy when full (kWh).
    pub capacity_kwh: f64,
}

/// Heat flows for one step of cylinder operation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CylinderFlow {
    /// Draw load met directly from spare source capacity (kW).
    pub direct_kw: f64,
    /// Source heat put back into the cylinder (kW).
    pub reheat_kw: f64,
    /// Draw load taken from storage (kW).
    pub drained_kw: f64,
}

impl CylinderFlow {
    /// Heat the source put into water this step (kW).
    pub fn source_kw(&self) -> f64 {
        self.direct_kw + self.reheat_kw
    }
}

impl Cylinder {
    /// Creates a cylinder holding `volume_l` litres between the cold feed and
    /// the draw temperature.
    pub fn from_volume_l(volume_l: f64) -> Self {
        let volume = if volume_l.is_finite() { volume_l.max(0.0) } else { 0.0 };
        Self {
            capacity_kwh: volume * KWH_PER_LITRE_K * DRAW_DELTA_T_C,
        }
    }

    /// Serves `dhw_kw` of draw for `dt_hours` with `spare_kw` of source
    /// capacity left after space heating, updating `reserve_pct` in place.
    ///
    /// Draw load is met from the source first; any remainder drains the
    /// reserve (floored at 0). Whatever spare capacity is left reheats the
    /// reserve (capped at 100).
    pub fn serve(
        &self,
        reserve_pct: &mut f64,
        dhw_kw: f64,
        spare_kw: f64,
        dt_hours: f64,
    ) -> CylinderFlow {
        let dhw_kw = dhw_kw.max(0.0);
        let spare_kw = spare_kw.max(0.0);
        let direct_kw = dhw_kw.min(spare_kw);
        let deficit_kw = dhw_kw - direct_kw;

        if self.capacity_kwh <= 0.0 || dt_hours <= 0.0 {
            if deficit_kw > 0.0 {
                *reserve_pct = 0.0;
            }
            return CylinderFlow {
                direct_kw,
                reheat_kw: 0.0,
                drained_kw: deficit_kw,
            };
        }

        // Drain for the part of the draw the source could not cover
        let mut drained_kw = 0.0;
        if deficit_kw > 0.0 {
            let available_kwh = *reserve_pct / 100.0 * self.capacity_kwh;
            let wanted_kwh = deficit_kw * dt_hours;
            if wanted_kwh >= available_kwh {
                drained_kw = available_kwh / dt_hours;
                *reserve_pct = 0.0;
            } else {
                drained_kw = deficit_kw;
                *reserve_pct -= wanted_kwh / self.capacity_kwh * 100.0;
                *reserve_pct = reserve_pct.clamp(0.0, 100.0);
            }
        }

        // Reheat with what is left
        let remaining_kw = (spare_kw - direct_kw).max(0.0);
        let headroom_kw = (100.0 - *reserve_pct) / 100.0 * self.capacity_kwh / dt_hours;
        let reheat_kw = if remaining_kw >= headroom_kw {
            *reserve_pct = 100.0;
            headroom_kw
        } else {
            *reserve_pct += remaining_kw * dt_hours / self.capacity_kwh * 100.0;
            *reserve_pct = reserve_pct.clamp(0.0, 100.0);
            remaining_kw
        };

        CylinderFlow {
            direct_kw,
            reheat_kw,
            drained_kw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_to_capacity() {
        // 150 L × 4.18 kJ/(kg·K) × 35 K ≈ 6.1 kWh
        let c = Cylinder::from_volume_l(150.0);
        assert!((c.capacity_kwh - 6.099).abs() < 0.01);
    }

    #[test]
    fn draw_within_spare_leaves_reserve_full() {
        let c = Cylinder::from_volume_l(150.0);
        let mut reserve = 100.0;
        let flow = c.serve(&mut reserve, 5.0, 8.0, 0.25);
        assert_eq!(flow.direct_kw, 5.0);
        assert_eq!(flow.reheat_kw, 0.0);
        assert_eq!(reserve, 100.0);
    }

    #[test]
    fn draw_beyond_spare_drains_reserve() {
        let c = Cylinder {
            capacity_kwh: 10.0,
        };
        let mut reserve = 100.0;
        // 12 kW draw, 4 kW spare, 0.25 h → 2 kWh from storage → 20 %
        let flow = c.serve(&mut reserve, 12.0, 4.0, 0.25);
        assert_eq!(flow.direct_kw, 4.0);
        assert!((flow.drained_kw - 8.0).abs() < 1e-12);
        assert!((reserve - 80.0).abs() < 1e-9);
    }

    #[test]
    fn reserve_never_goes_negative() {
        let c = Cylinder { capacity_kwh: 1.0 };
        let mut reserve = 50.0;
        let flow = c.serve(&mut reserve, 30.0, 0.0, 0.25);
        assert_eq!(reserve, 0.0);
        // Only the 0.5 kWh that was stored could be drawn
        assert!((flow.drained_kw - 2.0).abs() < 1e-12);
    }

    #[test]
    fn spare_capacity_reheats_up_to_full() {
        let c = Cylinder {
            capacity_kwh: 10.0,
        };
        let mut reserve = 90.0;
        // 1 kWh headroom, 8 kW spare for 0.25 h = 2 kWh available
        let flow = c.serve(&mut reserve, 0.0, 8.0, 0.25);
        assert!((flow.reheat_kw - 4.0).abs() < 1e-9);
        assert!((reserve - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_volume_cylinder_empties_on_any_deficit() {
        let c = Cylinder::from_volume_l(0.0);
        let mut reserve = 100.0;
        c.serve(&mut reserve, 5.0, 1.0, 0.25);
        assert_eq!(reserve, 0.0);
    }

    #[test]
    fn complete_drain_and_recover_cycle() {
        let c = Cylinder::from_volume_l(150.0);
        let mut reserve = 100.0;

        while reserve > 0.0 {
            c.serve(&mut reserve, 20.0, 0.0, 0.25);
        }

        let mut steps = 0;
        while reserve < 100.0 && steps < 100 {
            c.serve(&mut reserve, 0.0, 3.0, 0.25);
            steps += 1;
        }
        assert_eq!(reserve, 100.0);
        // 6.1 kWh at 0.75 kWh per step → 9 steps
        assert_eq!(steps, 9);
    }
}
