//! Timeline driver: steps the envelope and the heat source through one day.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::devices::{HeatSource, Plant, StepDemand, SystemConfig};

use super::clock::{StepClock, StepWindow};
use super::envelope::Envelope;
use super::event::DrawEvent;
use super::schedule::OccupancySchedule;
use super::supply_path::{SupplyPath, resolve_dhw};
use super::types::{BuildingInput, DT_HOURS, SOLVER_STEPS, STEP_MINUTES, SimState, StepRecord};

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverInput {
    pub building: BuildingInput,
    pub system: SystemConfig,
    pub draws: Vec<DrawEvent>,
    pub supply_path: SupplyPath,
    pub occupancy: OccupancySchedule,
}

/// Per-step output of a run as parallel arrays.
///
/// The first seven arrays are the solver's result; the remaining ones carry
/// the detail needed to rebuild a [`StepRecord`] per step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    /// Room temperature at the end of each step (°C).
    pub room_temp_c: Vec<f64>,
    /// Heat delivered, space plus water (kW).
    pub heat_delivered_kw: Vec<f64>,
    /// Heat demanded, space plus DHW thermal load (kW).
    pub heat_demand_kw: Vec<f64>,
    /// Efficiency, or COP for heat pumps.
    pub efficiency: Vec<f64>,
    /// Fuel or electrical input (kW).
    pub input_power_kw: Vec<f64>,
    /// Cylinder reserve or on-demand service level (0–100).
    pub dhw_reserve_pct: Vec<f64>,
    /// Unmet DHW load while a draw is running (kW).
    pub dhw_shortfall_kw: Vec<f64>,
    /// Setpoint in force (°C).
    pub setpoint_c: Vec<f64>,
    /// Part of the delivered heat that went into the room (kW).
    pub space_delivered_kw: Vec<f64>,
    /// DHW thermal load after the supply-path policy (kW).
    pub dhw_load_kw: Vec<f64>,
    /// Fraction of each step with a hot draw running (0–1).
    pub dhw_active_fraction: Vec<f64>,
}

impl Timeline {
    fn with_capacity(n: usize) -> Self {
        Self {
            room_temp_c: Vec::with_capacity(n),
            heat_delivered_kw: Vec::with_capacity(n),
            heat_demand_kw: Vec::with_capacity(n),
            efficiency: Vec::with_capacity(n),
            input_power_kw: Vec::with_capacity(n),
            dhw_reserve_pct: Vec::with_capacity(n),
            dhw_shortfall_kw: Vec::with_capacity(n),
            setpoint_c: Vec::with_capacity(n),
            space_delivered_kw: Vec::with_capacity(n),
            dhw_load_kw: Vec::with_capacity(n),
            dhw_active_fraction: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, r: &StepRecord) {
        self.room_temp_c.push(r.room_temp_c);
        self.heat_delivered_kw.push(r.heat_delivered_kw);
        self.heat_demand_kw.push(r.heat_demand_kw);
        self.efficiency.push(r.efficiency);
        self.input_power_kw.push(r.input_power_kw);
        self.dhw_reserve_pct.push(r.dhw_reserve_pct);
        self.dhw_shortfall_kw.push(r.dhw_shortfall_kw);
        self.setpoint_c.push(r.setpoint_c);
        self.space_delivered_kw.push(r.space_delivered_kw);
        self.dhw_load_kw.push(r.dhw_load_kw);
        self.dhw_active_fraction.push(r.dhw_active_fraction);
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.room_temp_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.room_temp_c.is_empty()
    }

    /// The record for step `t`, if it exists.
    pub fn record(&self, t: usize) -> Option<StepRecord> {
        if t >= self.len() {
            return None;
        }
        Some(StepRecord {
            step: t,
            time_hr: f64::from(t as u32 * STEP_MINUTES) / 60.0,
            setpoint_c: self.setpoint_c[t],
            room_temp_c: self.room_temp_c[t],
            heat_demand_kw: self.heat_demand_kw[t],
            heat_delivered_kw: self.heat_delivered_kw[t],
            space_delivered_kw: self.space_delivered_kw[t],
            dhw_load_kw: self.dhw_load_kw[t],
            dhw_active_fraction: self.dhw_active_fraction[t],
            efficiency: self.efficiency[t],
            input_power_kw: self.input_power_kw[t],
            dhw_reserve_pct: self.dhw_reserve_pct[t],
            dhw_shortfall_kw: self.dhw_shortfall_kw[t],
        })
    }

    /// Row view of every step.
    pub fn records(&self) -> Vec<StepRecord> {
        (0..self.len()).filter_map(|t| self.record(t)).collect()
    }

    /// Iterates over all eleven arrays, for whole-timeline checks.
    pub fn series(&self) -> [(&'static str, &[f64]); 11] {
        [
            ("room_temp_c", self.room_temp_c.as_slice()),
            ("heat_delivered_kw", self.heat_delivered_kw.as_slice()),
            ("heat_demand_kw", self.heat_demand_kw.as_slice()),
            ("efficiency", self.efficiency.as_slice()),
            ("input_power_kw", self.input_power_kw.as_slice()),
            ("dhw_reserve_pct", self.dhw_reserve_pct.as_slice()),
            ("dhw_shortfall_kw", self.dhw_shortfall_kw.as_slice()),
            ("setpoint_c", self.setpoint_c.as_slice()),
            ("space_delivered_kw", self.space_delivered_kw.as_slice()),
            ("dhw_load_kw", self.dhw_load_kw.as_slice()),
            ("dhw_active_fraction", self.dhw_active_fraction.as_slice()),
        ]
    }
}

/// Simulation driver owning the plant, the envelope and the run state.
///
/// The solver is deterministic: the same input always produces the same
/// timeline, bit for bit.
pub struct Solver {
    input: SolverInput,
    plant: Plant,
    envelope: Envelope,
    state: SimState,
}

impl Solver {
    /// Prepares a run. Nothing is simulated until [`Solver::run`].
    pub fn new(input: SolverInput) -> Self {
        let b = &input.building;
        if b.tau_hours.is_nan() || b.tau_hours <= 0.0 {
            warn!(
                tau_hours = b.tau_hours,
                floor = b.effective_tau_hours(),
                "non-positive time constant, using floor"
            );
        }
        if !(input.system.max_kw.is_finite() && input.system.max_kw >= 0.0) {
            warn!(max_kw = input.system.max_kw, "invalid capacity, plant will deliver no heat");
        }

        let plant = Plant::from_config(&input.system);
        let envelope = Envelope::new(&input.building);
        let state = SimState::new(input.building.setpoint_home_c);
        Self {
            input,
            plant,
            envelope,
            state,
        }
    }

    /// Executes one step and returns its record.
    pub fn step(&mut self, window: StepWindow) -> StepRecord {
        let setpoint_c = self
            .input
            .occupancy
            .setpoint_c(&self.input.building, window.start_minute);

        // 1. Demand from the temperature at the start of the step
        let space_kw = self
            .envelope
            .space_demand_kw(self.state.room_temp_c, setpoint_c);
        let dhw = resolve_dhw(window.index, &self.input.draws, self.input.supply_path);

        // 2. Dispatch
        let demand = StepDemand {
            space_kw,
            dhw_kw: dhw.thermal_kw,
            dhw_rate_kw: dhw.rate_kw,
            dhw_fraction: dhw.active_fraction,
            outdoor_c: self.input.building.outdoor_c,
            dt_hours: DT_HOURS,
        };
        let dispatch = self.plant.dispatch(&demand, &mut self.state);

        // 3. Only space heat reaches the room
        self.state.room_temp_c = self
            .envelope
            .advance(self.state.room_temp_c, dispatch.space_kw);

        trace!(
            step = window.index,
            room_c = self.state.room_temp_c,
            space_kw,
            dhw_kw = dhw.thermal_kw,
            delivered_kw = dispatch.delivered_kw(),
            input_kw = dispatch.input_kw,
            "step"
        );

        StepRecord {
            step: window.index,
            time_hr: window.time_hr(),
            setpoint_c,
            room_temp_c: self.state.room_temp_c,
            heat_demand_kw: demand.total_kw(),
            heat_delivered_kw: dispatch.delivered_kw(),
            space_delivered_kw: dispatch.space_kw,
            dhw_load_kw: dhw.thermal_kw,
            dhw_active_fraction: dhw.active_fraction,
            efficiency: dispatch.efficiency,
            input_power_kw: dispatch.input_kw,
            dhw_reserve_pct: dispatch.service_pct,
            dhw_shortfall_kw: dispatch.shortfall_kw,
        }
    }

    /// Simulates the whole day from the initial state.
    pub fn run(&mut self) -> Timeline {
        self.state = SimState::new(self.input.building.setpoint_home_c);
        let mut timeline = Timeline::with_capacity(SOLVER_STEPS);
        StepClock::day().run(|window| {
            let record = self.step(window);
            timeline.push(&record);
        });

        debug!(
            family = self.plant.family(),
            supply_path = %self.input.supply_path,
            steps = timeline.len(),
            delivered_kwh = timeline.heat_delivered_kw.iter().sum::<f64>() * DT_HOURS,
            input_kwh = timeline.input_power_kw.iter().sum::<f64>() * DT_HOURS,
            "run complete"
        );
        timeline
    }

    /// The run's input.
    pub fn input(&self) -> &SolverInput {
        &self.input
    }

    /// The instantiated heat source.
    pub fn plant(&self) -> &Plant {
        &self.plant
    }
}

/// Runs one day with the default occupancy schedule.
///
/// # Examples
///
/// ```
/// use heatsim::devices::{BuildContext, SystemKind, build_system_config};
/// use heatsim::sim::engine::simulate;
/// use heatsim::sim::supply_path::SupplyPath;
/// use heatsim::sim::types::BuildingInput;
///
/// let building = BuildingInput::new(8.0, 35.0);
/// let system = build_system_config(SystemKind::Combi, 8.0, &BuildContext::default());
/// let timeline = simulate(&building, &system, &[], SupplyPath::HotWaterSystem);
/// assert_eq!(timeline.len(), 96);
/// ```
pub fn simulate(
    building: &BuildingInput,
    system: &SystemConfig,
    draws: &[DrawEvent],
    supply_path: SupplyPath,
) -> Timeline {
    Solver::new(SolverInput {
        building: building.clone(),
        system: system.clone(),
        draws: draws.to_vec(),
        supply_path,
        occupancy: OccupancySchedule::default(),
    })
    .run()
}
