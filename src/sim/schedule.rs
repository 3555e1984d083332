//! Occupancy schedule: which setpoint applies at each time of day.

use serde::{Deserialize, Serialize};

use super::types::BuildingInput;

/// A `[start_minute, end_minute)` window of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteWindow(pub u32, pub u32);

impl MinuteWindow {
    /// Returns `true` when `minute` lies in the window.
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.0 && minute < self.1
    }
}

/// Home/away schedule for one day.
///
/// A step is "away" when its start minute falls in any of the away windows;
/// every other step uses the home setpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OccupancySchedule {
    /// Unoccupied windows.
    pub away: Vec<MinuteWindow>,
}

impl Default for OccupancySchedule {
    /// Out from 08:00 to 16:00.
    fn default() -> Self {
        Self {
            away: vec![MinuteWindow(8 * 60, 16 * 60)],
        }
    }
}

impl OccupancySchedule {
    /// A schedule with nobody ever away.
    pub fn always_home() -> Self {
        Self { away: Vec::new() }
    }

    /// Whether the dwelling is occupied at `minute`.
    pub fn is_home(&self, minute: u32) -> bool {
        !self.away.iter().any(|w| w.contains(minute))
    }

    /// Setpoint in force at `minute`.
    pub fn setpoint_c(&self, building: &BuildingInput, minute: u32) -> f64 {
        if self.is_home(minute) {
            building.setpoint_home_c
        } else {
            building.setpoint_away_c
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_away_during_working_hours() {
        let schedule = OccupancySchedule::default();
        assert!(schedule.is_home(7 * 60));
        assert!(!schedule.is_home(8 * 60));
        assert!(!schedule.is_home(16 * 60 - 1));
        assert!(schedule.is_home(16 * 60));
    }

    #[test]
    fn setpoint_follows_occupancy() {
        let building = BuildingInput::default();
        let schedule = OccupancySchedule::default();
        assert_eq!(schedule.setpoint_c(&building, 0), 21.0);
        assert_eq!(schedule.setpoint_c(&building, 12 * 60), 16.0);
    }

    #[test]
    fn always_home_never_uses_away_setpoint() {
        let building = BuildingInput::default();
        let schedule = OccupancySchedule::always_home();
        assert!((0..1440).all(|m| schedule.setpoint_c(&building, m) == 21.0));
    }
}
