//! HUD contract
//!
//! Formatting the HUD shows for time, energy and score. Colors are the
//! shell's business; only the band thresholds live here.

use serde::Serialize;

use crate::sim::GameState;

/// Energy bar band: `> 60` high, `> 30` medium, otherwise low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBand {
    High,
    Medium,
    Low,
}

impl EnergyBand {
    pub fn for_energy(energy: u32) -> Self {
        if energy > 60 {
            EnergyBand::High
        } else if energy > 30 {
            EnergyBand::Medium
        } else {
            EnergyBand::Low
        }
    }

    /// CSS class suffix used by the page stylesheet
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyBand::High => "high",
            EnergyBand::Medium => "medium",
            EnergyBand::Low => "low",
        }
    }
}

/// `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Everything the HUD displays, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub time: String,
    pub energy: u32,
    /// Bar fill, 0..=100
    pub energy_percent: u32,
    pub energy_band: EnergyBand,
    pub score: u64,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let max = u64::from(state.settings.max_energy.max(1));
        let percent = u64::from(state.energy).min(max) * 100 / max;
        Self {
            time: format_time(state.remaining_seconds()),
            energy: state.energy,
            energy_percent: percent as u32,
            energy_band: EnergyBand::for_energy(state.energy),
            score: state.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(120), "02:00");
        assert_eq!(format_time(119), "01:59");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(9), "00:09");
        assert_eq!(format_time(0), "00:00");
    }

    #[test]
    fn test_energy_band_thresholds() {
        assert_eq!(EnergyBand::for_energy(100), EnergyBand::High);
        assert_eq!(EnergyBand::for_energy(61), EnergyBand::High);
        assert_eq!(EnergyBand::for_energy(60), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_energy(31), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_energy(30), EnergyBand::Low);
        assert_eq!(EnergyBand::for_energy(0), EnergyBand::Low);
    }

    #[test]
    fn test_hud_view() {
        let mut state = GameState::new(1, Settings::default());
        state.start_round(1);
        state.energy = 40;
        state.score = 130;
        let hud = HudView::from_state(&state);
        assert_eq!(hud.time, "02:00");
        assert_eq!(hud.energy_percent, 40);
        assert_eq!(hud.energy_band, EnergyBand::Medium);
        assert_eq!(hud.score, 130);
    }

    #[test]
    fn test_hud_percent_with_large_energy_cap() {
        let settings = Settings {
            max_energy: 100_000_000,
            ..Settings::default()
        };
        let mut state = GameState::new(1, settings);
        state.start_round(1);
        state.energy = 50_000_000;
        assert_eq!(HudView::from_state(&state).energy_percent, 50);
        state.energy = 100_000_000;
        assert_eq!(HudView::from_state(&state).energy_percent, 100);
    }
}
