use serde::Serialize;
use std::fmt;

/// Whether the feed is pressurized.
///
/// Switching is instantaneous and lossless: the particle system simply stops (or starts)
/// applying the pressure-driven acceleration on the next tick, and statistics only see the
/// mode through the energy term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatingMode {
    #[default]
    Idle,
    Running,
}

impl OperatingMode {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, OperatingMode::Running)
    }

    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            OperatingMode::Idle => OperatingMode::Running,
            OperatingMode::Running => OperatingMode::Idle,
        }
    }

    pub fn status_label(self) -> &'static str {
        match self {
            OperatingMode::Idle => "SYSTEM IDLE",
            OperatingMode::Running => "SYSTEM PRESSURIZED",
        }
    }
}

impl From<bool> for OperatingMode {
    fn from(running: bool) -> Self {
        if running {
            OperatingMode::Running
        } else {
            OperatingMode::Idle
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_idle() {
        assert_eq!(OperatingMode::default(), OperatingMode::Idle);
        assert!(!OperatingMode::default().is_running());
    }

    #[test]
    fn toggle_alternates_between_modes() {
        let mut mode = OperatingMode::Idle;
        mode.toggle();
        assert_eq!(mode, OperatingMode::Running);
        mode.toggle();
        assert_eq!(mode, OperatingMode::Idle);
    }

    #[test]
    fn status_labels_match_indicator_text() {
        assert_eq!(OperatingMode::Idle.to_string(), "SYSTEM IDLE");
        assert_eq!(OperatingMode::Running.to_string(), "SYSTEM PRESSURIZED");
    }

    #[test]
    fn from_bool_maps_running_flag() {
        assert_eq!(OperatingMode::from(true), OperatingMode::Running);
        assert_eq!(OperatingMode::from(false), OperatingMode::Idle);
    }
}
