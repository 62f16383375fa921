use permeate::core::models::domain::Domain;
use permeate::core::models::solutes::SoluteProfile;
use permeate::engine::config::FiltrationConfig;
use permeate::workflows::simulate::SimulationOptions;

/// Values used when neither the config file, `--set` nor a flag provides one.
pub struct DefaultsConfig {
    pub pressure: f64,
    pub pore_diameter: f64,
    pub solutes: SoluteProfile,
    pub width: f64,
    pub height: f64,
    pub ticks: u64,
    pub frame_interval: u64,
    pub running: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let filtration = FiltrationConfig::default();
        let domain = Domain::default();
        let options = SimulationOptions::default();
        Self {
            pressure: filtration.pressure_psi(),
            pore_diameter: filtration.pore_diameter_nm(),
            solutes: filtration.solutes().clone(),
            width: domain.width(),
            height: domain.height(),
            ticks: options.ticks,
            frame_interval: options.frame_interval,
            running: options.mode.is_running(),
        }
    }
}
