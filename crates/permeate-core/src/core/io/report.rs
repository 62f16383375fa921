use crate::core::transport::statistics::{DisplayStatistics, Statistics};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// The operating point a report was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OperatingPoint {
    pub pressure_psi: f64,
    pub pore_diameter_nm: f64,
    pub running: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Report<'a> {
    operating_point: OperatingPoint,
    display: DisplayStatistics,
    statistics: &'a Statistics,
}

pub fn to_toml_string(point: OperatingPoint, stats: &Statistics) -> Result<String, ReportError> {
    let report = Report {
        operating_point: point,
        display: stats.display(),
        statistics: stats,
    };
    Ok(toml::to_string(&report)?)
}

pub fn write_to_path(
    point: OperatingPoint,
    stats: &Statistics,
    path: &Path,
) -> Result<(), ReportError> {
    let content = to_toml_string(point, stats)?;
    std::fs::write(path, content).map_err(|e| ReportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
