use crate::core::models::ion::IonSpecies;
use crate::core::models::particle::Frame;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct TrajectoryRecord {
    tick: u64,
    index: usize,
    species: IonSpecies,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    side: &'static str,
}

/// Writes frames as CSV with the header `tick,index,species,x,y,vx,vy,side`.
///
/// `index` is the particle's position within its frame, which is stable across frames of
/// one run since particles are never removed individually.
pub fn write_to<W: Write>(frames: &[Frame], writer: W) -> Result<usize, TrajectoryError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for frame in frames {
        for (index, p) in frame.particles.iter().enumerate() {
            csv_writer.serialize(TrajectoryRecord {
                tick: frame.tick,
                index,
                species: p.species,
                x: p.x,
                y: p.y,
                vx: p.vx,
                vy: p.vy,
                side: p.side.as_str(),
            })?;
            rows += 1;
        }
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

pub fn write_to_path(frames: &[Frame], path: &Path) -> Result<usize, TrajectoryError> {
    let file = File::create(path).map_err(|e| TrajectoryError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_to(frames, file)
}
