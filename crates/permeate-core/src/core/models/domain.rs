use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Which side of the membrane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Feed,
    Permeate,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Feed => "feed",
            Side::Permeate => "permeate",
        }
    }
}

/// The rectangular feed/permeate region split by a vertical membrane plane.
///
/// Dimensions are validated by `Domain::new`, which lives next to the other boundary
/// checks in [`crate::engine::config`]. The membrane always sits at `width / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    width: f64,
    height: f64,
}

impl Domain {
    pub(crate) const fn new_unchecked(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn membrane_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn side_of(&self, x: f64) -> Side {
        if x < self.membrane_x() {
            Side::Feed
        } else {
            Side::Permeate
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
