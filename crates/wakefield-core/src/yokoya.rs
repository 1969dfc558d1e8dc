//! Yokoya Geometry Factors
//!
//! A wake source's transverse effect splits among the dipolar and
//! quadrupolar planes according to the symmetry of the beam-pipe cross
//! section. For an axisymmetric (circular) chamber the whole effect is
//! dipolar; between parallel plates the azimuthal symmetry is broken and
//! part of the kick becomes quadrupolar, with different horizontal and
//! vertical weights.
//!
//! ```text
//!   geometry          dip_x     dip_y     quad_x    quad_y
//!   circular          1         1         0         0
//!   parallel plates   π²/24     π²/12    -π²/24     π²/24
//! ```
//!
//! A plane enters a model's dispatch table only when its factor is
//! nonzero, so a circular chamber never produces quadrupolar entries.

use crate::types::WakePlane;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The five geometry weights applied to a wake source's raw wake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YokoyaFactors {
    /// Weight of the horizontal dipolar wake.
    pub dipole_x: f64,
    /// Weight of the vertical dipolar wake.
    pub dipole_y: f64,
    /// Weight of the horizontal quadrupolar wake.
    pub quadrupole_x: f64,
    /// Weight of the vertical quadrupolar wake.
    pub quadrupole_y: f64,
    /// Weight of the longitudinal wake.
    pub longitudinal: f64,
}

impl YokoyaFactors {
    /// Factors for an axisymmetric circular chamber.
    pub const fn circular() -> Self {
        Self {
            dipole_x: 1.0,
            dipole_y: 1.0,
            quadrupole_x: 0.0,
            quadrupole_y: 0.0,
            longitudinal: 0.0,
        }
    }

    /// Factors for a chamber of two horizontal parallel plates.
    pub fn parallel_plates() -> Self {
        Self {
            dipole_x: PI * PI / 24.0,
            dipole_y: PI * PI / 12.0,
            quadrupole_x: -PI * PI / 24.0,
            quadrupole_y: PI * PI / 24.0,
            longitudinal: 0.0,
        }
    }

    /// Circular factors with a longitudinal component enabled.
    pub const fn circular_with_longitudinal(longitudinal: f64) -> Self {
        Self {
            dipole_x: 1.0,
            dipole_y: 1.0,
            quadrupole_x: 0.0,
            quadrupole_y: 0.0,
            longitudinal,
        }
    }

    /// The weight for a given plane.
    pub fn factor(&self, plane: WakePlane) -> f64 {
        match plane {
            WakePlane::DipoleX => self.dipole_x,
            WakePlane::DipoleY => self.dipole_y,
            WakePlane::QuadrupoleX => self.quadrupole_x,
            WakePlane::QuadrupoleY => self.quadrupole_y,
            WakePlane::Longitudinal => self.longitudinal,
        }
    }

    /// Planes whose weight is nonzero, in dispatch order.
    pub fn nonzero_planes(&self) -> impl Iterator<Item = WakePlane> + '_ {
        WakePlane::ALL
            .into_iter()
            .filter(|&plane| self.factor(plane) != 0.0)
    }

    /// Transverse planes whose weight is nonzero, in dispatch order.
    pub fn nonzero_transverse_planes(&self) -> impl Iterator<Item = WakePlane> + '_ {
        WakePlane::TRANSVERSE
            .into_iter()
            .filter(|&plane| self.factor(plane) != 0.0)
    }
}
