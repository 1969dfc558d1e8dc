//! Resistive-Wall Wake Model
//!
//! Short-range transverse wake of a beam pipe with finite wall
//! conductivity. The classic thick-wall result scales as 1/sqrt(-z)
//! behind the source:
//!
//! ```text
//!   W(z) = -βc · Z0·L / (π b³) · sqrt(λ / (π·(-z)))     for z < -dz_min
//!   λ    = 1 / (Z0·σ)        skin-depth length scale
//! ```
//!
//! with pipe radius b, wall length L and conductivity σ. The formula is
//! singular at z = 0, so evaluation is gated by a regularization distance
//! `dz_min`: everything at or above -dz_min (including the whole
//! non-causal region z > 0) evaluates to exactly 0. No longitudinal
//! plane is modeled.
//!
//! ## Example
//!
//! ```rust
//! use wakefield_core::resistive_wall::{ResistiveWall, ResistiveWallConfig};
//!
//! let wall = ResistiveWall::circular(ResistiveWallConfig {
//!     pipe_radius: 0.02,
//!     length: 100.0,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let w = wall.wake_transverse(1.0, &[-0.5, 0.0, 0.5]);
//! assert!(w[0] < 0.0);          // decelerating behind the source
//! assert_eq!(w[1], 0.0);        // regularized band
//! assert_eq!(w[2], 0.0);        // non-causal region
//! ```

use crate::types::{WakeError, WakeResult, SPEED_OF_LIGHT, VACUUM_IMPEDANCE};
use crate::wake_source::{WakeFunction, WakeFunctionMap, WakeSource};
use crate::yokoya::YokoyaFactors;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometry and material parameters of a resistive wall section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistiveWallConfig {
    /// Pipe radius b [m].
    pub pipe_radius: f64,
    /// Length of the resistive section [m].
    pub length: f64,
    /// Wall conductivity σ [1/(Ω·m)].
    pub conductivity: f64,
    /// Regularization distance around the z = 0 singularity [m]. The wake
    /// is forced to 0 for z ≥ -dz_min.
    pub dz_min: f64,
}

impl Default for ResistiveWallConfig {
    fn default() -> Self {
        Self {
            pipe_radius: 0.05,
            length: 1.0,
            // Graphite-coated chamber value used by the HEADTAIL family.
            conductivity: 5.4e17,
            dz_min: 1e-4,
        }
    }
}

/// Resistive-wall wake source with Yokoya geometry weighting.
///
/// Transverse planes only: the longitudinal resistive-wall response is not
/// modeled, so the longitudinal Yokoya factor is ignored.
#[derive(Debug, Clone)]
pub struct ResistiveWall {
    config: ResistiveWallConfig,
    yokoya: YokoyaFactors,
}

impl ResistiveWall {
    /// Build a resistive wall from explicit parameters and Yokoya factors.
    ///
    /// Fails if any of radius, length, conductivity or `dz_min` is
    /// non-positive.
    pub fn new(config: ResistiveWallConfig, yokoya: YokoyaFactors) -> WakeResult<Self> {
        for (name, value) in [
            ("pipe_radius", config.pipe_radius),
            ("length", config.length),
            ("conductivity", config.conductivity),
            ("dz_min", config.dz_min),
        ] {
            if value <= 0.0 {
                return Err(WakeError::NonPositiveParameter { name, value });
            }
        }
        Ok(Self { config, yokoya })
    }

    /// Resistive wall of an axisymmetric circular chamber.
    pub fn circular(config: ResistiveWallConfig) -> WakeResult<Self> {
        Self::new(config, YokoyaFactors::circular())
    }

    /// Resistive wall of a chamber of two horizontal parallel plates.
    pub fn parallel_plates(config: ResistiveWallConfig) -> WakeResult<Self> {
        Self::new(config, YokoyaFactors::parallel_plates())
    }

    /// The configured parameters.
    pub fn config(&self) -> &ResistiveWallConfig {
        &self.config
    }

    /// The configured geometry factors.
    pub fn yokoya(&self) -> &YokoyaFactors {
        &self.yokoya
    }

    /// Short-range transverse wake, without Yokoya weighting [V/C/m].
    ///
    /// Strictly negative for z < -dz_min, exactly 0 elsewhere. The gate
    /// keeps the singular band |z| ≤ dz_min out of the square root, so no
    /// evaluation can produce a NaN.
    pub fn wake_transverse(&self, beta: f64, z: &[f64]) -> Vec<f64> {
        debug_assert!(beta > 0.0 && beta <= 1.0);
        let b = self.config.pipe_radius;
        let lambda = 1.0 / (VACUUM_IMPEDANCE * self.config.conductivity);
        let scale = beta * SPEED_OF_LIGHT * VACUUM_IMPEDANCE * self.config.length
            / (PI * b * b * b);
        z.iter()
            .map(|&z| {
                if z < -self.config.dz_min {
                    // -z > 0 here, the argument of the root is positive.
                    -scale * (lambda / (PI * (-z))).sqrt()
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl WakeSource for ResistiveWall {
    /// One entry per transverse plane with a nonzero Yokoya factor.
    fn wake_functions(&self) -> WakeFunctionMap {
        let mut map = WakeFunctionMap::new();
        for plane in self.yokoya.nonzero_transverse_planes() {
            let weight = self.yokoya.factor(plane);
            let model = self.clone();
            let function: WakeFunction = Box::new(move |beta, z| {
                let mut w = model.wake_transverse(beta, z);
                for v in &mut w {
                    *v *= weight;
                }
                w
            });
            map.insert(plane, function);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WakePlane;

    fn wall() -> ResistiveWall {
        ResistiveWall::circular(ResistiveWallConfig {
            pipe_radius: 0.02,
            length: 50.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_zero_in_regularized_band_and_ahead() {
        let w = wall();
        let dz = w.config().dz_min;
        let out = w.wake_transverse(1.0, &[-dz, -dz / 2.0, 0.0, dz, 1.0]);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_strictly_negative_behind_source() {
        let w = wall();
        let out = w.wake_transverse(1.0, &[-0.001, -0.1, -10.0]);
        assert!(out.iter().all(|&v| v < 0.0));
        assert!(out.iter().all(|&v| v.is_finite()));
    }

    #[test]
    fn test_inverse_sqrt_scaling() {
        let w = wall();
        let out = w.wake_transverse(1.0, &[-0.01, -0.04]);
        // W(z) ∝ 1/sqrt(-z), so quadrupling the distance halves the wake.
        let ratio = out[0] / out[1];
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_radius_cubed_scaling() {
        let near = ResistiveWall::circular(ResistiveWallConfig {
            pipe_radius: 0.02,
            ..Default::default()
        })
        .unwrap();
        let wide = ResistiveWall::circular(ResistiveWallConfig {
            pipe_radius: 0.04,
            ..Default::default()
        })
        .unwrap();
        let z = [-0.1];
        let ratio = near.wake_transverse(1.0, &z)[0] / wide.wake_transverse(1.0, &z)[0];
        assert!((ratio - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_conductivity_rejected() {
        let config = ResistiveWallConfig {
            conductivity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ResistiveWall::circular(config),
            Err(WakeError::NonPositiveParameter {
                name: "conductivity",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let config = ResistiveWallConfig {
            pipe_radius: -0.01,
            ..Default::default()
        };
        assert!(ResistiveWall::circular(config).is_err());
    }

    #[test]
    fn test_dispatch_has_no_longitudinal_entry() {
        let circular = wall().wake_functions();
        assert_eq!(
            circular.keys().copied().collect::<Vec<_>>(),
            vec![WakePlane::DipoleX, WakePlane::DipoleY]
        );

        let plates = ResistiveWall::parallel_plates(ResistiveWallConfig::default())
            .unwrap()
            .wake_functions();
        assert_eq!(
            plates.keys().copied().collect::<Vec<_>>(),
            WakePlane::TRANSVERSE.to_vec()
        );
    }

    #[test]
    fn test_parallel_plates_weighting() {
        let w = ResistiveWall::parallel_plates(ResistiveWallConfig::default()).unwrap();
        let table = w.wake_functions();
        let z = [-0.2];
        let raw = w.wake_transverse(1.0, &z)[0];
        let dip_y = table[&WakePlane::DipoleY](1.0, &z)[0];
        assert!((dip_y - PI * PI / 12.0 * raw).abs() < raw.abs() * 1e-12);
    }
}
