//! Broad-Band Resonator Wake Model
//!
//! Closed-form wake functions for a sum of RLC resonator impedance modes,
//! following Chao's resonator model (eq. 2.82 family). Each mode is the
//! impulse response of a damped oscillator characterized by its shunt
//! impedance R, resonant frequency f_r, and quality factor Q:
//!
//! ```text
//!   ω  = 2π f_r            angular resonant frequency
//!   α  = ω / (2Q)          damping rate
//!   ω̄  = sqrt(|ω² - α²|)   shifted oscillation frequency
//! ```
//!
//! The oscillator regime branches on Q:
//!
//! - Q > 0.5: underdamped, the wake rings (`sin`/`cos` forms)
//! - Q = 0.5: critically damped, the oscillatory factor degenerates to `t`
//! - Q < 0.5: overdamped, hyperbolic forms (`sinh`/`cosh`)
//!
//! Causality: the wake acts only behind the source (z ≤ 0 with the beam
//! travelling towards positive z). Transverse wakes vanish at z = 0; the
//! longitudinal wake takes half its limiting value there (beam-loading
//! theorem).
//!
//! ## Example
//!
//! ```rust
//! use wakefield_core::resonator::{Resonator, ResonatorModes};
//!
//! // A single 1 GHz mode in a circular chamber
//! let modes = ResonatorModes::single(10e6, 1e9, 10.0);
//! let res = Resonator::circular(modes).unwrap();
//!
//! // The transverse wake vanishes at the source and ahead of it
//! let w = res.wake_transverse(1.0, &[0.0, 0.5]);
//! assert_eq!(w, vec![0.0, 0.0]);
//!
//! // and is finite behind it
//! let w = res.wake_transverse(1.0, &[-0.3]);
//! assert!(w[0].abs() > 0.0);
//! ```

use crate::types::{WakeError, WakePlane, WakeResult, SPEED_OF_LIGHT};
use crate::wake_source::{WakeFunction, WakeFunctionMap, WakeSource};
use crate::yokoya::YokoyaFactors;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mode parameter table for a multi-mode resonator.
///
/// The three arrays are parallel: mode `i` is `(r_shunt[i], frequency[i],
/// q[i])`. Shunt impedance is in Ω/m for transverse use and Ω for
/// longitudinal use; frequency in Hz; Q dimensionless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonatorModes {
    /// Shunt impedance per mode [Ω or Ω/m].
    pub r_shunt: Vec<f64>,
    /// Resonant frequency per mode [Hz].
    pub frequency: Vec<f64>,
    /// Quality factor per mode.
    pub q: Vec<f64>,
}

impl ResonatorModes {
    /// Parameter table for a single mode.
    pub fn single(r_shunt: f64, frequency: f64, q: f64) -> Self {
        Self {
            r_shunt: vec![r_shunt],
            frequency: vec![frequency],
            q: vec![q],
        }
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.q.len()
    }

    /// `true` when no modes are configured.
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Iterate over `(r_shunt, frequency, q)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.r_shunt
            .iter()
            .zip(&self.frequency)
            .zip(&self.q)
            .map(|((&r, &f), &q)| (r, f, q))
    }

    fn validate(&self) -> WakeResult<()> {
        if self.r_shunt.len() != self.frequency.len() || self.frequency.len() != self.q.len() {
            return Err(WakeError::ModeLengthMismatch {
                r: self.r_shunt.len(),
                f: self.frequency.len(),
                q: self.q.len(),
            });
        }
        for &f in &self.frequency {
            if f <= 0.0 {
                return Err(WakeError::NonPositiveParameter {
                    name: "frequency",
                    value: f,
                });
            }
        }
        for &q in &self.q {
            if q <= 0.0 {
                return Err(WakeError::NonPositiveParameter { name: "Q", value: q });
            }
        }
        Ok(())
    }
}

/// Multi-mode resonator wake source with Yokoya geometry weighting.
#[derive(Debug, Clone)]
pub struct Resonator {
    modes: ResonatorModes,
    yokoya: YokoyaFactors,
}

impl Resonator {
    /// Build a resonator from a mode table and explicit Yokoya factors.
    ///
    /// Fails if the mode arrays differ in length or any frequency or Q is
    /// non-positive.
    pub fn new(modes: ResonatorModes, yokoya: YokoyaFactors) -> WakeResult<Self> {
        modes.validate()?;
        Ok(Self { modes, yokoya })
    }

    /// Resonator in an axisymmetric circular chamber (pure dipolar wake).
    pub fn circular(modes: ResonatorModes) -> WakeResult<Self> {
        Self::new(modes, YokoyaFactors::circular())
    }

    /// Resonator between horizontal parallel plates.
    pub fn parallel_plates(modes: ResonatorModes) -> WakeResult<Self> {
        Self::new(modes, YokoyaFactors::parallel_plates())
    }

    /// The configured mode table.
    pub fn modes(&self) -> &ResonatorModes {
        &self.modes
    }

    /// The configured geometry factors.
    pub fn yokoya(&self) -> &YokoyaFactors {
        &self.yokoya
    }

    /// Summed transverse wake of all modes, without Yokoya weighting.
    ///
    /// `z` is the witness position relative to the source [m], negative
    /// behind the source; `beta` the relativistic beta of the beam.
    /// Returns one amplitude per input element [V/C/m].
    pub fn wake_transverse(&self, beta: f64, z: &[f64]) -> Vec<f64> {
        debug_assert!(beta > 0.0 && beta <= 1.0);
        z.iter()
            .map(|&z| {
                self.modes
                    .iter()
                    .map(|(r, f, q)| transverse_mode_wake(r, f, q, beta, z))
                    .sum()
            })
            .collect()
    }

    /// Summed longitudinal wake of all modes, without Yokoya weighting.
    ///
    /// Full value behind the source, half value at z = 0 (beam-loading
    /// theorem), zero ahead of it. Returns [V/C].
    pub fn wake_longitudinal(&self, beta: f64, z: &[f64]) -> Vec<f64> {
        debug_assert!(beta > 0.0 && beta <= 1.0);
        z.iter()
            .map(|&z| {
                self.modes
                    .iter()
                    .map(|(r, f, q)| longitudinal_mode_wake(r, f, q, beta, z))
                    .sum()
            })
            .collect()
    }

    /// Longitudinal impedance spectrum Z∥(f) of the summed modes [Ω].
    ///
    /// Z∥(f) = Σ R / (1 + iQ(f_r/f − f/f_r)); on resonance each mode
    /// contributes exactly its shunt impedance. Zero at f = 0.
    pub fn impedance_longitudinal(&self, f: f64) -> Complex64 {
        if f == 0.0 {
            return Complex64::new(0.0, 0.0);
        }
        self.modes
            .iter()
            .map(|(r, fr, q)| {
                Complex64::new(r, 0.0) / Complex64::new(1.0, q * (fr / f - f / fr))
            })
            .sum()
    }

    /// Transverse impedance spectrum Z⊥(f) of the summed modes [Ω/m].
    ///
    /// Z⊥(f) = Σ (f_r/f)·R / (1 + iQ(f_r/f − f/f_r)). Zero at f = 0.
    pub fn impedance_transverse(&self, f: f64) -> Complex64 {
        if f == 0.0 {
            return Complex64::new(0.0, 0.0);
        }
        self.modes
            .iter()
            .map(|(r, fr, q)| {
                Complex64::new(fr / f * r, 0.0) / Complex64::new(1.0, q * (fr / f - f / fr))
            })
            .sum()
    }
}

impl WakeSource for Resonator {
    /// One entry per plane with a nonzero Yokoya factor; each function is
    /// the summed mode wake scaled by that factor.
    fn wake_functions(&self) -> WakeFunctionMap {
        let mut map = WakeFunctionMap::new();
        for plane in self.yokoya.nonzero_planes() {
            let weight = self.yokoya.factor(plane);
            let model = self.clone();
            let function: WakeFunction = if plane == WakePlane::Longitudinal {
                Box::new(move |beta, z| {
                    let mut w = model.wake_longitudinal(beta, z);
                    for v in &mut w {
                        *v *= weight;
                    }
                    w
                })
            } else {
                Box::new(move |beta, z| {
                    let mut w = model.wake_transverse(beta, z);
                    for v in &mut w {
                        *v *= weight;
                    }
                    w
                })
            };
            map.insert(plane, function);
        }
        map
    }
}

/// Transverse wake of a single mode at separation `z` [V/C/m].
///
/// z > 0 (witness ahead of source) is clipped to zero time of flight, so
/// the non-causal region evaluates to exactly 0, as does z = 0.
fn transverse_mode_wake(r_shunt: f64, frequency: f64, q: f64, beta: f64, z: f64) -> f64 {
    let omega = 2.0 * PI * frequency;
    let alpha = omega / (2.0 * q);
    let omegabar = (omega * omega - alpha * alpha).abs().sqrt();
    let t = z.min(0.0) / (beta * SPEED_OF_LIGHT);
    if q > 0.5 {
        r_shunt * omega * omega / (q * omegabar) * (alpha * t).exp() * (omegabar * t).sin()
    } else if q == 0.5 {
        r_shunt * omega * omega / q * (alpha * t).exp() * t
    } else {
        r_shunt * omega * omega / (q * omegabar) * (alpha * t).exp() * (omegabar * t).sinh()
    }
}

/// Longitudinal wake of a single mode at separation `z` [V/C].
///
/// The causal gate is 2 behind the source, 1 at z = 0 (half of the
/// limiting value, beam-loading theorem) and 0 ahead of it.
fn longitudinal_mode_wake(r_shunt: f64, frequency: f64, q: f64, beta: f64, z: f64) -> f64 {
    let gate = if z < 0.0 {
        2.0
    } else if z == 0.0 {
        1.0
    } else {
        return 0.0;
    };
    let omega = 2.0 * PI * frequency;
    let alpha = omega / (2.0 * q);
    let omegabar = (omega * omega - alpha * alpha).abs().sqrt();
    let t = z.min(0.0) / (beta * SPEED_OF_LIGHT);
    let envelope = if q > 0.5 {
        (omegabar * t).cos() + alpha / omegabar * (omegabar * t).sin()
    } else if q == 0.5 {
        1.0 + alpha * t
    } else {
        (omegabar * t).cosh() + alpha / omegabar * (omegabar * t).sinh()
    };
    gate * r_shunt * alpha * (alpha * t).exp() * envelope
}
