//! Tracking Driver and Collaborator Contracts
//!
//! The wake models in this crate only map separations to amplitudes; the
//! bunch and slicing data structures live in the tracking application.
//! This module defines the two collaborator contracts and a driver that
//! connects them to a wake source's dispatch table:
//!
//! ```text
//! track() → update slices → slice statistics → per-plane wake function
//!         → per-slice convolved kick → bunch momentum update
//! ```
//!
//! The kick on slice i is the wake superposition over all source slices,
//!
//! ```text
//!   kick_i = Σ_j q_j · W(z_i − z_j)
//! ```
//!
//! where q_j is the slice population (charge) and W the plane's wake
//! function. Causality is the wake function's job: W vanishes for
//! separations where the witness leads the source, so leading slices
//! receive nothing from trailing ones.
//!
//! Wake evaluations are cached per `track` call in a [`SliceWakeMemo`]
//! keyed by slice index, not by raw coordinate. After discretization many
//! slice pairs share the same separation, and float-keyed caches are
//! fragile under floating-point noise; indexing by slice avoids both
//! problems. The memo is rebuilt whenever the slicer refreshes.

use crate::types::WakePlane;
use crate::wake_source::{WakeFunction, WakeFunctionMap, WakeSource, WakeSourceKind};

/// Per-slice first and zeroth moments delivered by the slicer.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceStatistics {
    /// Mean longitudinal position of each slice [m], tail to head or head
    /// to tail; the driver does not assume an ordering.
    pub mean_z: Vec<f64>,
    /// Population (charge) of each slice [C].
    pub charge: Vec<f64>,
}

impl SliceStatistics {
    /// Number of slices.
    pub fn len(&self) -> usize {
        self.mean_z.len()
    }

    /// `true` when no slices are present.
    pub fn is_empty(&self) -> bool {
        self.mean_z.is_empty()
    }
}

/// Contract the tracked bunch must satisfy.
///
/// The bunch owns its particle arrays and momentum update; the driver only
/// reads beta and hands back per-slice kicks.
pub trait Bunch {
    /// Relativistic beta of the bunch, 0 < β ≤ 1.
    fn beta(&self) -> f64;

    /// Per-particle longitudinal coordinates [m].
    fn longitudinal_positions(&self) -> &[f64];

    /// Apply a per-slice transverse kick to the bunch's momenta.
    fn apply_transverse_kick(&mut self, plane: WakePlane, kick: &[f64]);

    /// Apply a per-slice longitudinal (energy) kick.
    fn apply_longitudinal_kick(&mut self, kick: &[f64]);
}

/// Contract the slicing collaborator must satisfy.
pub trait Slicer {
    /// Re-bin the bunch into slices.
    fn update_slices(&mut self, bunch: &dyn Bunch);

    /// Per-slice statistics for the current binning.
    fn compute_statistics(&self, bunch: &dyn Bunch) -> SliceStatistics;
}

/// Wake amplitudes evaluated on the full slice-separation matrix, keyed
/// by slice index.
///
/// Entry `(i, j)` holds `W(z_i − z_j)`. Built with one wake-function call
/// per witness slice so array-shaped models evaluate efficiently.
#[derive(Debug, Clone)]
pub struct SliceWakeMemo {
    values: Vec<f64>,
    n: usize,
}

impl SliceWakeMemo {
    /// Evaluate `wake` on every pairwise separation of `mean_z`.
    pub fn build(wake: &WakeFunction, beta: f64, mean_z: &[f64]) -> Self {
        let n = mean_z.len();
        let mut values = Vec::with_capacity(n * n);
        let mut dz = vec![0.0; n];
        for i in 0..n {
            for (j, slot) in dz.iter_mut().enumerate() {
                *slot = mean_z[i] - mean_z[j];
            }
            values.extend_from_slice(&wake(beta, &dz));
        }
        Self { values, n }
    }

    /// Number of slices the memo was built for.
    pub fn len(&self) -> usize {
        self.n
    }

    /// `true` when built for zero slices.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Wake amplitude for witness slice `i` and source slice `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Charge-weighted kick for every witness slice.
    pub fn convolve(&self, charge: &[f64]) -> Vec<f64> {
        debug_assert_eq!(charge.len(), self.n);
        (0..self.n)
            .map(|i| {
                let row = &self.values[i * self.n..(i + 1) * self.n];
                row.iter().zip(charge).map(|(w, q)| w * q).sum()
            })
            .collect()
    }
}

/// Drives one wake source against a bunch/slicer pair.
///
/// The dispatch table is built once at construction; `track` may be called
/// every turn. Single-threaded by design, the memo is owned per kicker.
pub struct WakeKicker {
    source: WakeSourceKind,
    functions: WakeFunctionMap,
}

impl WakeKicker {
    /// Build a kicker from any wake source.
    pub fn new(source: impl Into<WakeSourceKind>) -> Self {
        let source = source.into();
        let functions = source.wake_functions();
        Self { source, functions }
    }

    /// The wrapped wake source.
    pub fn source(&self) -> &WakeSourceKind {
        &self.source
    }

    /// Planes this kicker applies, in dispatch order.
    pub fn planes(&self) -> impl Iterator<Item = WakePlane> + '_ {
        self.functions.keys().copied()
    }

    /// Refresh the slicing, compute every plane's convolved kick and hand
    /// the kicks to the bunch's momentum-update interface.
    pub fn track(&self, bunch: &mut dyn Bunch, slicer: &mut dyn Slicer) {
        slicer.update_slices(bunch);
        let stats = slicer.compute_statistics(bunch);
        if stats.is_empty() {
            return;
        }
        let beta = bunch.beta();
        debug_assert!(beta > 0.0 && beta <= 1.0);

        for (plane, wake) in &self.functions {
            let memo = SliceWakeMemo::build(wake, beta, &stats.mean_z);
            let kick = memo.convolve(&stats.charge);
            if plane.is_transverse() {
                bunch.apply_transverse_kick(*plane, &kick);
            } else {
                bunch.apply_longitudinal_kick(&kick);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resonator::{Resonator, ResonatorModes};
    use std::collections::BTreeMap;

    struct FakeBunch {
        beta: f64,
        z: Vec<f64>,
        transverse_kicks: BTreeMap<WakePlane, Vec<f64>>,
        longitudinal_kicks: Vec<Vec<f64>>,
    }

    impl FakeBunch {
        fn new(z: Vec<f64>) -> Self {
            Self {
                beta: 1.0,
                z,
                transverse_kicks: BTreeMap::new(),
                longitudinal_kicks: Vec::new(),
            }
        }
    }

    impl Bunch for FakeBunch {
        fn beta(&self) -> f64 {
            self.beta
        }

        fn longitudinal_positions(&self) -> &[f64] {
            &self.z
        }

        fn apply_transverse_kick(&mut self, plane: WakePlane, kick: &[f64]) {
            self.transverse_kicks.insert(plane, kick.to_vec());
        }

        fn apply_longitudinal_kick(&mut self, kick: &[f64]) {
            self.longitudinal_kicks.push(kick.to_vec());
        }
    }

    /// One slice per particle, unit charge.
    struct FakeSlicer {
        updates: usize,
    }

    impl Slicer for FakeSlicer {
        fn update_slices(&mut self, _bunch: &dyn Bunch) {
            self.updates += 1;
        }

        fn compute_statistics(&self, bunch: &dyn Bunch) -> SliceStatistics {
            let mean_z = bunch.longitudinal_positions().to_vec();
            let charge = vec![1.0; mean_z.len()];
            SliceStatistics { mean_z, charge }
        }
    }

    fn resonator_kicker() -> WakeKicker {
        let res = Resonator::circular(ResonatorModes::single(10e6, 1e9, 5.0)).unwrap();
        WakeKicker::new(res)
    }

    #[test]
    fn test_track_refreshes_slices() {
        let kicker = resonator_kicker();
        let mut bunch = FakeBunch::new(vec![0.0, -0.1]);
        let mut slicer = FakeSlicer { updates: 0 };
        kicker.track(&mut bunch, &mut slicer);
        assert_eq!(slicer.updates, 1);
    }

    #[test]
    fn test_trailing_slice_only_receives_kick() {
        let kicker = resonator_kicker();
        // Head slice at z = 0, tail slice 0.1 m behind it.
        let mut bunch = FakeBunch::new(vec![0.0, -0.1]);
        let mut slicer = FakeSlicer { updates: 0 };
        kicker.track(&mut bunch, &mut slicer);

        let kick = &bunch.transverse_kicks[&WakePlane::DipoleX];
        assert_eq!(kick[0], 0.0);
        assert!(kick[1] != 0.0);
    }

    #[test]
    fn test_kick_scales_with_source_charge() {
        let kicker = resonator_kicker();
        let mut slicer = FakeSlicer { updates: 0 };

        let mut bunch = FakeBunch::new(vec![0.0, -0.1]);
        kicker.track(&mut bunch, &mut slicer);
        let single = bunch.transverse_kicks[&WakePlane::DipoleX][1];

        // Doubling every slice charge doubles the kick.
        struct DoubleSlicer;
        impl Slicer for DoubleSlicer {
            fn update_slices(&mut self, _bunch: &dyn Bunch) {}
            fn compute_statistics(&self, bunch: &dyn Bunch) -> SliceStatistics {
                let mean_z = bunch.longitudinal_positions().to_vec();
                let charge = vec![2.0; mean_z.len()];
                SliceStatistics { mean_z, charge }
            }
        }
        let mut bunch = FakeBunch::new(vec![0.0, -0.1]);
        kicker.track(&mut bunch, &mut DoubleSlicer);
        let doubled = bunch.transverse_kicks[&WakePlane::DipoleX][1];
        assert!((doubled - 2.0 * single).abs() < single.abs() * 1e-12);
    }

    #[test]
    fn test_empty_bunch_is_a_no_op() {
        let kicker = resonator_kicker();
        let mut bunch = FakeBunch::new(vec![]);
        let mut slicer = FakeSlicer { updates: 0 };
        kicker.track(&mut bunch, &mut slicer);
        assert!(bunch.transverse_kicks.is_empty());
        assert!(bunch.longitudinal_kicks.is_empty());
    }

    #[test]
    fn test_memo_matches_direct_evaluation() {
        let res = Resonator::circular(ResonatorModes::single(10e6, 1e9, 5.0)).unwrap();
        let table = res.wake_functions();
        let wake = &table[&WakePlane::DipoleX];
        let mean_z = [0.0, -0.05, -0.11];
        let memo = SliceWakeMemo::build(wake, 1.0, &mean_z);
        for i in 0..mean_z.len() {
            for j in 0..mean_z.len() {
                let direct = wake(1.0, &[mean_z[i] - mean_z[j]])[0];
                assert_eq!(memo.get(i, j), direct);
            }
        }
    }

    #[test]
    fn test_memo_diagonal_is_zero_for_transverse() {
        let kicker = resonator_kicker();
        let wake = &kicker.functions[&WakePlane::DipoleX];
        let memo = SliceWakeMemo::build(wake, 1.0, &[0.3, 0.1, -0.2]);
        for i in 0..3 {
            assert_eq!(memo.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_longitudinal_kick_routed_separately() {
        use crate::yokoya::YokoyaFactors;
        let res = Resonator::new(
            ResonatorModes::single(10e6, 1e9, 5.0),
            YokoyaFactors::circular_with_longitudinal(1.0),
        )
        .unwrap();
        let kicker = WakeKicker::new(res);
        let mut bunch = FakeBunch::new(vec![0.0, -0.1]);
        let mut slicer = FakeSlicer { updates: 0 };
        kicker.track(&mut bunch, &mut slicer);
        assert_eq!(bunch.longitudinal_kicks.len(), 1);
        // Self-wake at z = 0 contributes the half value to every slice.
        assert!(bunch.longitudinal_kicks[0].iter().all(|&k| k != 0.0));
    }
}
