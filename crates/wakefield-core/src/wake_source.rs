//! Wake Source Dispatch
//!
//! Every wake model produces the same thing: a dispatch table mapping a
//! [`WakePlane`] to a callable wake function. The tracking loop walks the
//! table and never needs to know which model built it.
//!
//! The set of models is closed by design. There are exactly three:
//! resonator, resistive wall and tabulated wake, and [`WakeSourceKind`]
//! enumerates them so heterogeneous source lists need no trait-object
//! boxing.
//!
//! ## Example
//!
//! ```rust
//! use wakefield_core::resonator::{Resonator, ResonatorModes};
//! use wakefield_core::wake_source::WakeSource;
//! use wakefield_core::types::WakePlane;
//!
//! let res = Resonator::circular(ResonatorModes::single(1e6, 2e9, 4.0)).unwrap();
//! let table = res.wake_functions();
//! let wake = &table[&WakePlane::DipoleX];
//! let w = wake(1.0, &[-0.1, 0.1]);
//! assert!(w[0] != 0.0 && w[1] == 0.0);
//! ```

use crate::resistive_wall::ResistiveWall;
use crate::resonator::Resonator;
use crate::types::WakePlane;
use crate::wake_table::WakeTable;
use std::collections::BTreeMap;

/// A plane wake function: `(beta, z) -> amplitudes`, one output element
/// per input separation. Pure, stateless aside from the closed-over model
/// parameters, and safe to call from multiple threads.
pub type WakeFunction = Box<dyn Fn(f64, &[f64]) -> Vec<f64> + Send + Sync>;

/// Dispatch table from plane to wake function. `BTreeMap` keeps iteration
/// order deterministic (dispatch order of [`WakePlane`]).
pub type WakeFunctionMap = BTreeMap<WakePlane, WakeFunction>;

/// Capability shared by all wake models: produce a dispatch table.
///
/// A plane appears in the table only if the model actually contributes to
/// it (nonzero Yokoya factor, or column present in a wake table).
pub trait WakeSource {
    /// Build the plane dispatch table for this source.
    fn wake_functions(&self) -> WakeFunctionMap;
}

/// Closed set of wake source variants.
#[derive(Debug, Clone)]
pub enum WakeSourceKind {
    /// Multi-mode RLC resonator.
    Resonator(Resonator),
    /// Resistive circular/flat beam pipe.
    ResistiveWall(ResistiveWall),
    /// Interpolated tabulated wake.
    Table(WakeTable),
}

impl WakeSource for WakeSourceKind {
    fn wake_functions(&self) -> WakeFunctionMap {
        match self {
            WakeSourceKind::Resonator(model) => model.wake_functions(),
            WakeSourceKind::ResistiveWall(model) => model.wake_functions(),
            WakeSourceKind::Table(model) => model.wake_functions(),
        }
    }
}

impl From<Resonator> for WakeSourceKind {
    fn from(model: Resonator) -> Self {
        WakeSourceKind::Resonator(model)
    }
}

impl From<ResistiveWall> for WakeSourceKind {
    fn from(model: ResistiveWall) -> Self {
        WakeSourceKind::ResistiveWall(model)
    }
}

impl From<WakeTable> for WakeSourceKind {
    fn from(model: WakeTable) -> Self {
        WakeSourceKind::Table(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resistive_wall::ResistiveWallConfig;
    use crate::resonator::ResonatorModes;

    #[test]
    fn test_kind_delegates_to_model() {
        let res = Resonator::circular(ResonatorModes::single(1e6, 2e9, 4.0)).unwrap();
        let direct: Vec<_> = res.wake_functions().keys().copied().collect();
        let kind = WakeSourceKind::from(res);
        let via_kind: Vec<_> = kind.wake_functions().keys().copied().collect();
        assert_eq!(direct, via_kind);
    }

    #[test]
    fn test_mixed_source_list() {
        let sources: Vec<WakeSourceKind> = vec![
            Resonator::circular(ResonatorModes::single(1e6, 2e9, 4.0))
                .unwrap()
                .into(),
            ResistiveWall::circular(ResistiveWallConfig::default())
                .unwrap()
                .into(),
        ];
        for source in &sources {
            assert!(!source.wake_functions().is_empty());
        }
    }

    #[test]
    fn test_functions_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let res = Resonator::circular(ResonatorModes::single(1e6, 2e9, 4.0)).unwrap();
        let table = res.wake_functions();
        assert_send_sync(&table);
    }
}
