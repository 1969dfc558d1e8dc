//! Core types for wakefield computations
//!
//! This module defines the plane identifiers, the crate-wide error type, and
//! the physical constants used throughout the library.
//!
//! ## Planes
//!
//! A wake source acts on the beam in up to five planes. The transverse
//! planes split into dipolar kicks (driven by the source slice's offset)
//! and quadrupolar kicks (driven by the witness particle's own offset):
//!
//! ```text
//!   dipole_x, dipole_y         driven by source displacement
//!   quadrupole_x, quadrupole_y driven by witness displacement
//!   longitudinal               energy loss / gain along the beam axis
//! ```
//!
//! The split between the planes for a given structure is set by its Yokoya
//! geometry factors (see [`crate::yokoya`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Speed of light in vacuum [m/s].
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Characteristic impedance of vacuum [Ω].
pub const VACUUM_IMPEDANCE: f64 = 376.730_313_668;

/// Result type for wakefield operations.
pub type WakeResult<T> = Result<T, WakeError>;

/// Identifies the plane a wake function acts on.
///
/// Ordered so that dispatch tables built over `BTreeMap<WakePlane, _>`
/// iterate deterministically: transverse planes first, longitudinal last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WakePlane {
    /// Horizontal dipolar wake (driven by source offset).
    DipoleX,
    /// Vertical dipolar wake (driven by source offset).
    DipoleY,
    /// Horizontal quadrupolar wake (driven by witness offset).
    QuadrupoleX,
    /// Vertical quadrupolar wake (driven by witness offset).
    QuadrupoleY,
    /// Longitudinal wake (energy kick).
    Longitudinal,
}

impl WakePlane {
    /// All five planes, in dispatch order.
    pub const ALL: [WakePlane; 5] = [
        WakePlane::DipoleX,
        WakePlane::DipoleY,
        WakePlane::QuadrupoleX,
        WakePlane::QuadrupoleY,
        WakePlane::Longitudinal,
    ];

    /// The four transverse planes, in dispatch order.
    pub const TRANSVERSE: [WakePlane; 4] = [
        WakePlane::DipoleX,
        WakePlane::DipoleY,
        WakePlane::QuadrupoleX,
        WakePlane::QuadrupoleY,
    ];

    /// Returns `true` for the four transverse planes.
    pub fn is_transverse(&self) -> bool {
        !matches!(self, WakePlane::Longitudinal)
    }

    /// Parse a wake-table column header into a plane.
    ///
    /// Accepts both the `dipole_x` spelling used by this crate and the
    /// `dipolar_x` spelling common in tabulated wake files. Returns `None`
    /// for unrecognized names (including `time`, which is not a plane).
    pub fn from_column_name(name: &str) -> Option<WakePlane> {
        match name {
            "dipole_x" | "dipolar_x" => Some(WakePlane::DipoleX),
            "dipole_y" | "dipolar_y" => Some(WakePlane::DipoleY),
            "quadrupole_x" | "quadrupolar_x" => Some(WakePlane::QuadrupoleX),
            "quadrupole_y" | "quadrupolar_y" => Some(WakePlane::QuadrupoleY),
            "longitudinal" => Some(WakePlane::Longitudinal),
            _ => None,
        }
    }

    /// Canonical column name for this plane.
    pub const fn column_name(&self) -> &'static str {
        match self {
            WakePlane::DipoleX => "dipole_x",
            WakePlane::DipoleY => "dipole_y",
            WakePlane::QuadrupoleX => "quadrupole_x",
            WakePlane::QuadrupoleY => "quadrupole_y",
            WakePlane::Longitudinal => "longitudinal",
        }
    }
}

impl std::fmt::Display for WakePlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Errors raised while constructing a wake model.
///
/// All variants are construction-time failures: once a model is built, its
/// wake functions are pure and infallible. A plane missing from a wake
/// table is deliberately *not* an error; lookups for absent planes degrade
/// to a zero-valued function (see [`crate::wake_table`]).
#[derive(Debug, thiserror::Error)]
pub enum WakeError {
    #[error("resonator mode arrays differ in length: R_shunt={r}, frequency={f}, Q={q}")]
    ModeLengthMismatch { r: usize, f: usize, q: usize },

    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("failed to read wake table {}: {source}", path.display())]
    TableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wake table {}, line {line}: {message}", path.display())]
    TableParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("wake table {}, line {line}: expected {expected} columns, got {actual}", path.display())]
    ColumnCountMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("wake table column `{key}` has {actual} samples, expected {expected}")]
    ColumnLengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("wake table key list names {keys} columns but {columns} were supplied")]
    KeyColumnCountMismatch { keys: usize, columns: usize },

    #[error("wake table key list has no `time` column")]
    MissingTimeColumn,

    #[error("duplicate wake table column `{0}`")]
    DuplicateColumn(String),

    #[error("wake table time axis decreases at sample {index}")]
    NonMonotonicTime { index: usize },

    #[error("wake table contains no samples")]
    EmptyTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_ordering_is_dispatch_order() {
        let mut planes = WakePlane::ALL.to_vec();
        planes.sort();
        assert_eq!(planes, WakePlane::ALL.to_vec());
        assert_eq!(planes.last(), Some(&WakePlane::Longitudinal));
    }

    #[test]
    fn test_column_name_round_trip() {
        for plane in WakePlane::ALL {
            assert_eq!(WakePlane::from_column_name(plane.column_name()), Some(plane));
        }
    }

    #[test]
    fn test_legacy_column_spellings() {
        assert_eq!(
            WakePlane::from_column_name("dipolar_x"),
            Some(WakePlane::DipoleX)
        );
        assert_eq!(
            WakePlane::from_column_name("quadrupolar_y"),
            Some(WakePlane::QuadrupoleY)
        );
        assert_eq!(WakePlane::from_column_name("time"), None);
    }

    #[test]
    fn test_transverse_predicate() {
        for plane in WakePlane::TRANSVERSE {
            assert!(plane.is_transverse());
        }
        assert!(!WakePlane::Longitudinal.is_transverse());
    }

    #[test]
    fn test_error_messages_identify_parameter() {
        let err = WakeError::NonPositiveParameter {
            name: "conductivity",
            value: -1.0,
        };
        assert!(err.to_string().contains("conductivity"));
    }
}
