//! Tabulated Wake Model
//!
//! Ingests a measured or simulated wake table and turns it into causally
//! correct, unit-normalized, linearly interpolated wake functions.
//!
//! ## File format
//!
//! Tab-delimited numeric columns, one row per time sample. The caller
//! supplies the column order as a key list; the first column is
//! conventionally `time`:
//!
//! ```text
//! time    dipole_x    dipole_y    longitudinal
//! 0.0     0.0         0.0         12.1
//! 0.5     4.1         3.9         10.8
//! ...
//! ```
//!
//! External units are nanoseconds for time, V/pC/mm for transverse
//! amplitudes and V/pC for the longitudinal amplitude. Construction
//! converts everything to SI (seconds, V/C/m, V/C) and inverts the sign
//! per the tracking convention.
//!
//! ## Causality repair
//!
//! Performed once per plane at construction:
//!
//! 1. If the first time sample is > 0, a (0, 0) sample is prepended: no
//!    wake before the source arrives.
//! 2. If the first amplitude is still nonzero, an earlier zero-amplitude
//!    sample is prepended at the zero crossing of the local slope, so the
//!    interpolated wake rises from exactly 0 without a discontinuity.
//!
//! ## Missing planes
//!
//! A plane absent from the key list is skipped at construction (logged,
//! not an error) and every later lookup for it yields zeros. The tracking
//! loop never has to special-case absent planes.

use crate::types::{WakeError, WakePlane, WakeResult, SPEED_OF_LIGHT};
use crate::wake_source::{WakeFunction, WakeFunctionMap, WakeSource};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// External time unit: nanoseconds to seconds.
const NS_TO_S: f64 = 1e-9;
/// Transverse amplitude unit: V/pC/mm to V/C/m, sign inverted per the
/// tracking convention.
const TRANSVERSE_UNIT: f64 = -1e15;
/// Longitudinal amplitude unit: V/pC to V/C, sign inverted.
const LONGITUDINAL_UNIT: f64 = -1e12;

/// One plane's repaired sample sequence. The time axis is per plane
/// because causality repair may prepend plane-specific samples.
#[derive(Debug, Clone, PartialEq)]
struct PlaneSamples {
    time: Vec<f64>,
    amplitude: Vec<f64>,
    /// Whether the beam-loading gate applies, decided from the raw table
    /// before repair: a table starting at negative time has resolved the
    /// t = 0 boundary itself, everything else gets gated. Repair may
    /// prepend negative-time samples, so the post-repair axis cannot
    /// carry this decision.
    gated: bool,
}

/// Interpolated wake table, immutable after construction.
#[derive(Debug, Clone)]
pub struct WakeTable {
    planes: BTreeMap<WakePlane, PlaneSamples>,
}

impl WakeTable {
    /// Build a table from caller-ordered column keys and parallel columns.
    ///
    /// `keys` names each column; exactly one must be `time`. Keys that do
    /// not name a plane are ignored, planes missing from the key list are
    /// skipped. Columns must all have the time column's length and the
    /// time axis must be non-decreasing and non-empty.
    pub fn from_columns(keys: &[&str], columns: &[Vec<f64>]) -> WakeResult<Self> {
        if keys.len() != columns.len() {
            return Err(WakeError::KeyColumnCountMismatch {
                keys: keys.len(),
                columns: columns.len(),
            });
        }

        let mut time: Option<&Vec<f64>> = None;
        for (key, column) in keys.iter().zip(columns) {
            if *key == "time" {
                if time.is_some() {
                    return Err(WakeError::DuplicateColumn("time".into()));
                }
                time = Some(column);
            }
        }
        let time = time.ok_or(WakeError::MissingTimeColumn)?;
        if time.is_empty() {
            return Err(WakeError::EmptyTable);
        }
        if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
            return Err(WakeError::NonMonotonicTime { index: i + 1 });
        }

        let time_s: Vec<f64> = time.iter().map(|&t| t * NS_TO_S).collect();
        tracing::debug!("converted wake table time from [ns] to [s]");

        let mut planes = BTreeMap::new();
        for (key, column) in keys.iter().zip(columns) {
            if *key == "time" {
                continue;
            }
            let plane = match WakePlane::from_column_name(key) {
                Some(plane) => plane,
                None => {
                    tracing::debug!(column = *key, "unrecognized wake table column, ignored");
                    continue;
                }
            };
            if planes.contains_key(&plane) {
                return Err(WakeError::DuplicateColumn((*key).into()));
            }
            if column.len() != time.len() {
                return Err(WakeError::ColumnLengthMismatch {
                    key: (*key).into(),
                    expected: time.len(),
                    actual: column.len(),
                });
            }
            let unit = if plane.is_transverse() {
                tracing::debug!(
                    plane = %plane,
                    "converted wake from [V/pC/mm] to [V/C/m] and inverted sign"
                );
                TRANSVERSE_UNIT
            } else {
                tracing::debug!(
                    plane = %plane,
                    "converted wake from [V/pC] to [V/C] and inverted sign"
                );
                LONGITUDINAL_UNIT
            };
            let amplitude: Vec<f64> = column.iter().map(|&a| a * unit).collect();
            let samples = repair_causality(time_s.clone(), amplitude);
            planes.insert(plane, samples);
        }

        for plane in WakePlane::ALL {
            if !planes.contains_key(&plane) {
                tracing::info!(plane = %plane, "wake not provided, plane degrades to zero");
            }
        }

        Ok(Self { planes })
    }

    /// Load a tab-delimited wake table file (units as described above).
    pub fn from_file(path: impl AsRef<Path>, keys: &[&str]) -> WakeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WakeError::TableIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, keys, path.to_path_buf())
    }

    /// Parse tab-delimited wake table text held in memory.
    pub fn from_text(text: &str, keys: &[&str]) -> WakeResult<Self> {
        Self::parse(text, keys, PathBuf::from("<inline>"))
    }

    fn parse(text: &str, keys: &[&str], path: PathBuf) -> WakeResult<Self> {
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); keys.len()];
        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != keys.len() {
                return Err(WakeError::ColumnCountMismatch {
                    path: path.clone(),
                    line: line_idx + 1,
                    expected: keys.len(),
                    actual: fields.len(),
                });
            }
            for (column, field) in columns.iter_mut().zip(&fields) {
                let value: f64 = field.parse().map_err(|_| WakeError::TableParse {
                    path: path.clone(),
                    line: line_idx + 1,
                    message: format!("invalid number `{field}`"),
                })?;
                column.push(value);
            }
        }
        Self::from_columns(keys, &columns)
    }

    /// `true` when the table carries data for `plane`.
    pub fn has_plane(&self, plane: WakePlane) -> bool {
        self.planes.contains_key(&plane)
    }

    /// Planes with data present, in dispatch order.
    pub fn planes(&self) -> impl Iterator<Item = WakePlane> + '_ {
        self.planes.keys().copied()
    }

    /// The repaired, SI-normalized `(time, amplitude)` samples of a plane.
    pub fn samples(&self, plane: WakePlane) -> Option<(&[f64], &[f64])> {
        self.planes
            .get(&plane)
            .map(|s| (s.time.as_slice(), s.amplitude.as_slice()))
    }

    /// Interpolated transverse wake for `plane` at separations `z` [m].
    ///
    /// Time of flight is t = -z/(βc); values outside the table's time
    /// range are 0 (no extrapolation). A plane without data yields all
    /// zeros.
    pub fn wake_transverse(&self, plane: WakePlane, beta: f64, z: &[f64]) -> Vec<f64> {
        debug_assert!(beta > 0.0 && beta <= 1.0);
        debug_assert!(plane.is_transverse());
        match self.planes.get(&plane) {
            Some(samples) => z
                .iter()
                .map(|&z| {
                    let t = -z / (beta * SPEED_OF_LIGHT);
                    interp_or_zero(t, &samples.time, &samples.amplitude)
                })
                .collect(),
            None => vec![0.0; z.len()],
        }
    }

    /// Interpolated longitudinal wake at separations `z` [m].
    ///
    /// For a table whose raw first time sample is at or after t = 0 the
    /// beam-loading gate applies: half value at z = 0, zero ahead of the
    /// source, even where causality repair has prepended negative-time
    /// samples. A table extending to negative times has resolved the
    /// boundary itself and is used unmodified.
    pub fn wake_longitudinal(&self, beta: f64, z: &[f64]) -> Vec<f64> {
        debug_assert!(beta > 0.0 && beta <= 1.0);
        match self.planes.get(&WakePlane::Longitudinal) {
            Some(samples) => z
                .iter()
                .map(|&z| {
                    let t = -z / (beta * SPEED_OF_LIGHT);
                    let w = interp_or_zero(t, &samples.time, &samples.amplitude);
                    if samples.gated {
                        w * causal_gate(z)
                    } else {
                        w
                    }
                })
                .collect(),
            None => vec![0.0; z.len()],
        }
    }

    /// Wake function for a plane; a zero function when the plane has no
    /// data (graceful degradation).
    pub fn wake_function(&self, plane: WakePlane) -> WakeFunction {
        if !self.has_plane(plane) {
            return Box::new(|_beta, z| vec![0.0; z.len()]);
        }
        let table = self.clone();
        if plane == WakePlane::Longitudinal {
            Box::new(move |beta, z| table.wake_longitudinal(beta, z))
        } else {
            Box::new(move |beta, z| table.wake_transverse(plane, beta, z))
        }
    }
}

impl WakeSource for WakeTable {
    /// One entry per plane with data present.
    fn wake_functions(&self) -> WakeFunctionMap {
        self.planes()
            .map(|plane| (plane, self.wake_function(plane)))
            .collect()
    }
}

/// Beam-loading gate: 1 behind the source, 1/2 at z = 0, 0 ahead.
fn causal_gate(z: f64) -> f64 {
    if z < 0.0 {
        1.0
    } else if z == 0.0 {
        0.5
    } else {
        0.0
    }
}

/// Enforce the causality boundary conditions on one plane's samples.
fn repair_causality(mut time: Vec<f64>, mut amplitude: Vec<f64>) -> PlaneSamples {
    let gated = time[0] >= 0.0;
    // No wake before the source arrives at t = 0.
    if time[0] > 0.0 {
        time.insert(0, 0.0);
        amplitude.insert(0, 0.0);
    }
    // Interpolation must start from zero amplitude. Extend the first
    // segment's slope back to its zero crossing; when the slope gives no
    // usable crossing, fall back to one sample spacing.
    if amplitude[0] != 0.0 {
        let t_zero = if time.len() > 1 {
            let dt = time[1] - time[0];
            let da = amplitude[1] - amplitude[0];
            let crossing = if da != 0.0 {
                time[0] - amplitude[0] * dt / da
            } else {
                f64::INFINITY
            };
            if crossing.is_finite() && crossing < time[0] {
                crossing
            } else {
                time[0] - dt.max(f64::MIN_POSITIVE)
            }
        } else {
            time[0] - NS_TO_S
        };
        time.insert(0, t_zero);
        amplitude.insert(0, 0.0);
    }
    PlaneSamples {
        time,
        amplitude,
        gated,
    }
}

/// Linear interpolation over `(xs, ys)` with zero outside `[xs[0],
/// xs[last]]` (the np.interp left=0/right=0 convention).
fn interp_or_zero(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    // NaN queries also fall through to 0.
    if !(x >= xs[0] && x <= xs[last]) {
        return 0.0;
    }
    match xs.binary_search_by(|v| v.total_cmp(&x)) {
        Ok(i) => ys[i],
        // total_cmp orders -0.0 below 0.0, so a query that ties with an
        // endpoint under == can still land outside the slice.
        Err(0) => ys[0],
        Err(i) if i > last => ys[last],
        Err(i) => {
            let (x0, x1) = (xs[i - 1], xs[i]);
            let (y0, y1) = (ys[i - 1], ys[i]);
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        }
    }
}
