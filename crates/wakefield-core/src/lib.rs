//! # Wakefield Core Library
//!
//! This crate provides the wake function evaluation engine for
//! single-bunch beam tracking: closed-form analytic wake functions for
//! resonator and resistive-wall impedance sources, and an interpolation
//! engine for externally supplied wake tables.
//!
//! ## Overview
//!
//! A charged-particle bunch traversing an accelerator structure leaves an
//! electromagnetic field behind it. The *wake function* is that field's
//! impulse response: it maps the longitudinal separation z between a
//! source charge and a trailing witness charge to the force the witness
//! experiences. Three impedance source models are implemented:
//!
//! - **Resonator** ([`resonator`]): a sum of RLC modes (shunt impedance,
//!   resonant frequency, quality factor), with underdamped / critically
//!   damped / overdamped branches
//! - **Resistive wall** ([`resistive_wall`]): short-range 1/sqrt(-z)
//!   transverse wake of a finite-conductivity beam pipe
//! - **Wake table** ([`wake_table`]): measured or simulated wake samples,
//!   unit-normalized and linearly interpolated over time of flight
//!
//! Each model splits its effect among up to five planes (dipolar and
//! quadrupolar x/y plus longitudinal) via Yokoya geometry factors
//! ([`yokoya`]) and exposes the same capability: a dispatch table from
//! plane to wake function ([`wake_source`]).
//!
//! ## Signal Flow
//!
//! ```text
//! tracking loop → slice positions, beta → dispatch table
//!              → plane wake function → amplitude per slice pair
//!              → convolved kick → bunch momentum update
//! ```
//!
//! The bunch and slicer are external collaborators; [`tracking`] defines
//! their contracts and a driver that walks the dispatch table each turn.
//!
//! ## Example
//!
//! ```rust
//! use wakefield_core::{Resonator, ResonatorModes, WakePlane, WakeSource};
//!
//! // Two broad-band modes in a circular chamber
//! let modes = ResonatorModes {
//!     r_shunt: vec![5e6, 2e6],
//!     frequency: vec![1.3e9, 2.1e9],
//!     q: vec![1.0, 40.0],
//! };
//! let resonator = Resonator::circular(modes).unwrap();
//!
//! // Evaluate the dipolar wake 5 cm behind the source
//! let table = resonator.wake_functions();
//! let wake = &table[&WakePlane::DipoleX];
//! let w = wake(1.0, &[-0.05]);
//! assert!(w[0].is_finite());
//! ```
//!
//! ## Causality
//!
//! Every wake function in this crate is zero wherever the witness leads
//! the source (z > 0), and the longitudinal wakes take half their
//! limiting value at z = 0 per the beam-loading theorem. Evaluation is
//! pure and synchronous; models are immutable after construction and a
//! dispatch table may be shared across threads.

pub mod resistive_wall;
pub mod resonator;
pub mod tracking;
pub mod types;
pub mod wake_source;
pub mod wake_table;
pub mod yokoya;

pub use resistive_wall::{ResistiveWall, ResistiveWallConfig};
pub use resonator::{Resonator, ResonatorModes};
pub use tracking::{Bunch, SliceStatistics, SliceWakeMemo, Slicer, WakeKicker};
pub use types::{WakeError, WakePlane, WakeResult, SPEED_OF_LIGHT, VACUUM_IMPEDANCE};
pub use wake_source::{WakeFunction, WakeFunctionMap, WakeSource, WakeSourceKind};
pub use wake_table::WakeTable;
pub use yokoya::YokoyaFactors;
