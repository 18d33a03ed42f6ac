//! # Solver Module
//!
//! Drives a precompiled APBS solver library in-process: an input deck held in memory and a
//! PQR molecule description go in, per-atom potentials, energies and forces come out.
//!
//! ## Architecture
//!
//! - **Library Contract** ([`library`]) - The [`library::SolverLibrary`] trait mirroring the
//!   calls exposed by the native library
//! - **Session** ([`session`]) - Scoped ownership of solver resources with guaranteed
//!   teardown, and the fixed calculation sequence ([`session::run_calculations`])
//! - **Results** ([`results`]) - Per-calculation result arrays and their conversion to
//!   reporting units
//! - **Error Handling** ([`error`]) - Failures reported by the library or the driver
//!
//! Only multigrid calculations are supported. The numerical solver itself lives entirely
//! behind the library contract; callers supply the native binding as a
//! [`library::SolverLibrary`] implementation.

pub mod error;
pub mod library;
pub mod results;
pub mod session;
