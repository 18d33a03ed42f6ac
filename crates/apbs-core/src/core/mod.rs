//! # Core Module
//!
//! Stateless building blocks shared by the remote client and the local solver driver.
//!
//! - **Data Models** ([`models`]) - Job requests, job status snapshots, output manifests
//!   and atom lists
//! - **Input Parsing** ([`io`]) - The input deck scanner and the PQR molecule reader
//! - **Units** ([`units`]) - Conversion of thermal-unit energies to molar energy units

pub mod io;
pub mod models;
pub mod units;
