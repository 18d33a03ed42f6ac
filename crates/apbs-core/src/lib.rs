//! # APBS Opal Client Library
//!
//! Orchestration around the Adaptive Poisson-Boltzmann Solver (APBS): submission of
//! calculations to a remote Opal-style web service, and an in-process driver for a
//! precompiled solver library.
//!
//! ## Architectural Philosophy
//!
//! The library follows a layered layout so that every stage can be exercised in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`JobRequest`, `JobStatus`,
//!   `AtomList`), the input deck scanner, the PQR molecule reader and unit conversion.
//!
//! - **[`remote`]: The Job Lifecycle.** The abstract [`remote::service::JobService`]
//!   contract, its HTTP transport, the submission/poll/fetch state machine, polling and
//!   version policies, and the memory admission guard for local runs.
//!
//! - **[`solver`]: The Local Adapter.** The call contract of the native solver library,
//!   a scoped session that guarantees teardown, and the reshaping of per-atom results.
//!
//! - **[`workflows`]: The Public API.** End-to-end entry points that tie the layers
//!   together: submitting a deck, resuming a previously submitted job, and preparing a
//!   local solver invocation.

pub mod core;
pub mod remote;
pub mod solver;
pub mod workflows;
