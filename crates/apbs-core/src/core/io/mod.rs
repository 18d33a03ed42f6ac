//! Readers for the plain-text inputs the client and driver consume.
//!
//! Neither reader attempts to understand the full solver input format. The deck scanner
//! extracts only the directives that influence job routing and payload assembly, and the
//! PQR reader extracts only the per-atom numbers the solver library needs.

pub mod deck;
pub mod pqr;
