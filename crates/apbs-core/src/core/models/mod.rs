//! Data models exchanged between the deck scanner, the job client and the solver driver.

pub mod atoms;
pub mod job;
pub mod outputs;
pub mod status;
