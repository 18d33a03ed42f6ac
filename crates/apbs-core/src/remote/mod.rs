//! # Remote Module
//!
//! The job lifecycle against a remote Opal-style APBS service: launch, poll, fetch.
//!
//! ## Architecture
//!
//! - **Service Contract** ([`service`]) - The four RPC operations consumed from the remote
//!   endpoint plus result download, behind the [`service::JobService`] trait
//! - **Transport** ([`http`]) - The HTTP adapter implementing the contract
//! - **Configuration** ([`config`]) - Endpoints, version policy, polling and fetch policy
//! - **Lifecycle** ([`lifecycle`]) - The client-side job state machine
//! - **Client** ([`client`]) - Submission, the blocking poll loop, resumption and fetching
//! - **Admission** ([`admission`]) - The coarse memory guard for local runs
//! - **Progress Monitoring** ([`progress`]) - Status and download events for front-ends
//! - **Error Handling** ([`error`]) - Transport and job-level error types
//!
//! The client is synchronous. The only suspension point is the fixed-interval sleep of the
//! blocking poll loop.

pub mod admission;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod progress;
pub mod service;
