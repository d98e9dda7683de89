//! passwordstore - keeps harvester passwords in step with Saturn
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod changer;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod runner;
pub mod sftp;
pub mod syncer;
pub mod traits;
