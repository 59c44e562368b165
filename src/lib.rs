//! Species abundance reports to sample metadata.
//!
//! [`report::ReportParser`] reads the top-ranked rows of a Bracken species
//! abundance report, [`metadata::MetadataKeyBuilder`] turns them into
//! namespaced metadata keys, and [`updater::SpeciesAbundanceUpdater`] wires
//! both to the platform collaborators in [`platform`].

pub mod config;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod platform;
pub mod report;
pub mod store;
pub mod updater;
