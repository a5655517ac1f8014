//! Beaconkeep — portable iBeacon reconciliation engine.
//!
//! Ingests batches of beacon observations from a host-provided ranging
//! source and reconciles them against two in-memory collections: `saved`
//! (user-curated, persisted) and `available` (seen this session). Known
//! keys are refreshed in place; unseen keys become new `available`
//! entries and fire a detection event; an `available` beacon ranged
//! close enough becomes a save candidate. Promotion and removal move
//! items between the collections and keep the durable store in sync.
//!
//! The crate contains no platform dependencies and is testable on any
//! host with `cargo test`. Platform shims (a CoreLocation bridge, a BLE
//! scanner daemon, a serial feed) are thin consumers: they deliver
//! observations, implement [`vault::BeaconVault`] over their storage,
//! and render the collections when [`store::StoreListener`] fires.

#![cfg_attr(not(test), no_std)]

pub mod beacon;
pub mod defaults;
pub mod store;
pub mod vault;
pub mod wire;
