// Test helpers for engine flows
//
// Engines run against an in-memory order store with real transaction semantics
// (writes are only visible after commit, dropped transactions leave no trace) and
// stub gateways that record every call.
//
// Usage from a test target:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod stub_gateways;

pub use memory_store::*;
pub use stub_gateways::*;
pub use test_data::*;
