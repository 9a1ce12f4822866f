mod engine_config;
mod engine_init;
mod json_contract;

pub use engine_config::{DEFAULT_TICK_INTERVAL_MS, ScopeConfig};
pub use engine_init::{open_engine, open_engine_with};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
