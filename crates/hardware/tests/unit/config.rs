//! Configuration Tests.
//!
//! Defaults, partial JSON documents and validation.

use pipesim_core::SimError;
use pipesim_core::config::{Config, LatencyConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.machine.register_count, 48);
    assert_eq!(config.machine.memory_size, 32);
    assert_eq!(config.machine.max_cycles, 10_000);
    assert!(!config.pipeline.forwarding);
    assert_eq!(config.tomasulo.add_stations, 3);
    assert_eq!(config.tomasulo.mul_stations, 2);
    assert_eq!(config.tomasulo.mem_stations, 3);
    assert_eq!(
        config.tomasulo.latency,
        LatencyConfig {
            add_sub: 2,
            mul: 10,
            div: 40,
            mem: 2,
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn empty_json_is_default() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn partial_json_keeps_other_defaults() {
    let json = r#"{
        "pipeline": { "forwarding": true },
        "tomasulo": { "mul_stations": 4, "latency": { "div": 20 } }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert!(config.pipeline.forwarding);
    assert_eq!(config.tomasulo.mul_stations, 4);
    assert_eq!(config.tomasulo.add_stations, 3);
    assert_eq!(config.tomasulo.latency.div, 20);
    assert_eq!(config.tomasulo.latency.mul, 10);
    assert_eq!(config.machine, Config::default().machine);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(serde_json::from_str::<Config>(r#"{ "machine": { "memory_size": -1 } }"#).is_err());
}

#[rstest]
#[case::registers(r#"{ "machine": { "register_count": 0 } }"#)]
#[case::memory(r#"{ "machine": { "memory_size": 0 } }"#)]
#[case::ceiling(r#"{ "machine": { "max_cycles": 0 } }"#)]
#[case::add_pool(r#"{ "tomasulo": { "add_stations": 0 } }"#)]
#[case::mem_pool(r#"{ "tomasulo": { "mem_stations": 0 } }"#)]
#[case::latency(r#"{ "tomasulo": { "latency": { "mem": 0 } } }"#)]
fn zero_sizes_fail_validation(#[case] json: &str) {
    let config: Config = serde_json::from_str(json).unwrap();
    assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
}
