use std::collections::HashMap;

use seird::config::{LogFormat, ServerConfig};
use seird::{EpidemiologicalParameters, SimulationConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn server_defaults_when_unset() {
    let cfg = ServerConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.socket_addr().expect("addr").port(), 8000);
}

#[test]
fn server_reads_overrides() {
    let cfg = ServerConfig::from_lookup(lookup(&[("HOST", "127.0.0.1"), ("PORT", " 9090 "), ("LOG_FORMAT", "JSON")]))
        .expect("config");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.log_format, LogFormat::Json);
    assert_eq!(cfg.socket_addr().expect("addr").to_string(), "127.0.0.1:9090");
}

#[test]
fn malformed_values_are_errors() {
    assert!(ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    assert!(ServerConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());

    let cfg = ServerConfig::from_lookup(lookup(&[("HOST", "not a host")])).expect("config");
    assert!(cfg.socket_addr().is_err());
}

#[test]
fn parameters_default_to_the_input_form_values() {
    let params: EpidemiologicalParameters = serde_json::from_str("{}").expect("parse");
    assert_eq!(params, EpidemiologicalParameters::default());
    assert_eq!(params.population, 1_000_000.0);
    assert_eq!(params.fatality_rate, 0.3);
    assert_eq!(params.contagious_period, 4.0);
    assert_eq!(params.incubation_period, 5.0);
    assert_eq!(params.infection_to_death_period, 9.0);

    let params: EpidemiologicalParameters =
        serde_json::from_str(r#"{"population": 2500.0, "fatality_rate": 0.1}"#).expect("parse");
    assert_eq!(params.population, 2500.0);
    assert_eq!(params.contagious_period, 4.0);
}

#[test]
fn simulation_config_partial_json() {
    let cfg: SimulationConfig = serde_json::from_str(r#"{"grid": {"end": 49.0, "points": 50}}"#).expect("parse");
    assert_eq!(cfg.grid.start, 0.0);
    assert_eq!(cfg.grid.points, 50);
    assert_eq!(cfg.tolerances, SimulationConfig::default().tolerances);
    assert!(cfg.check().is_ok());

    let bad = SimulationConfig { tolerances: seird::math::ode::Tolerances { rtol: 0.0, ..Default::default() }, ..cfg };
    assert!(bad.check().is_err());
}
