//! Identity resolution from the process environment.

use clap::Parser;
use elector::{Cli, ElectorConfig};
use serial_test::serial;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("elector").chain(args.iter().copied())).unwrap()
}

#[test]
#[serial]
fn test_identity_falls_back_to_hostname() {
    std::env::set_var("HOSTNAME", "hx");
    let config = ElectorConfig::from_env(cli(&["--election=e1"])).unwrap();
    std::env::remove_var("HOSTNAME");

    assert_eq!(config.participant.as_str(), "hx");
    assert_eq!(config.descriptor().unwrap().participant().as_str(), "hx");
}

#[test]
#[serial]
fn test_explicit_id_wins_over_hostname() {
    std::env::set_var("HOSTNAME", "hx");
    let config = ElectorConfig::from_env(cli(&["--election=e1", "--id=p1"])).unwrap();
    std::env::remove_var("HOSTNAME");

    assert_eq!(config.participant.as_str(), "p1");
}

#[test]
#[serial]
fn test_missing_identity_is_fatal() {
    std::env::remove_var("HOSTNAME");
    let err = ElectorConfig::from_env(cli(&["--election=e1"])).unwrap_err();

    assert!(err.is_fatal());
    assert!(err.to_string().contains("--id"));
}
