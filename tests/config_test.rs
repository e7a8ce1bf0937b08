use std::collections::HashMap;

use clap::Parser;
use floating_forms::{Config, Variant, cli::Cli};
use instant::Duration;

fn parse(args: &[&str]) -> Result<Config, clap::Error> {
    Cli::try_parse_from(std::iter::once("floating-forms").chain(args.iter().copied()))
        .map(Cli::into_config)
}

fn params(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| pairs.get(key).cloned()
}

#[test]
fn cli_defaults_to_the_knot() {
    let config = parse(&[]).unwrap();
    assert_eq!(config.variant, Variant::Knot);
    assert_eq!(config.load_delay, Duration::ZERO);
    assert_eq!(config.seed, None);
}

#[test]
fn cli_reads_flags() {
    let config = parse(&["--variant", "Tower", "--seed", "42", "--load-delay-ms", "250"]).unwrap();
    assert_eq!(config.variant, Variant::Tower);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.load_delay, Duration::from_millis(250));
}

#[test]
fn tower_waits_a_second_by_default() {
    let config = parse(&["--variant", "2"]).unwrap();
    assert_eq!(config.variant, Variant::Tower);
    assert_eq!(config.load_delay, Duration::from_secs(1));
}

#[test]
fn cli_rejects_bad_values() {
    assert!(parse(&["--variant", "cube"]).is_err());
    assert!(parse(&["--seed", "-1"]).is_err());
    assert!(parse(&["--load-delay-ms", "soon"]).is_err());
}

#[test]
fn reads_url_parameters() {
    let config = Config::from_params(params(&[
        ("variant", "tower"),
        ("seed", "7"),
        ("delay", "300"),
        ("debug", "1"),
    ]));
    assert_eq!(config.variant, Variant::Tower);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.load_delay, Duration::from_millis(300));
}

#[test]
fn bad_url_parameters_keep_the_defaults() {
    let config = Config::from_params(params(&[("variant", "pyramid"), ("seed", "abc"), ("delay", "")]));
    assert_eq!(config, Config::default());
    assert_eq!(Config::from_params(params(&[])), Config::default());
}

#[test]
fn explicit_seed_is_used_as_is() {
    assert_eq!(Config::default().with_seed(3).resolve_seed(), 3);
}
