// tests/collector_config.rs
use echosight_collector::config::collector::{
    CollectorConfig, ENV_CONFIG_PATH, ENV_KAFKA_BROKER, ENV_METRICS_ROUTE,
};
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_KAFKA_BROKER);
    env::remove_var(ENV_METRICS_ROUTE);
}

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("collector.toml");
    fs::write(
        &p_toml,
        r#"
[hackernews]
max_items = 2
interval_secs = 90
"#,
    )
    .unwrap();
    let c = CollectorConfig::load_from(&p_toml).unwrap();
    assert_eq!(c.hackernews.max_items, 2);
    assert_eq!(c.hackernews.interval_secs, 90);
    assert_eq!(c.reddit.limit, 5);

    let p_json = dir.path().join("collector.json");
    fs::write(&p_json, r#"{"feed": {"timeout_secs": 2}, "metrics_route": true}"#).unwrap();
    let cj = CollectorConfig::load_from(&p_json).unwrap();
    assert_eq!(cj.feed.timeout_secs, 2);
    assert!(cj.metrics_route);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not read
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing -> defaults
    let c = CollectorConfig::load_default().unwrap();
    assert_eq!(c.stream.broker, "localhost:9092");
    assert_eq!(c.reddit.interval_secs, 30);

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("collector.toml"), "[reddit]\nlimit = 7\n").unwrap();
    assert_eq!(CollectorConfig::load_default().unwrap().reddit.limit, 7);

    // 3) Env path wins
    let p_env = tmp.path().join("other.json");
    fs::write(&p_env, r#"{"reddit": {"limit": 9}}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(CollectorConfig::load_default().unwrap().reddit.limit, 9);

    // 4) Env path to nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(CollectorConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn broker_and_metrics_from_env() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("collector.toml"),
        "[stream]\nbroker = \"file-broker:9092\"\n",
    )
    .unwrap();
    assert_eq!(
        CollectorConfig::load_default().unwrap().stream.broker,
        "file-broker:9092"
    );

    env::set_var(ENV_KAFKA_BROKER, "kafka:29092");
    env::set_var(ENV_METRICS_ROUTE, "1");
    let c = CollectorConfig::load_default().unwrap();
    assert_eq!(c.stream.broker, "kafka:29092");
    assert!(c.metrics_route);

    // Blank env value does not clobber the configured broker
    env::set_var(ENV_KAFKA_BROKER, "  ");
    assert_eq!(
        CollectorConfig::load_default().unwrap().stream.broker,
        "file-broker:9092"
    );

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn invalid_file_values_are_rejected() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    let p = tmp.path().join("bad.toml");
    fs::write(&p, "[stream]\nconnect_attempts = 0\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p.display().to_string());
    assert!(CollectorConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}
