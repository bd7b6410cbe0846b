use std::fs;

use triage::config::{Config, CONFIG_FILE};
use triage::scoring::{Strategy, WeightOverride};

#[test]
fn load_or_default_defaults_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "scoring = 123").expect("write invalid config");

    let (cfg, warning) = Config::load_or_default(dir.path());
    assert_eq!(cfg.scoring.strategy, "smart");
    assert_eq!(cfg.suggest.limit, 3);
    assert!(warning.is_some());
}

#[test]
fn load_or_default_defaults_on_unknown_strategy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    let content = r#"
[scoring]
strategy = "bogus"

[suggest]
limit = 7
"#;
    fs::write(&path, content.trim()).expect("write invalid strategy");

    let cfg = Config::load_or_default(dir.path()).0;
    assert_eq!(cfg.scoring.strategy, "smart");
    assert_eq!(cfg.suggest.limit, 3);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(CONFIG_FILE), "[suggest]\nlimit = 10\n").expect("write config");

    let cfg = Config::load_or_default(dir.path()).0;
    assert_eq!(cfg.suggest.limit, 10);
    assert_eq!(cfg.scoring.strategy, "smart");
    assert!(cfg.session.enabled);
    assert_eq!(cfg.session.lock_timeout_ms, 5000);
}

#[test]
fn saved_weights_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Config::path_in(dir.path());

    let mut cfg = Config::default();
    cfg.scoring.strategy = "fastest".to_string();
    cfg.scoring.weights = WeightOverride {
        d: Some(5.0),
        ..WeightOverride::default()
    };
    cfg.save(&path).expect("save");

    let reloaded = Config::load(&path).expect("load");
    let options = reloaded.scoring.options(None, None);
    assert_eq!(options.strategy, Strategy::Fastest);
    assert_eq!(options.weights().d, 5.0);
    assert_eq!(options.weights().e, 3.0);
}
