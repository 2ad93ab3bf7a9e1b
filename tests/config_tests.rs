//! Configuration loading from disk.

use std::io::Write;

use tempfile::NamedTempFile;

use votepilot::domain::ContestId;
use votepilot::error::{ConfigError, Error};
use votepilot::infrastructure::config::{BackendMode, Config};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn loads_file_and_credentials_from_environment() {
    let file = write_config(
        r#"
        [backend]
        mode = "synthetic"

        [voting.defaults]
        boost_lead_time = 1800
        vote_only_in_final_window = true

        [voting.contests."c-7"]
        final_window_threshold = 900
        "#,
    );
    std::env::set_var("VOTEPILOT_IDENTITY", "ana");
    std::env::set_var("VOTEPILOT_SECRET", "pw");
    std::env::remove_var("VOTEPILOT_TOKEN");

    let config = Config::load(file.path()).unwrap();

    std::env::remove_var("VOTEPILOT_IDENTITY");
    std::env::remove_var("VOTEPILOT_SECRET");

    assert_eq!(config.backend.mode, BackendMode::Synthetic);
    assert_eq!(config.credentials.login(), Some(("ana", "pw")));

    let store = config.settings_store().unwrap();
    let overridden = store.effective(&ContestId::from("c-7")).unwrap();
    assert_eq!(overridden.boost_lead_time, 1_800);
    assert!(overridden.vote_only_in_final_window);
    assert_eq!(overridden.final_window_threshold, 900);

    let other = store.effective(&ContestId::from("c-8")).unwrap();
    assert_eq!(other.final_window_threshold, 3_600);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[backend\nmode = ");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn invalid_override_names_the_key() {
    let file = write_config("[voting.contests.\"c-1\"]\nboost_lead_time = -5\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("boost_lead_time"), "{err}");
}
