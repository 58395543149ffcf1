use std::io::Write;
use std::sync::Mutex;

use anyhow::Result;
use once_cell::sync::Lazy;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

// Config is process global, so tests that load it take turns.
static LOAD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| return Mutex::new(()));

fn write_config(contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    return Ok(file);
}

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());
    assert!(res.contains("api-url = \"http://localhost:5000\""));
    assert!(res.contains("reveal-min-ms = 15"));
    assert!(res.contains("reveal-max-ms = 40"));
    assert!(!res.contains("config-file"));
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().unwrap();
    let file = write_config("api-url = \"http://sahayak.test\"\nreveal-max-ms = 60\n")?;
    let path = file.path().to_str().unwrap().to_string();

    let matches = cli::build().try_get_matches_from(vec!["sahayak", "-c", &path])?;
    Config::load(vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::ApiURL), "http://sahayak.test");
    assert_eq!(Config::get_u64(ConfigKey::RevealMaxMs), 60);
    assert_eq!(Config::get_u64(ConfigKey::RevealMinMs), 15);
    return Ok(());
}

#[tokio::test]
async fn it_prefers_flags_over_the_config_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().unwrap();
    let file = write_config("api-url = \"http://from-file.test\"\n")?;
    let path = file.path().to_str().unwrap().to_string();

    let matches = cli::build().try_get_matches_from(vec![
        "sahayak",
        "-c",
        &path,
        "--api-url",
        "http://from-flag.test",
    ])?;
    Config::load(vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::ApiURL), "http://from-flag.test");
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_load_non_numeric_reveal_timings() -> Result<()> {
    let _lock = LOAD_LOCK.lock().unwrap();
    let file = write_config("reveal-min-ms = \"fast\"\n")?;
    let path = file.path().to_str().unwrap().to_string();

    let matches = cli::build().try_get_matches_from(vec!["sahayak", "-c", &path])?;
    let res = Config::load(vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_fails_when_reveal_range_is_inverted() -> Result<()> {
    let _lock = LOAD_LOCK.lock().unwrap();
    let file = write_config("reveal-min-ms = 50\nreveal-max-ms = 10\n")?;
    let path = file.path().to_str().unwrap().to_string();

    let matches = cli::build().try_get_matches_from(vec!["sahayak", "-c", &path])?;
    let res = Config::load(vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}
