#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    RevealMaxMs,
    RevealMinMs,
    StoreFile,
    Username,
}

pub struct Config {}

fn app_dir() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let dir = dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("sahayak");
    #[cfg(target_os = "macos")]
    let dir = dirs::home_dir()
        .unwrap_or_else(env::temp_dir)
        .join(".config/sahayak");

    return dir;
}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// Numeric config values fall back to their defaults when unset or
    /// unparsable.
    pub fn get_u64(key: ConfigKey) -> u64 {
        if let Ok(val) = Config::get(key).parse::<u64>() {
            return val;
        }

        return Config::default(key).parse::<u64>().unwrap_or(0);
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "You".to_string();
            }

            return user;
        }

        let config_path = app_dir().join("config.toml");
        let store_path = app_dir().join("storage.json");

        let res = match key {
            ConfigKey::ApiURL => "http://localhost:5000",
            ConfigKey::RevealMaxMs => "40",
            ConfigKey::RevealMinMs => "15",

            // Special
            ConfigKey::ConfigFile => config_path.to_str().unwrap_or("config.toml"),
            ConfigKey::StoreFile => store_path.to_str().unwrap_or("storage.json"),
            ConfigKey::Username => "",
        };

        return res.to_string();
    }

    pub fn log_dir() -> path::PathBuf {
        if let Ok(dir) = env::var("SAHAYAK_LOG_DIR") {
            return path::PathBuf::from(dir);
        }

        return app_dir();
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    let is_numeric = key == ConfigKey::RevealMinMs || key == ConfigKey::RevealMaxMs;

                    if let Some(val_int) = val.as_integer() {
                        if !is_numeric || val_int < 0 {
                            bail!(format!(
                                "config.toml has an invalid value for key '{key}': {val_int}"
                            ));
                        }
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if is_numeric {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nExpected a whole number of milliseconds."));
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        if Config::get_u64(ConfigKey::RevealMinMs) > Config::get_u64(ConfigKey::RevealMaxMs) {
            bail!("reveal-min-ms must not be greater than reveal-max-ms");
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            store_file = Config::get(ConfigKey::StoreFile),
            reveal_min_ms = Config::get(ConfigKey::RevealMinMs),
            reveal_max_ms = Config::get(ConfigKey::RevealMaxMs),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(
                        "# Your name displayed above your messages in the chat panel.\n# username = \"\""
                            .to_string(),
                    );
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
