use std::ops::Deref;
use std::path::{PathBuf, Path};

use thiserror;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct AppConfig {
    pub negotiate: NegotiateConfig,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NegotiateConfig {
    pub candidates: Vec<String>,
    pub fallback: String,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Unable to find configuration file at {0}")]
    FileNotFound(PathBuf),
    #[error("Unable to read configuration file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Configuration file is not valid toml: {0}")]
    FileFormatSyntaxError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}


pub(crate) fn load<P: Deref<Target=Path>+AsRef<Path>>(path: Option<P>) -> Result<AppConfig, Error> {
    let mut result = AppConfig::default();

    if let Some(config_path) = path {
        if ! config_path.is_file() {
            return Err(Error::FileNotFound(config_path.to_path_buf()));
        }
        let config = std::fs::read(config_path)?;
        let toml = toml::from_slice::<toml::Value>(&config)?;
        result.negotiate = from_toml(&toml)?;
    }

    Ok(result)
}

fn from_toml(toml: &toml::Value) -> Result<NegotiateConfig, Error> {
    let mut result = NegotiateConfig::default();

    let section = match toml.get("mimeneg") {
        Some(section) => section,
        None => {
            log::debug!("No [mimeneg] section in configuration; using defaults");
            return Ok(result);
        }
    };

    if let Some(fallback) = section.get("fallback") {
        result.fallback = fallback.as_str()
            .ok_or(Error::InvalidConfiguration("mimeneg.fallback must be a string".into()))?
            .to_string();
    }

    if let Some(candidates) = section.get("candidates") {
        match candidates {
            toml::Value::Array(candidates) => {
                for candidate in candidates {
                    let candidate = candidate.as_str().ok_or(Error::InvalidConfiguration("mimeneg.candidates must contain media types as strings".into()))?;
                    result.candidates.push(candidate.to_string());
                }
            }
            _ => {
                return Err(Error::InvalidConfiguration("mimeneg.candidates must be a list of media types".into()));
            }
        }
    }

    Ok(result)
}
