//! Configuration validation

use crate::AppConfig;
use std::collections::HashSet;
use url::Url;
use vigil_core::{Error, Result};

/// Validate configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    validate_schedule(config)?;

    validate_components(config)?;

    validate_listen_address(config)?;

    Ok(())
}

fn validate_schedule(config: &AppConfig) -> Result<()> {
    if config.check_interval_seconds == 0 {
        return Err(Error::config("check_interval_seconds must be > 0"));
    }

    if config.check_interval_seconds > 3600 {
        tracing::warn!(
            interval = config.check_interval_seconds,
            "check_interval_seconds is very high (>1 hour)"
        );
    }

    Ok(())
}

fn validate_listen_address(config: &AppConfig) -> Result<()> {
    let address = config.bind_address();
    let invalid = |reason: &str| {
        Error::Config(format!(
            "Invalid listen_address '{}': {reason}",
            config.listen_address
        ))
    };

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;

    if host.is_empty() {
        return Err(invalid("missing host"));
    }

    port.parse::<u16>().map_err(|_| invalid("port must be a number from 0 to 65535"))?;

    Ok(())
}

fn validate_components(config: &AppConfig) -> Result<()> {
    if config.components.is_empty() {
        tracing::warn!("No components configured; /health will always report ok");
    }

    let mut seen = HashSet::new();

    for component in &config.components {
        if component.name.trim().is_empty() {
            return Err(Error::config("component name cannot be empty"));
        }

        if !seen.insert(component.name.as_str()) {
            return Err(Error::Config(format!(
                "duplicate component name: {}",
                component.name
            )));
        }

        let url = Url::parse(&component.endpoint).map_err(|e| {
            Error::Config(format!(
                "component '{}' has invalid endpoint '{}': {e}",
                component.name, component.endpoint
            ))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "component '{}' endpoint must use http or https, got '{other}'",
                    component.name
                )));
            }
        }
    }

    Ok(())
}
