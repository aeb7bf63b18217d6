//! Configuration validation.
//!
//! Checks all server config fields before the web server starts.

use crate::domain::bollinger::{MULTIPLIER_RANGE, WINDOW_RANGE};
use crate::domain::error::BandviewError;
use crate::ports::config_port::ConfigPort;

pub fn validate_server_config(config: &dyn ConfigPort) -> Result<(), BandviewError> {
    validate_listen(config)?;
    validate_provider(config)?;
    validate_timeout(config)?;
    validate_chart_defaults(config)?;
    Ok(())
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), BandviewError> {
    if let Some(listen) = config.get_string("server", "listen") {
        listen
            .parse::<std::net::SocketAddr>()
            .map_err(|_| BandviewError::ConfigInvalid {
                section: "server".to_string(),
                key: "listen".to_string(),
                reason: format!("not a valid socket address: {listen}"),
            })?;
    }
    Ok(())
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), BandviewError> {
    let provider = config
        .get_string("data", "provider")
        .unwrap_or_else(|| "yahoo".to_string());

    match provider.as_str() {
        "yahoo" => Ok(()),
        "csv" => match config.get_string("data", "csv_dir") {
            Some(_) => Ok(()),
            None => Err(BandviewError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        other => Err(BandviewError::ConfigInvalid {
            section: "data".to_string(),
            key: "provider".to_string(),
            reason: format!("unknown provider '{other}' (expected yahoo or csv)"),
        }),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), BandviewError> {
    let timeout = config.get_int("data", "timeout_secs", 10);
    if timeout <= 0 {
        return Err(BandviewError::ConfigInvalid {
            section: "data".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_chart_defaults(config: &dyn ConfigPort) -> Result<(), BandviewError> {
    let window = config.get_int(
        "chart",
        "default_window",
        crate::domain::bollinger::DEFAULT_WINDOW as i64,
    );
    if !WINDOW_RANGE.contains(&(window as u32)) || window < 0 {
        return Err(BandviewError::ConfigInvalid {
            section: "chart".to_string(),
            key: "default_window".to_string(),
            reason: format!(
                "default_window must be between {} and {}",
                WINDOW_RANGE.start(),
                WINDOW_RANGE.end()
            ),
        });
    }

    let multiplier = config.get_int(
        "chart",
        "default_multiplier",
        crate::domain::bollinger::DEFAULT_MULTIPLIER as i64,
    );
    if !MULTIPLIER_RANGE.contains(&(multiplier as u32)) || multiplier < 0 {
        return Err(BandviewError::ConfigInvalid {
            section: "chart".to_string(),
            key: "default_multiplier".to_string(),
            reason: format!(
                "default_multiplier must be between {} and {}",
                MULTIPLIER_RANGE.start(),
                MULTIPLIER_RANGE.end()
            ),
        });
    }

    Ok(())
}
