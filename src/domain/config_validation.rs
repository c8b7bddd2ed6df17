//! Configuration validation.
//!
//! Validates every field the engine reads before the loop starts, so a bad
//! config fails fast at the CLI instead of mid-tick.

use crate::domain::error::TradeLoopError;
use crate::ports::config_port::ConfigPort;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    validate_interval(config)?;
    validate_timeouts(config)?;
    validate_sizing(config)?;
    validate_retries(config)?;
    validate_indicators(config)?;
    validate_symbols(config)?;
    Ok(())
}

/// Split a comma-separated symbol list, trimming and dropping empties.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn invalid(section: &str, key: &str, reason: &str) -> TradeLoopError {
    TradeLoopError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    let interval = config.get_int("engine", "interval_secs", 60);
    if interval <= 0 {
        return Err(invalid("engine", "interval_secs", "interval_secs must be positive"));
    }
    let report_every = config.get_int("engine", "report_every", 10);
    if report_every < 0 {
        return Err(invalid(
            "engine",
            "report_every",
            "report_every must be non-negative (0 disables reports)",
        ));
    }
    Ok(())
}

fn validate_timeouts(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    for key in ["fetch_timeout_secs", "submit_timeout_secs"] {
        let value = config.get_int("engine", key, 10);
        if value <= 0 {
            return Err(invalid("engine", key, "timeout must be positive"));
        }
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    let base_fraction = config.get_double("sizing", "base_fraction", 0.05);
    if base_fraction <= 0.0 || base_fraction > 1.0 {
        return Err(invalid(
            "sizing",
            "base_fraction",
            "base_fraction must be in (0, 1]",
        ));
    }
    for key in ["crypto_equity_confidence", "option_confidence"] {
        let value = config.get_double("sizing", key, 0.5);
        if value <= 0.0 || value > 1.0 {
            return Err(invalid("sizing", key, "confidence must be in (0, 1]"));
        }
    }
    for key in ["stop_loss_pct", "take_profit_pct"] {
        let value = config.get_double("sizing", key, 5.0);
        if value < 0.0 || value >= 100.0 {
            return Err(invalid("sizing", key, "percentage must be in [0, 100)"));
        }
    }
    Ok(())
}

fn validate_retries(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    let max_retries = config.get_int("execution", "max_retries", 3);
    if max_retries < 1 {
        return Err(invalid(
            "execution",
            "max_retries",
            "max_retries must be at least 1",
        ));
    }
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    if config.get_int("indicators", "kernel_window", 6) < 2 {
        return Err(invalid(
            "indicators",
            "kernel_window",
            "kernel_window must be at least 2",
        ));
    }
    for key in ["kernel_fast_h", "kernel_slow_h", "kernel_r", "bollinger_width"] {
        let value = config.get_double("indicators", key, 1.0);
        if value <= 0.0 {
            return Err(invalid("indicators", key, "value must be positive"));
        }
    }
    if config.get_int("indicators", "rsi_period", 14) < 1 {
        return Err(invalid(
            "indicators",
            "rsi_period",
            "rsi_period must be at least 1",
        ));
    }
    if config.get_int("indicators", "bollinger_period", 20) < 2 {
        return Err(invalid(
            "indicators",
            "bollinger_period",
            "bollinger_period must be at least 2",
        ));
    }
    if config.get_int("indicators", "momentum_lag", 5) < 1 {
        return Err(invalid(
            "indicators",
            "momentum_lag",
            "momentum_lag must be at least 1",
        ));
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TradeLoopError> {
    let crypto = parse_symbol_list(&config.get_string("symbols", "crypto").unwrap_or_default());
    let equity = parse_symbol_list(&config.get_string("symbols", "equity").unwrap_or_default());
    let options = parse_symbol_list(&config.get_string("symbols", "options").unwrap_or_default());

    if crypto.is_empty() && equity.is_empty() && options.is_empty() {
        return Err(invalid(
            "symbols",
            "crypto",
            "at least one symbol must be configured",
        ));
    }
    // The mean-reversion strategy is calibrated for one designated symbol.
    if equity.len() > 1 {
        return Err(invalid(
            "symbols",
            "equity",
            "mean reversion supports a single designated equity symbol",
        ));
    }
    Ok(())
}
