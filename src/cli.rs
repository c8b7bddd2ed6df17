//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_notify_adapter::LogNotifyAdapter;
use crate::adapters::paper_broker_adapter::PaperBrokerAdapter;
use crate::adapters::system_clock_adapter::SystemClockAdapter;
use crate::domain::config_validation::{parse_symbol_list, validate_engine_config};
use crate::domain::engine::{Engine, EngineConfig, SymbolConfig};
use crate::domain::error::TradeLoopError;
use crate::domain::execution::RetryPolicy;
use crate::domain::indicator::IndicatorConfig;
use crate::domain::position::AssetClass;
use crate::domain::sizing::SizingParams;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "tradeloop", about = "Multi-strategy trading loop")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the trading loop
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Process a single tick and exit
        #[arg(long)]
        once: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, once } => run_loop(&config, once),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradeLoopError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_validate(path: &PathBuf) -> ExitCode {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match validate_engine_config(&config) {
        Ok(()) => {
            println!("config ok: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn run_loop(path: &PathBuf, once: bool) -> ExitCode {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    if let Err(err) = validate_engine_config(&config) {
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    let csv_dir = match config.get_string("data", "csv_dir") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let err = TradeLoopError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            };
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    let engine_config = build_engine_config(&config);
    let balance = config.get_double("broker", "paper_balance", 10_000.0);

    let mut engine = Engine::new(
        engine_config,
        CsvDataAdapter::new(csv_dir),
        PaperBrokerAdapter::new(balance),
        LogNotifyAdapter::new(),
        SystemClockAdapter::new(),
    );

    if once {
        engine.run_tick();
    } else {
        engine.run();
    }
    ExitCode::SUCCESS
}

pub fn build_engine_config(config: &dyn ConfigPort) -> EngineConfig {
    let indicators = IndicatorConfig {
        kernel_window: config.get_int("indicators", "kernel_window", 6) as usize,
        kernel_fast_h: config.get_double("indicators", "kernel_fast_h", 1.0),
        kernel_slow_h: config.get_double("indicators", "kernel_slow_h", 3.0),
        kernel_r: config.get_double("indicators", "kernel_r", 15.75),
        rsi_period: config.get_int("indicators", "rsi_period", 14) as usize,
        bollinger_period: config.get_int("indicators", "bollinger_period", 20) as usize,
        bollinger_width: config.get_double("indicators", "bollinger_width", 2.0),
        momentum_lag: config.get_int("indicators", "momentum_lag", 5) as usize,
    };
    let min_bars = config.get_int("indicators", "min_bars", indicators.min_bars() as i64) as usize;

    EngineConfig {
        symbols: build_symbols(config),
        tick_interval: Duration::from_secs(config.get_int("engine", "interval_secs", 60) as u64),
        report_every: config.get_int("engine", "report_every", 10) as u64,
        fetch_timeout: Duration::from_secs(
            config.get_int("engine", "fetch_timeout_secs", 10) as u64
        ),
        submit_timeout: Duration::from_secs(
            config.get_int("engine", "submit_timeout_secs", 10) as u64,
        ),
        fetch_window: config.get_int("engine", "fetch_window", 168) as usize,
        min_bars,
        indicators,
        sizing: SizingParams {
            base_fraction: config.get_double("sizing", "base_fraction", 0.05),
            crypto_equity_confidence: config.get_double(
                "sizing",
                "crypto_equity_confidence",
                0.70,
            ),
            option_confidence: config.get_double("sizing", "option_confidence", 0.50),
            stop_loss_pct: config.get_double("sizing", "stop_loss_pct", 5.0),
            take_profit_pct: config.get_double("sizing", "take_profit_pct", 10.0),
        },
        retry: RetryPolicy {
            max_retries: config.get_int("execution", "max_retries", 3) as u32,
        },
    }
}

fn build_symbols(config: &dyn ConfigPort) -> Vec<SymbolConfig> {
    let mut symbols = Vec::new();

    for symbol in parse_symbol_list(&config.get_string("symbols", "crypto").unwrap_or_default()) {
        symbols.push(SymbolConfig {
            symbol,
            asset_class: AssetClass::Crypto,
            strategy: StrategyKind::KernelCrossover,
        });
    }
    for symbol in parse_symbol_list(&config.get_string("symbols", "equity").unwrap_or_default()) {
        symbols.push(SymbolConfig {
            symbol,
            asset_class: AssetClass::Equity,
            strategy: StrategyKind::MeanReversion,
        });
    }
    for symbol in parse_symbol_list(&config.get_string("symbols", "options").unwrap_or_default())
    {
        symbols.push(SymbolConfig {
            symbol,
            asset_class: AssetClass::Option,
            strategy: StrategyKind::RsiMomentum,
        });
    }

    symbols
}
