//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_price_feed::CsvPriceFeed;
use crate::adapters::csv_trade_log::{read_trade_log, CsvTradeLog};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::engine::{EngineConfig, StrategyEngine};
use crate::domain::error::MeanrevError;
use crate::domain::ledger::LedgerSummary;
use crate::domain::stats::SessionStats;
use crate::domain::trade::TradeRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::trade_log_port::TradeLogPort;

#[derive(Parser, Debug)]
#[command(name = "meanrev", about = "Mean-reversion trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a CSV price series through the strategy
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV (overrides [feed] prices)
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// Trade log output (overrides [log] trades)
        #[arg(short, long)]
        log: Option<PathBuf>,
        /// Suppress per-step status lines
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Recompute session statistics from a saved trade log
    Stats {
        #[arg(short, long)]
        log: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        risk_free_rate: f64,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Replay {
            config,
            prices,
            log,
            quiet,
        } => run_replay(&config, prices.as_ref(), log.as_ref(), quiet),
        Command::Validate { config } => run_validate(&config),
        Command::Stats {
            log,
            risk_free_rate,
        } => run_stats(&log, risk_free_rate),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MeanrevError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_engine_config(adapter: &dyn ConfigPort) -> EngineConfig {
    EngineConfig {
        initial_cash: adapter.get_double("simulation", "initial_cash", 10_000.0),
        ma_period: adapter.get_int("simulation", "ma_period", 20) as usize,
        slippage_rate: adapter.get_double("simulation", "slippage_rate", 0.001),
    }
}

fn run_replay(
    config_path: &PathBuf,
    prices_override: Option<&PathBuf>,
    log_override: Option<&PathBuf>,
    quiet: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let engine_config = build_engine_config(&adapter);
    let risk_free_rate = adapter.get_double("simulation", "risk_free_rate", 0.0);

    let prices_path = match prices_override {
        Some(p) => p.clone(),
        None => match adapter.get_string("feed", "prices") {
            Some(p) => PathBuf::from(p),
            None => {
                eprintln!("error: no price file (use --prices or set [feed] prices)");
                return ExitCode::from(2);
            }
        },
    };

    let log_path = match log_override {
        Some(p) => p.clone(),
        None => match adapter.get_string("log", "trades") {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(Utc::now().format("trades_%Y%m%d_%H%M%S.csv").to_string()),
        },
    };

    let mut feed = match CsvPriceFeed::from_file(&prices_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if feed.skipped_rows() > 0 {
        eprintln!(
            "warning: dropped {} non-positive price row(s) from {}",
            feed.skipped_rows(),
            prices_path.display(),
        );
    }

    let mut trade_log = match CsvTradeLog::create(&log_path) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut engine = match StrategyEngine::new(engine_config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Replaying {} price(s): cash {:.2}, period {}, slippage {:.4}%",
        feed.remaining(),
        engine.config().initial_cash,
        engine.config().ma_period,
        engine.config().slippage_rate * 100.0,
    );

    let mut last_price = None;
    loop {
        let price = match feed.next_price() {
            Ok(Some(p)) => p,
            Ok(None) => break,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        last_price = Some(price);

        let status = match engine.step(Utc::now(), price) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if let Some(trade) = &status.trade {
            eprintln!(
                "{}  {:.6} @ {:.4} | slippage {:.4} | pnl {:+.2} | total {:.2}",
                trade.side,
                trade.quantity,
                trade.price,
                trade.slippage,
                trade.realized_pnl,
                trade.total_value,
            );
            if let Err(e) = trade_log.append(trade) {
                eprintln!("error: {e}");
                return (&e).into();
            }
        } else if !quiet {
            match status.trailing_average {
                Some(avg) => eprintln!(
                    "price {:.4} | avg {:.4} | {} | total {:.2} | pnl {:+.2}",
                    status.price,
                    avg,
                    status.position,
                    status.total_value,
                    status.cumulative_pnl,
                ),
                None => eprintln!(
                    "price {:.4} | collecting data ({} more needed)",
                    status.price,
                    engine.warm_up_remaining(),
                ),
            }
        }
    }

    match last_price {
        Some(price) => {
            print_ledger_summary(&engine.ledger().summary(price));
            print_session_stats(&SessionStats::compute(engine.trades(), risk_free_rate));
        }
        None => eprintln!("No prices replayed"),
    }

    eprintln!("\nTrade log written to: {}", log_path.display());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let engine_config = build_engine_config(&adapter);
    eprintln!("\nSimulation parameters:");
    eprintln!("  initial_cash:  {:.2}", engine_config.initial_cash);
    eprintln!("  ma_period:     {}", engine_config.ma_period);
    eprintln!("  slippage_rate: {}", engine_config.slippage_rate);
    match adapter.get_string("feed", "prices") {
        Some(p) => eprintln!("  price feed:    {p}"),
        None => eprintln!("  price feed:    (pass --prices at replay time)"),
    }

    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn run_stats(log_path: &PathBuf, risk_free_rate: f64) -> ExitCode {
    let trades: Vec<TradeRecord> = match read_trade_log(log_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Read {} trade(s) from {}", trades.len(), log_path.display());
    print_session_stats(&SessionStats::compute(&trades, risk_free_rate));
    ExitCode::SUCCESS
}

fn print_ledger_summary(summary: &LedgerSummary) {
    eprintln!("\n=== Portfolio Summary ===");
    eprintln!("Cash:            {:>12.2}", summary.cash);
    eprintln!("Holdings:        {:>12.6}", summary.position_quantity);
    eprintln!("Cost Basis:      {:>12.4}", summary.cost_basis);
    eprintln!("Market Price:    {:>12.4}", summary.current_price);
    eprintln!("Market Value:    {:>12.2}", summary.market_value);
    eprintln!("Total Value:     {:>12.2}", summary.total_value);
    eprintln!("Initial Cash:    {:>12.2}", summary.initial_cash);
    eprintln!("Total P&L:       {:>+12.2}", summary.total_pnl);
    eprintln!("Total P&L %:     {:>+11.2}%", summary.total_pnl_pct);
    eprintln!("Unrealized P&L:  {:>+12.2}", summary.unrealized_pnl);
    eprintln!("Total Trades:    {:>12}", summary.trade_count);
}

fn print_session_stats(stats: &SessionStats) {
    eprintln!("\n=== Session Statistics ===");
    eprintln!("Total Trades:      {:>10}", stats.total_trades);
    eprintln!("Win Rate:          {:>9.1}%", stats.win_rate * 100.0);
    eprintln!("Total P&L:         {:>+10.2}", stats.total_pnl);
    eprintln!("Max Drawdown:      {:>10.2}", stats.max_drawdown);
    eprintln!("Avg P&L per Trade: {:>+10.2}", stats.avg_pnl_per_trade);
    eprintln!("Best Trade:        {:>+10.2}", stats.best_trade);
    eprintln!("Worst Trade:       {:>+10.2}", stats.worst_trade);
    eprintln!("Sharpe Ratio:      {:>10.2}", stats.sharpe_ratio);
}
