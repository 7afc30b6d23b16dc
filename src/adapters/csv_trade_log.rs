//! CSV trade log adapter.
//!
//! Appends trade records to a CSV file with a stable column order, and
//! reads them back for offline statistics. Timestamps are RFC 3339 in UTC.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::error::MeanrevError;
use crate::domain::trade::{Side, TradeRecord};
use crate::ports::trade_log_port::TradeLogPort;

/// Stable column order consumed by persistence and display collaborators.
pub const TRADE_LOG_HEADERS: [&str; 9] = [
    "timestamp",
    "action",
    "price",
    "quantity",
    "slippage",
    "total_value",
    "pnl",
    "cumulative_pnl",
    "ma_value",
];

pub struct CsvTradeLog {
    writer: csv::Writer<File>,
}

impl CsvTradeLog {
    /// Create (or truncate) the log file and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, MeanrevError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MeanrevError::TradeLog {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(TRADE_LOG_HEADERS)
            .and_then(|()| writer.flush().map_err(csv::Error::from))
            .map_err(|e| MeanrevError::TradeLog {
                reason: format!("failed to write header: {e}"),
            })?;
        Ok(CsvTradeLog { writer })
    }
}

impl TradeLogPort for CsvTradeLog {
    fn append(&mut self, record: &TradeRecord) -> Result<(), MeanrevError> {
        self.writer
            .write_record([
                record.executed_at.to_rfc3339(),
                record.side.to_string(),
                record.price.to_string(),
                record.quantity.to_string(),
                record.slippage.to_string(),
                record.total_value.to_string(),
                record.realized_pnl.to_string(),
                record.cumulative_pnl.to_string(),
                record.trailing_average.to_string(),
            ])
            .and_then(|()| self.writer.flush().map_err(csv::Error::from))
            .map_err(|e| MeanrevError::TradeLog {
                reason: format!("failed to append record: {e}"),
            })
    }
}

/// Read a full trade log back, in file order.
pub fn read_trade_log<P: AsRef<Path>>(path: P) -> Result<Vec<TradeRecord>, MeanrevError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeanrevError::TradeLog {
        reason: format!("failed to open {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row = result.map_err(|e| MeanrevError::TradeLog {
            reason: format!("CSV parse error: {e}"),
        })?;
        records.push(parse_row(&row, index + 2)?);
    }

    Ok(records)
}

fn parse_row(row: &csv::StringRecord, line: usize) -> Result<TradeRecord, MeanrevError> {
    fn field<'a>(
        row: &'a csv::StringRecord,
        index: usize,
        name: &str,
        line: usize,
    ) -> Result<&'a str, MeanrevError> {
        row.get(index).ok_or_else(|| MeanrevError::TradeLog {
            reason: format!("missing {name} column on line {line}"),
        })
    }

    fn number(
        row: &csv::StringRecord,
        index: usize,
        name: &str,
        line: usize,
    ) -> Result<f64, MeanrevError> {
        field(row, index, name, line)?
            .parse()
            .map_err(|e| MeanrevError::TradeLog {
                reason: format!("invalid {name} on line {line}: {e}"),
            })
    }

    let executed_at = DateTime::parse_from_rfc3339(field(row, 0, "timestamp", line)?)
        .map_err(|e| MeanrevError::TradeLog {
            reason: format!("invalid timestamp on line {line}: {e}"),
        })?
        .with_timezone(&Utc);

    let side = Side::from_str(field(row, 1, "action", line)?).map_err(|e| {
        MeanrevError::TradeLog {
            reason: format!("invalid action on line {line}: {e}"),
        }
    })?;

    Ok(TradeRecord {
        executed_at,
        side,
        price: number(row, 2, "price", line)?,
        quantity: number(row, 3, "quantity", line)?,
        slippage: number(row, 4, "slippage", line)?,
        total_value: number(row, 5, "total_value", line)?,
        realized_pnl: number(row, 6, "pnl", line)?,
        cumulative_pnl: number(row, 7, "cumulative_pnl", line)?,
        trailing_average: number(row, 8, "ma_value", line)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn sample_record(side: Side, realized_pnl: f64) -> TradeRecord {
        TradeRecord {
            executed_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap(),
            side,
            price: 151.25,
            quantity: 66.115702,
            slippage: 0.15125,
            total_value: 10_002.5,
            realized_pnl,
            cumulative_pnl: 2.5,
            trailing_average: 152.0,
        }
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");

        let mut log = CsvTradeLog::create(&path).unwrap();
        log.append(&sample_record(Side::Buy, 0.0)).unwrap();
        log.append(&sample_record(Side::Sell, 42.0)).unwrap();
        drop(log);

        let records = read_trade_log(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], sample_record(Side::Buy, 0.0));
        assert_eq!(records[1], sample_record(Side::Sell, 42.0));
    }

    #[test]
    fn header_row_matches_stable_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        CsvTradeLog::create(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "timestamp,action,price,quantity,slippage,total_value,pnl,cumulative_pnl,ma_value"
        );
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");

        let mut log = CsvTradeLog::create(&path).unwrap();
        log.append(&sample_record(Side::Buy, 0.0)).unwrap();
        drop(log);

        CsvTradeLog::create(&path).unwrap();
        assert!(read_trade_log(&path).unwrap().is_empty());
    }

    #[test]
    fn read_missing_file_errors() {
        assert!(matches!(
            read_trade_log("/nonexistent/trades.csv"),
            Err(MeanrevError::TradeLog { .. })
        ));
    }

    #[test]
    fn read_rejects_bad_action() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        std::fs::write(
            &path,
            "timestamp,action,price,quantity,slippage,total_value,pnl,cumulative_pnl,ma_value\n\
             2025-06-01T12:30:00+00:00,HOLD,1,1,0,1,0,0,1\n",
        )
        .unwrap();

        let err = read_trade_log(&path).unwrap_err();
        assert!(matches!(err, MeanrevError::TradeLog { .. }));
        assert!(err.to_string().contains("invalid action"));
    }

    #[test]
    fn read_rejects_bad_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        std::fs::write(
            &path,
            "timestamp,action,price,quantity,slippage,total_value,pnl,cumulative_pnl,ma_value\n\
             2025-06-01T12:30:00+00:00,BUY,abc,1,0,1,0,0,1\n",
        )
        .unwrap();

        let err = read_trade_log(&path).unwrap_err();
        assert!(err.to_string().contains("invalid price"));
    }
}
