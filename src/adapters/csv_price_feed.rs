//! CSV price replay adapter.
//!
//! Replays a price series from a CSV file, one observation per row, price
//! in the first column. A non-numeric first row is treated as a header.
//! Non-positive prices never reach the core: such rows are dropped and
//! counted so the driver can warn about them.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::error::MeanrevError;
use crate::ports::price_port::PricePort;

pub struct CsvPriceFeed {
    prices: VecDeque<f64>,
    skipped_rows: usize,
}

impl CsvPriceFeed {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MeanrevError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MeanrevError::PriceFeed {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MeanrevError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut prices = VecDeque::new();
        let mut skipped_rows = 0usize;

        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| MeanrevError::PriceFeed {
                reason: format!("CSV parse error: {e}"),
            })?;

            let field = record.get(0).unwrap_or("").trim();
            if field.is_empty() {
                continue;
            }

            let price: f64 = match field.parse() {
                Ok(p) => p,
                Err(_) if index == 0 => continue, // header row
                Err(e) => {
                    return Err(MeanrevError::PriceFeed {
                        reason: format!("invalid price on row {}: {}", index + 1, e),
                    });
                }
            };

            if price > 0.0 && price.is_finite() {
                prices.push_back(price);
            } else {
                skipped_rows += 1;
            }
        }

        Ok(CsvPriceFeed {
            prices,
            skipped_rows,
        })
    }

    /// Rows dropped for carrying a non-positive or non-finite price.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn remaining(&self) -> usize {
        self.prices.len()
    }
}

impl PricePort for CsvPriceFeed {
    fn next_price(&mut self) -> Result<Option<f64>, MeanrevError> {
        Ok(self.prices.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(content: &str) -> CsvPriceFeed {
        CsvPriceFeed::from_reader(content.as_bytes()).unwrap()
    }

    fn drain(feed: &mut CsvPriceFeed) -> Vec<f64> {
        let mut prices = Vec::new();
        while let Some(price) = feed.next_price().unwrap() {
            prices.push(price);
        }
        prices
    }

    #[test]
    fn plain_price_rows() {
        let mut feed = feed("10.5\n9.25\n8.0\n");
        assert_eq!(feed.remaining(), 3);
        assert_eq!(drain(&mut feed), vec![10.5, 9.25, 8.0]);
        assert_eq!(feed.next_price().unwrap(), None);
    }

    #[test]
    fn header_row_is_skipped() {
        let mut feed = feed("price\n10.5\n9.25\n");
        assert_eq!(drain(&mut feed), vec![10.5, 9.25]);
    }

    #[test]
    fn extra_columns_ignored() {
        let mut feed = feed("timestamp,price\n10.5,ignored\n9.25,also ignored\n");
        // First column is the price; the header's "timestamp" is non-numeric
        assert_eq!(drain(&mut feed), vec![10.5, 9.25]);
    }

    #[test]
    fn non_positive_prices_are_dropped_and_counted() {
        let mut feed = feed("10.0\n0.0\n-3.5\n9.0\n");
        assert_eq!(feed.skipped_rows(), 2);
        assert_eq!(drain(&mut feed), vec![10.0, 9.0]);
    }

    #[test]
    fn garbage_after_first_row_is_an_error() {
        let result = CsvPriceFeed::from_reader("10.0\nnot a price\n".as_bytes());
        assert!(matches!(result, Err(MeanrevError::PriceFeed { .. })));
    }

    #[test]
    fn empty_file_yields_empty_feed() {
        let mut feed = feed("");
        assert_eq!(feed.remaining(), 0);
        assert_eq!(feed.next_price().unwrap(), None);
    }

    #[test]
    fn missing_file_errors() {
        assert!(matches!(
            CsvPriceFeed::from_file("/nonexistent/prices.csv"),
            Err(MeanrevError::PriceFeed { .. })
        ));
    }
}
