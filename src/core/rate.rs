//! Published mid rates and the table that holds them

use crate::core::error::RateError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Code of the currency every published mid is quoted against.
pub const BASE_CODE: &str = "PLN";
pub const BASE_NAME: &str = "Polish Złoty";

/// One unit of `code` expressed in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    name: String,
    code: String,
    mid: f64,
}

impl CurrencyRate {
    pub fn new(name: &str, code: &str, mid: f64) -> Result<Self, RateError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(RateError::EmptyCode);
        }
        if !mid.is_finite() || mid <= 0.0 {
            return Err(RateError::InvalidMid { code, mid });
        }
        Ok(CurrencyRate {
            name: name.to_string(),
            code,
            mid,
        })
    }

    pub fn base() -> Self {
        CurrencyRate {
            name: BASE_NAME.to_string(),
            code: BASE_CODE.to_string(),
            mid: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn mid(&self) -> f64 {
        self.mid
    }

    pub fn is_base(&self) -> bool {
        self.code == BASE_CODE
    }

    pub fn same_currency(&self, other: &CurrencyRate) -> bool {
        self.code == other.code
    }
}

/// Latest published table, base entry first, unique by code.
///
/// Replaced wholesale on refresh; never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    effective_date: Option<NaiveDate>,
    rates: Vec<CurrencyRate>,
}

impl RateTable {
    /// Builds a table from upstream entries given as `(name, code, mid)`.
    ///
    /// Entries with an unusable mid and repeated codes are dropped. An
    /// upstream entry carrying the base code loses to the synthetic one.
    pub fn from_published<I, S>(effective_date: Option<NaiveDate>, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let base = CurrencyRate::base();
        seen.insert(base.code.clone());
        let mut rates = vec![base];

        for (name, code, mid) in entries {
            match CurrencyRate::new(name.as_ref(), code.as_ref(), mid) {
                Ok(rate) => {
                    if seen.insert(rate.code.clone()) {
                        rates.push(rate);
                    } else {
                        debug!(code = %rate.code, "Skipping duplicate currency code");
                    }
                }
                Err(e) => warn!("Dropping malformed rate entry: {e}"),
            }
        }

        RateTable {
            effective_date,
            rates,
        }
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyRate> {
        let code = code.trim();
        self.rates.iter().find(|r| r.code.eq_ignore_ascii_case(code))
    }

    pub fn rates(&self) -> &[CurrencyRate] {
        &self.rates
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyRate> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Never true for a constructed table; the base entry is always present.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RateTable {
        RateTable::from_published(
            NaiveDate::from_ymd_opt(2024, 1, 2),
            vec![
                ("US Dollar", "USD", 4.00),
                ("Euro", "EUR", 4.30),
                ("Swiss Franc", "CHF", 4.65),
            ],
        )
    }

    #[test]
    fn test_base_entry_is_prepended() {
        let table = sample_table();
        assert_eq!(table.len(), 4);
        let first = &table.rates()[0];
        assert_eq!(first.code(), "PLN");
        assert_eq!(first.mid(), 1.0);
        assert!(first.is_base());
        assert_eq!(table.rates()[1].code(), "USD");
        assert_eq!(table.rates()[3].code(), "CHF");
    }

    #[test]
    fn test_malformed_and_duplicate_entries_are_dropped() {
        let table = RateTable::from_published(
            None,
            vec![
                ("US Dollar", "USD", 4.00),
                ("Broken", "XXX", 0.0),
                ("Negative", "YYY", -1.5),
                ("Not a number", "ZZZ", f64::NAN),
                ("Dollar again", "usd", 3.99),
                ("Upstream zloty", "PLN", 1.01),
                ("", "", 2.0),
            ],
        );
        let codes: Vec<_> = table.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["PLN", "USD"]);
        assert_eq!(table.get("USD").unwrap().mid(), 4.00);
        assert_eq!(table.get("PLN").unwrap().mid(), 1.0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = sample_table();
        assert_eq!(table.get("eur").unwrap().name(), "Euro");
        assert_eq!(table.get(" chf ").unwrap().code(), "CHF");
        assert!(table.get("GBP").is_none());
        assert_eq!(
            table.effective_date(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_currency_rate_validation() {
        assert_eq!(
            CurrencyRate::new("Euro", "  ", 4.3),
            Err(RateError::EmptyCode)
        );
        assert!(matches!(
            CurrencyRate::new("Euro", "EUR", 0.0),
            Err(RateError::InvalidMid { .. })
        ));
        assert!(CurrencyRate::new("Euro", "EUR", f64::INFINITY).is_err());

        let rate = CurrencyRate::new("euro", "eur", 4.3).unwrap();
        assert_eq!(rate.code(), "EUR");
        assert!(!rate.is_base());
    }

    #[test]
    fn test_empty_upstream_still_has_base() {
        let table = RateTable::from_published::<Vec<(&str, &str, f64)>, &str>(None, vec![]);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}
