//! Rate table types.
//!
//! This module contains the strongly-typed structures deserialized from a rate
//! table source (`aliquotas.json` or its YAML equivalent) and the date-interval
//! lookup performed against them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::models::TaxType;

/// A percentage valid over the half-open interval `[valid_from, valid_to)`.
///
/// # Example
///
/// ```
/// use fiscal_audit::config::RateEntry;
/// use chrono::NaiveDate;
///
/// let entry: RateEntry = serde_json::from_str(
///     r#"{"percentual": 1.65, "vigencia_inicio": "2003-01-01", "vigencia_fim": "2027-01-01"}"#,
/// ).unwrap();
///
/// assert!(entry.covers(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()));
/// assert!(!entry.covers(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    /// The tax rate as a percentage (1.65 means 1.65%).
    #[serde(rename = "percentual")]
    pub percentage: Decimal,
    /// First day the rate applies.
    #[serde(rename = "vigencia_inicio")]
    pub valid_from: NaiveDate,
    /// First day the rate no longer applies; `None` means open-ended.
    #[serde(rename = "vigencia_fim", default)]
    pub valid_to: Option<NaiveDate>,
}

impl RateEntry {
    /// Returns true when `date` falls inside `[valid_from, valid_to)`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_to.is_none_or(|end| date < end)
    }

    fn overlaps(&self, other: &RateEntry) -> bool {
        let self_before_other = self.valid_to.is_some_and(|end| end <= other.valid_from);
        let other_before_self = other.valid_to.is_some_and(|end| end <= self.valid_from);
        !self_before_other && !other_before_self
    }
}

/// The rates of one tax type.
///
/// The shape of the source decides the variant: a list of entries is a
/// nationally uniform schedule, an object of lists is keyed by jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateSchedule {
    /// One sequence of entries for the whole country.
    Uniform(Vec<RateEntry>),
    /// One sequence of entries per jurisdiction (UF) code.
    ByJurisdiction(BTreeMap<String, Vec<RateEntry>>),
}

impl RateSchedule {
    /// Returns the entry sequence applicable to a jurisdiction.
    ///
    /// Uniform schedules ignore the jurisdiction; jurisdiction-keyed schedules
    /// need one that is present in the map.
    pub fn entries(&self, jurisdiction: Option<&str>) -> Option<&[RateEntry]> {
        match self {
            RateSchedule::Uniform(entries) => Some(entries),
            RateSchedule::ByJurisdiction(by_code) => {
                by_code.get(jurisdiction?).map(Vec::as_slice)
            }
        }
    }

    fn sequences(&self) -> Vec<(Option<&str>, &[RateEntry])> {
        match self {
            RateSchedule::Uniform(entries) => vec![(None, entries.as_slice())],
            RateSchedule::ByJurisdiction(by_code) => by_code
                .iter()
                .map(|(code, entries)| (Some(code.as_str()), entries.as_slice()))
                .collect(),
        }
    }
}

/// A problem found in a rate table that does not prevent its use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTableWarning {
    /// The rate table key.
    pub tax_key: String,
    /// The jurisdiction, for jurisdiction-keyed schedules.
    pub jurisdiction: Option<String>,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for RateTableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.jurisdiction {
            Some(code) => write!(f, "{}[{}]: {}", self.tax_key, code, self.message),
            None => write!(f, "{}: {}", self.tax_key, self.message),
        }
    }
}

/// The time-versioned rate table, keyed by tax-type name.
///
/// Immutable once loaded. One table is loaded per audit run and borrowed by the
/// batch auditor for the duration of that run.
///
/// # Example
///
/// ```
/// use fiscal_audit::config::RateTable;
/// use fiscal_audit::models::TaxType;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let table = RateTable::from_json_str(r#"{
///     "PIS": [{"percentual": "1.65", "vigencia_inicio": "2003-01-01", "vigencia_fim": null}],
///     "ICMS": {"SP": [{"percentual": "18", "vigencia_inicio": "2016-01-01"}]}
/// }"#).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
/// assert_eq!(table.lookup_rate(TaxType::Pis, date, None), Some(Decimal::new(165, 2)));
/// assert_eq!(table.lookup_rate(TaxType::Icms, date, Some("SP")), Some(Decimal::new(18, 0)));
/// assert_eq!(table.lookup_rate(TaxType::Icms, date, Some("ZZ")), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    schedules: BTreeMap<String, RateSchedule>,
}

impl RateTable {
    /// Creates a table from its schedules.
    pub fn new(schedules: BTreeMap<String, RateSchedule>) -> Self {
        Self { schedules }
    }

    /// Parses a table from JSON text.
    pub fn from_json_str(content: &str) -> AuditResult<Self> {
        serde_json::from_str(content).map_err(|e| AuditError::RateSourceParseError {
            source_name: "inline".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a table from YAML text.
    pub fn from_yaml_str(content: &str) -> AuditResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AuditError::RateSourceParseError {
            source_name: "inline".to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the schedule stored for a tax type.
    pub fn schedule(&self, tax: TaxType) -> Option<&RateSchedule> {
        self.schedules.get(tax.key())
    }

    /// Returns every key in the table, including keys for taxes the engine does not audit.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schedules.keys().map(String::as_str)
    }

    /// Returns the number of schedules in the table.
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    /// Returns true when the table has no schedules.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Looks up the percentage applicable to a tax on a date.
    ///
    /// Entries are scanned in stored order and the first one covering `date`
    /// wins. Returns `None` when the tax type is not in the table, when the
    /// schedule is jurisdiction-keyed and `jurisdiction` is missing or unknown,
    /// or when no entry covers the date. `None` means "no expectation", not an error.
    pub fn lookup_rate(
        &self,
        tax: TaxType,
        date: NaiveDate,
        jurisdiction: Option<&str>,
    ) -> Option<Decimal> {
        self.schedule(tax)?
            .entries(jurisdiction)?
            .iter()
            .find(|entry| entry.covers(date))
            .map(|entry| entry.percentage)
    }

    /// Looks up a rate for a date given as ISO 8601 text.
    ///
    /// Only the first 10 characters are read, so date-times are accepted. Text
    /// that is not a valid date yields `None`.
    pub fn lookup_rate_iso(
        &self,
        tax: TaxType,
        date: &str,
        jurisdiction: Option<&str>,
    ) -> Option<Decimal> {
        let date = parse_iso_day(date)?;
        self.lookup_rate(tax, date, jurisdiction)
    }

    /// Reports overlapping and empty intervals.
    ///
    /// Overlaps are legal (first match wins) but usually a data-entry mistake.
    pub fn warnings(&self) -> Vec<RateTableWarning> {
        let mut warnings = Vec::new();
        for (key, schedule) in &self.schedules {
            for (jurisdiction, entries) in schedule.sequences() {
                let mut push = |message: String| {
                    warnings.push(RateTableWarning {
                        tax_key: key.clone(),
                        jurisdiction: jurisdiction.map(str::to_string),
                        message,
                    })
                };

                for (i, entry) in entries.iter().enumerate() {
                    if entry.valid_to.is_some_and(|end| end <= entry.valid_from) {
                        push(format!(
                            "entry {} has an empty interval starting {}",
                            i, entry.valid_from
                        ));
                    }
                    for (j, later) in entries.iter().enumerate().skip(i + 1) {
                        if entry.overlaps(later) {
                            push(format!("entries {} and {} overlap; entry {} wins", i, j, i));
                        }
                    }
                }
            }
        }
        warnings
    }
}

/// Parses the day part of an ISO 8601 date or date-time.
pub(crate) fn parse_iso_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
