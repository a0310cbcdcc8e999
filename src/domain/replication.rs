//! Replication bookkeeping types
//!
//! [`WalLsn`] is a validated write-ahead-log position, [`ReplicationSummary`]
//! is one row of the externally maintained replication summary table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// PostgreSQL log sequence number
///
/// Textual form is two hexadecimal halves separated by a slash (`16/B374D848`).
/// Ordering compares the full 64-bit position, `high << 32 | low`, so
/// `1/0` sorts after `0/FFFFFFFF` even though the low half is shorter.
///
/// # Examples
///
/// ```
/// use claims_reporting::domain::replication::WalLsn;
/// use std::str::FromStr;
///
/// let older = WalLsn::from_str("0/16B6C40").unwrap();
/// let newer = WalLsn::from_str("0/16B6C70").unwrap();
/// assert!(older < newer);
/// assert_eq!(newer.to_string(), "0/16B6C70");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalLsn(u64);

impl WalLsn {
    /// Parses an LSN from its `high/low` text form
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        let (high, low) = trimmed
            .split_once('/')
            .ok_or_else(|| format!("Invalid WAL LSN '{trimmed}': expected <high>/<low>"))?;

        let high = u32::from_str_radix(high, 16)
            .map_err(|e| format!("Invalid WAL LSN '{trimmed}': {e}"))?;
        let low = u32::from_str_radix(low, 16)
            .map_err(|e| format!("Invalid WAL LSN '{trimmed}': {e}"))?;

        Ok(Self((u64::from(high) << 32) | u64::from(low)))
    }

    /// Returns the position as a single integer
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for WalLsn {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for WalLsn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WalLsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}/{:X}", self.0 >> 32, self.0 & 0xFFFF_FFFF)
    }
}

impl PartialOrd for WalLsn {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WalLsn {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Expected state of one replicated table as of one summary date
///
/// The WAL position is kept as the raw text the replication process wrote so
/// failure messages can quote it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    /// Table name, unqualified
    pub table_name: String,

    /// Rows the table held at the end of the summary date
    pub record_count: i64,

    /// Rows updated during the summary date
    pub updated_count: i64,

    /// WAL position recorded alongside the counts
    pub wal_lsn: String,
}

impl ReplicationSummary {
    /// Creates a new summary row
    pub fn new(
        table_name: impl Into<String>,
        record_count: i64,
        updated_count: i64,
        wal_lsn: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            record_count,
            updated_count,
            wal_lsn: wal_lsn.into(),
        }
    }

    /// Parses the recorded WAL position
    pub fn lsn(&self) -> Result<WalLsn, String> {
        WalLsn::parse(&self.wal_lsn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0/16B6C40", "0/16B6C50", Ordering::Less ; "same segment")]
    #[test_case("0/16B6C70", "0/16B6C60", Ordering::Greater ; "ahead")]
    #[test_case("1/0", "0/FFFFFFFF", Ordering::Greater ; "high half dominates")]
    #[test_case("0/0000000A", "0/A", Ordering::Equal ; "zero padding ignored")]
    fn test_lsn_ordering(left: &str, right: &str, expected: Ordering) {
        let left = WalLsn::parse(left).unwrap();
        let right = WalLsn::parse(right).unwrap();
        assert_eq!(left.cmp(&right), expected);
    }

    #[test]
    fn test_lsn_as_u64() {
        let lsn = WalLsn::parse("16/B374D848").unwrap();
        assert_eq!(lsn.as_u64(), 0x16_B374_D848);
        assert_eq!(WalLsn::from(0x16_B374_D848).to_string(), "16/B374D848");
    }

    #[test]
    fn test_lsn_parse_trims_whitespace() {
        assert!(WalLsn::parse(" 0/16B6C40 \n").is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("16B6C40" ; "missing separator")]
    #[test_case("0/XYZ" ; "not hex")]
    #[test_case("100000000/0" ; "high half overflow")]
    fn test_lsn_parse_invalid(input: &str) {
        assert!(WalLsn::parse(input).is_err());
    }

    #[test]
    fn test_summary_lsn() {
        let summary = ReplicationSummary::new("claim", 3, 1, "0/16B6C40");
        assert_eq!(summary.lsn().unwrap(), WalLsn::parse("0/16B6C40").unwrap());

        let broken = ReplicationSummary::new("claim", 3, 1, "garbage");
        assert!(broken.lsn().is_err());
    }
}
