//! Occupancy metrics carried by each observation row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A duration-bucketed occupancy metric.
///
/// Serialized as its dataset column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    #[serde(rename = "avg_total_users")]
    TotalUsers,
    #[serde(rename = "avg_users_under_10min")]
    UsersUnder10Min,
    #[serde(rename = "avg_users_10_30min")]
    Users10To30Min,
    #[serde(rename = "avg_users_over_30min")]
    UsersOver30Min,
}

impl Metric {
    /// All metrics, in dataset column order.
    pub const ALL: [Metric; 4] = [
        Metric::TotalUsers,
        Metric::UsersUnder10Min,
        Metric::Users10To30Min,
        Metric::UsersOver30Min,
    ];

    /// Position of this metric inside [`Metric::ALL`].
    pub fn index(self) -> usize {
        match self {
            Metric::TotalUsers => 0,
            Metric::UsersUnder10Min => 1,
            Metric::Users10To30Min => 2,
            Metric::UsersOver30Min => 3,
        }
    }

    /// Column name in the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalUsers => "avg_total_users",
            Metric::UsersUnder10Min => "avg_users_under_10min",
            Metric::Users10To30Min => "avg_users_10_30min",
            Metric::UsersOver30Min => "avg_users_over_30min",
        }
    }

    /// Display label shown to end users.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalUsers => "全部停留人數",
            Metric::UsersUnder10Min => "停留10分鐘以下",
            Metric::Users10To30Min => "停留10-30分鐘",
            Metric::UsersOver30Min => "停留30分鐘以上",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Returned when a string does not name a known metric column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric '{0}'")]
pub struct MetricParseError(pub String);

impl FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| MetricParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_column_roundtrip() {
        for metric in Metric::ALL {
            assert_eq!(metric.column().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn test_metric_index_matches_all_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
    }

    #[test]
    fn test_unknown_metric() {
        let err = "avg_users".parse::<Metric>().unwrap_err();
        assert_eq!(err, MetricParseError("avg_users".to_string()));
        assert_eq!(err.to_string(), "unknown metric 'avg_users'");
    }

    #[test]
    fn test_metric_serializes_as_column() {
        let json = serde_json::to_string(&Metric::Users10To30Min).unwrap();
        assert_eq!(json, "\"avg_users_10_30min\"");
    }
}
