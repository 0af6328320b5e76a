//! Demographic share columns: gender and age buckets.
//!
//! Each observation row carries percentage shares that are expected to sum
//! to roughly 100 within each group.

use serde::{Deserialize, Serialize};

/// Gender share columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn index(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    /// Column name in the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            Gender::Male => "sex_1",
            Gender::Female => "sex_2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
        }
    }
}

/// The ten fixed age buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Under19,
    Age20To24,
    Age25To29,
    Age30To34,
    Age35To39,
    Age40To44,
    Age45To49,
    Age50To54,
    Age55To59,
    Age60Plus,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 10] = [
        AgeBucket::Under19,
        AgeBucket::Age20To24,
        AgeBucket::Age25To29,
        AgeBucket::Age30To34,
        AgeBucket::Age35To39,
        AgeBucket::Age40To44,
        AgeBucket::Age45To49,
        AgeBucket::Age50To54,
        AgeBucket::Age55To59,
        AgeBucket::Age60Plus,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name in the source dataset (`age_1`..`age_9`, `age_other`).
    pub fn column(self) -> &'static str {
        match self {
            AgeBucket::Under19 => "age_1",
            AgeBucket::Age20To24 => "age_2",
            AgeBucket::Age25To29 => "age_3",
            AgeBucket::Age30To34 => "age_4",
            AgeBucket::Age35To39 => "age_5",
            AgeBucket::Age40To44 => "age_6",
            AgeBucket::Age45To49 => "age_7",
            AgeBucket::Age50To54 => "age_8",
            AgeBucket::Age55To59 => "age_9",
            AgeBucket::Age60Plus => "age_other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Under19 => "19歲以下",
            AgeBucket::Age20To24 => "20-24歲",
            AgeBucket::Age25To29 => "25-29歲",
            AgeBucket::Age30To34 => "30-34歲",
            AgeBucket::Age35To39 => "35-39歲",
            AgeBucket::Age40To44 => "40-44歲",
            AgeBucket::Age45To49 => "45-49歲",
            AgeBucket::Age50To54 => "50-54歲",
            AgeBucket::Age55To59 => "55-59歲",
            AgeBucket::Age60Plus => "60歲以上",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bucket_columns_are_distinct() {
        let mut columns: Vec<_> = AgeBucket::ALL.iter().map(|b| b.column()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), 10);
    }

    #[test]
    fn test_age_bucket_index_follows_declaration_order() {
        for (i, bucket) in AgeBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
        assert_eq!(AgeBucket::Age60Plus.column(), "age_other");
    }

    #[test]
    fn test_gender_columns() {
        assert_eq!(Gender::Male.column(), "sex_1");
        assert_eq!(Gender::Female.column(), "sex_2");
        assert_eq!(Gender::Female.index(), 1);
    }
}
