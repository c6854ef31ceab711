//! Age and tenure bands used by filters and analytics series.

use serde::{Deserialize, Serialize};

/// Age band of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Under20,
    Twenties,
    Thirties,
    Forties,
    Over50,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Under20,
        AgeBand::Twenties,
        AgeBand::Thirties,
        AgeBand::Forties,
        AgeBand::Over50,
    ];

    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        Some(match age {
            a if a < 20.0 => AgeBand::Under20,
            a if a < 30.0 => AgeBand::Twenties,
            a if a < 40.0 => AgeBand::Thirties,
            a if a < 50.0 => AgeBand::Forties,
            _ => AgeBand::Over50,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under20 => "20歳未満",
            AgeBand::Twenties => "20代",
            AgeBand::Thirties => "30代",
            AgeBand::Forties => "40代",
            AgeBand::Over50 => "50歳以上",
        }
    }
}

/// Tenure band, in months of employment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureBand {
    Under6,
    Between6And36,
    Over36,
}

impl TenureBand {
    pub const ALL: [TenureBand; 3] = [
        TenureBand::Under6,
        TenureBand::Between6And36,
        TenureBand::Over36,
    ];

    /// Bands are `< 6`, `6..=36` and `> 36` months.
    pub fn from_months(months: f64) -> Option<Self> {
        if !months.is_finite() || months < 0.0 {
            return None;
        }
        Some(if months < 6.0 {
            TenureBand::Under6
        } else if months <= 36.0 {
            TenureBand::Between6And36
        } else {
            TenureBand::Over36
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenureBand::Under6 => "6ヶ月未満",
            TenureBand::Between6And36 => "6〜36ヶ月",
            TenureBand::Over36 => "36ヶ月超",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_edges() {
        assert_eq!(AgeBand::from_age(19.0), Some(AgeBand::Under20));
        assert_eq!(AgeBand::from_age(20.0), Some(AgeBand::Twenties));
        assert_eq!(AgeBand::from_age(49.9), Some(AgeBand::Forties));
        assert_eq!(AgeBand::from_age(50.0), Some(AgeBand::Over50));
        assert_eq!(AgeBand::from_age(f64::NAN), None);
        assert_eq!(AgeBand::from_age(-1.0), None);
    }

    #[test]
    fn test_tenure_band_edges() {
        assert_eq!(TenureBand::from_months(5.0), Some(TenureBand::Under6));
        assert_eq!(TenureBand::from_months(6.0), Some(TenureBand::Between6And36));
        assert_eq!(TenureBand::from_months(36.0), Some(TenureBand::Between6And36));
        assert_eq!(TenureBand::from_months(37.0), Some(TenureBand::Over36));
    }
}
