//! Date formatting honoring the user's stored preference.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three date renderings the settings page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// `MM/DD/YYYY`
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    /// `DD/MM/YYYY`
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    /// `YYYY-MM-DD`
    #[serde(rename = "YYYY-MM-DD")]
    IsoDate,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::IsoDate => "%Y-%m-%d",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::IsoDate => "YYYY-MM-DD",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYear),
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYear),
            "YYYY-MM-DD" => Ok(DateFormat::IsoDate),
            other => Err(format!("unrecognized date format: {}", other)),
        }
    }
}

/// Render a timestamp's date portion in the given format.
pub fn format_date(date: DateTime<Utc>, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 7, 12, 30, 0).unwrap()
    }

    #[test]
    fn three_formats() {
        assert_eq!(format_date(date(), DateFormat::MonthDayYear), "03/07/2026");
        assert_eq!(format_date(date(), DateFormat::DayMonthYear), "07/03/2026");
        assert_eq!(format_date(date(), DateFormat::IsoDate), "2026-03-07");
    }

    #[test]
    fn parse_roundtrip() {
        for format in [
            DateFormat::MonthDayYear,
            DateFormat::DayMonthYear,
            DateFormat::IsoDate,
        ] {
            let parsed: DateFormat = format.to_string().parse().unwrap();
            assert_eq!(parsed, format);
        }
        assert!("YYYY/MM/DD".parse::<DateFormat>().is_err());
    }
}
