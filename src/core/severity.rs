//! Severity levels
//!
//! Twenty-four levels in six bands of four, numbered like OpenTelemetry
//! severity numbers:
//!
//! | band  | numbers |
//! |-------|---------|
//! | TRACE | 1-4     |
//! | DEBUG | 5-8     |
//! | INFO  | 9-12    |
//! | WARN  | 13-16   |
//! | ERROR | 17-20   |
//! | FATAL | 21-24   |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum Severity {
    Trace = 1,
    Trace2 = 2,
    Trace3 = 3,
    Trace4 = 4,
    Debug = 5,
    Debug2 = 6,
    Debug3 = 7,
    Debug4 = 8,
    #[default]
    Info = 9,
    Info2 = 10,
    Info3 = 11,
    Info4 = 12,
    Warn = 13,
    Warn2 = 14,
    Warn3 = 15,
    Warn4 = 16,
    Error = 17,
    Error2 = 18,
    Error3 = 19,
    Error4 = 20,
    Fatal = 21,
    Fatal2 = 22,
    Fatal3 = 23,
    Fatal4 = 24,
}

const BANDS: [&str; 6] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL"];

impl Severity {
    /// Every severity in ascending order
    pub const ALL: [Severity; 24] = [
        Severity::Trace,
        Severity::Trace2,
        Severity::Trace3,
        Severity::Trace4,
        Severity::Debug,
        Severity::Debug2,
        Severity::Debug3,
        Severity::Debug4,
        Severity::Info,
        Severity::Info2,
        Severity::Info3,
        Severity::Info4,
        Severity::Warn,
        Severity::Warn2,
        Severity::Warn3,
        Severity::Warn4,
        Severity::Error,
        Severity::Error2,
        Severity::Error3,
        Severity::Error4,
        Severity::Fatal,
        Severity::Fatal2,
        Severity::Fatal3,
        Severity::Fatal4,
    ];

    /// Band name and severity number, as carried on the wire
    pub fn text_and_number(&self) -> (&'static str, i32) {
        (self.text(), self.number())
    }

    #[inline]
    pub fn number(&self) -> i32 {
        *self as i32
    }

    /// Band name without the sub-level
    pub fn text(&self) -> &'static str {
        BANDS[((self.number() - 1) / 4) as usize]
    }

    /// Sub-level inside the band, 1 to 4
    pub fn sub_level(&self) -> i32 {
        (self.number() - 1) % 4 + 1
    }

    pub fn from_number(number: i32) -> Option<Self> {
        if (1..=24).contains(&number) {
            Some(Self::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        *self >= Severity::Fatal
    }

    /// Level used when mirroring through the `log` facade
    pub fn log_level(&self) -> log::Level {
        match self.text() {
            "TRACE" => log::Level::Trace,
            "DEBUG" => log::Level::Debug,
            "INFO" => log::Level::Info,
            "WARN" => log::Level::Warn,
            _ => log::Level::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_level() {
            1 => write!(f, "{}", self.text()),
            n => write!(f, "{}{}", self.text(), n),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let split = upper
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(upper.len());
        let (band, sub) = upper.split_at(split);

        let band = match band {
            "WARNING" => "WARN",
            other => other,
        };
        let band_index = BANDS
            .iter()
            .position(|b| *b == band)
            .ok_or_else(|| format!("Invalid severity: '{}'", s))?;

        let sub_level = match sub {
            "" => 1,
            digits => digits
                .parse::<i32>()
                .ok()
                .filter(|n| (1..=4).contains(n))
                .ok_or_else(|| format!("Invalid severity: '{}'", s))?,
        };

        Severity::from_number(band_index as i32 * 4 + sub_level)
            .ok_or_else(|| format!("Invalid severity: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_contiguous() {
        for (idx, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.number(), idx as i32 + 1);
        }
    }

    #[test]
    fn test_text_and_number() {
        assert_eq!(Severity::Trace.text_and_number(), ("TRACE", 1));
        assert_eq!(Severity::Debug4.text_and_number(), ("DEBUG", 8));
        assert_eq!(Severity::Info.text_and_number(), ("INFO", 9));
        assert_eq!(Severity::Info3.text_and_number(), ("INFO", 11));
        assert_eq!(Severity::Warn2.text_and_number(), ("WARN", 14));
        assert_eq!(Severity::Error.text_and_number(), ("ERROR", 17));
        assert_eq!(Severity::Fatal4.text_and_number(), ("FATAL", 24));
    }

    #[test]
    fn test_from_number_bounds() {
        assert_eq!(Severity::from_number(0), None);
        assert_eq!(Severity::from_number(25), None);
        assert_eq!(Severity::from_number(13), Some(Severity::Warn));
    }

    #[test]
    fn test_parse() {
        assert_eq!("info".parse::<Severity>(), Ok(Severity::Info));
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warn));
        assert_eq!("error3".parse::<Severity>(), Ok(Severity::Error3));
        assert!("info5".parse::<Severity>().is_err());
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Fatal2.to_string(), "FATAL2");
    }

    #[test]
    fn test_fatal_band() {
        assert!(!Severity::Error4.is_fatal());
        assert!(Severity::Fatal.is_fatal());
        assert!(Severity::Fatal4.is_fatal());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Severity::Info2).unwrap(), "\"INFO2\"");
        let parsed: Severity = serde_json::from_str("\"WARN\"").unwrap();
        assert_eq!(parsed, Severity::Warn);
    }
}
