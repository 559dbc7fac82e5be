//! Display formatting for rate bytes.
//!
//! Rates are stored as multiples of five cents, with three sentinels.

use std::fmt;

pub const FREE: u8 = 0;
pub const UNLIMITED: u8 = 254;
pub const RESTRICTED: u8 = 255;

/// A raw rate byte, formatted the way rate tables are usually printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateValue(pub u8);

impl RateValue {
    /// Dollar amount, or `None` for the sentinels.
    pub fn dollars(self) -> Option<f64> {
        match self.0 {
            FREE | UNLIMITED | RESTRICTED => None,
            n => Some(n as f64 * 0.05),
        }
    }
}

impl fmt::Display for RateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FREE => f.write_str("Free"),
            UNLIMITED => f.write_str("Unlimited"),
            RESTRICTED => f.write_str("Restricted"),
            n => write!(f, "{:.2}", n as f64 * 0.05),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(RateValue(0).to_string(), "Free");
        assert_eq!(RateValue(254).to_string(), "Unlimited");
        assert_eq!(RateValue(255).to_string(), "Restricted");
        assert_eq!(RateValue(254).dollars(), None);
    }

    #[test]
    fn test_nickel_units() {
        assert_eq!(RateValue(1).to_string(), "0.05");
        assert_eq!(RateValue(20).to_string(), "1.00");
        assert_eq!(RateValue(253).to_string(), "12.65");
    }
}
