//! Wallet currency codes.
//!
//! Every monetary amount in a wallet is denominated in the wallet's single
//! currency; amounts themselves are `rust_decimal::Decimal` values, never
//! floating-point.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Polish Złoty
    Pln,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
    /// British Pound
    Gbp,
    /// Czech Koruna
    Czk,
}

impl Currency {
    /// Returns the ISO 4217 code for this currency.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pln => "PLN",
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Czk => "CZK",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PLN" => Ok(Self::Pln),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "CZK" => Ok(Self::Czk),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Pln.to_string(), "PLN");
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Gbp.to_string(), "GBP");
        assert_eq!(Currency::Czk.to_string(), "CZK");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("PLN").unwrap(), Currency::Pln);
        assert_eq!(Currency::from_str("pln").unwrap(), Currency::Pln);
        assert_eq!(Currency::from_str("EUR").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);

        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
