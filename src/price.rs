//! Price per serving in two currencies

use serde::{Deserialize, Serialize};

/// How prices are shown and converted to a second currency
///
/// The API prices are in US cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConversion {
    /// Shown before the amount in the API currency
    pub primary_symbol: String,
    /// Shown before the amount in the second currency
    pub secondary_symbol: String,
    /// Units of the second currency per unit of the API currency
    pub rate: f64,
}

impl Default for CurrencyConversion {
    fn default() -> Self {
        Self {
            primary_symbol: "$".to_string(),
            secondary_symbol: "Rs.".to_string(),
            rate: 140.0,
        }
    }
}

/// A known, non zero price per serving
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePerServing {
    primary: f64,
    secondary: f64,
}

impl PricePerServing {
    /// Converts a price in cents
    ///
    /// Returns [`None`] if there is no price or it is zero.
    pub fn from_cents(cents: Option<f64>, conversion: &CurrencyConversion) -> Option<Self> {
        let cents = cents.filter(|c| c.is_finite() && *c != 0.0)?;
        let primary = cents / 100.0;
        Some(Self {
            primary,
            secondary: primary * conversion.rate,
        })
    }

    /// In units of the API currency
    pub fn primary(&self) -> f64 {
        self.primary
    }

    /// In units of the second currency
    pub fn secondary(&self) -> f64 {
        self.secondary
    }

    /// Like `$1.50`
    pub fn primary_display(&self, conversion: &CurrencyConversion) -> String {
        format!("{}{:.2}", conversion.primary_symbol, self.primary)
    }

    /// Like `approx Rs. 210`
    pub fn secondary_display(&self, conversion: &CurrencyConversion) -> String {
        format!("approx {} {:.0}", conversion.secondary_symbol, self.secondary)
    }
}
