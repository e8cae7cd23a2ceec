//! # Configuration State
//!
//! Store settings shown by the console, taken from the loaded
//! [`ClientConfig`] at startup.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::Serialize;
use shopfloor_client::ClientConfig;
use shopfloor_core::Money;

/// Display configuration for the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the prompt banner)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// API base URL the session talks to
    pub api_url: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState::from_config(&ClientConfig::default())
    }
}

impl ConfigState {
    pub fn from_config(config: &ClientConfig) -> Self {
        ConfigState {
            store_name: config.store.name.clone(),
            currency_symbol: config.store.currency_symbol.clone(),
            api_url: config.api.base_url.clone(),
        }
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(100)), "$1.00");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }

    #[test]
    fn test_format_currency_custom_symbol() {
        let mut client = ClientConfig::default();
        client.store.currency_symbol = "MX$".to_string();
        client.store.name = "Taller Norte".to_string();

        let config = ConfigState::from_config(&client);
        assert_eq!(config.store_name, "Taller Norte");
        assert_eq!(config.format_currency(Money::from_cents(21420)), "MX$214.20");
    }
}
