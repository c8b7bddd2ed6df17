//! Position sizing.
//!
//! Fixed-fraction-of-balance sizing scaled by a per-asset-class confidence
//! factor (a simplified Kelly-style rule), plus percentage-relative stop-loss
//! and take-profit levels. Everything here is relative to the balance and
//! entry price passed in; no absolute dollar constants and no side effects.

use crate::domain::position::AssetClass;

#[derive(Debug, Clone, PartialEq)]
pub struct SizingParams {
    /// Fraction of the account allocated per trade before confidence scaling.
    pub base_fraction: f64,
    pub crypto_equity_confidence: f64,
    pub option_confidence: f64,
    /// Stop-loss distance below entry, in percent.
    pub stop_loss_pct: f64,
    /// Take-profit distance above entry, in percent.
    pub take_profit_pct: f64,
}

impl Default for SizingParams {
    fn default() -> Self {
        SizingParams {
            base_fraction: 0.05,
            crypto_equity_confidence: 0.70,
            option_confidence: 0.50,
            stop_loss_pct: 5.0,
            take_profit_pct: 10.0,
        }
    }
}

impl SizingParams {
    fn confidence(&self, asset_class: AssetClass) -> f64 {
        match asset_class {
            AssetClass::Crypto | AssetClass::Equity => self.crypto_equity_confidence,
            AssetClass::Option => self.option_confidence,
        }
    }

    /// Dollar amount to commit: base_fraction × confidence × balance.
    pub fn dollar_amount(&self, account_balance: f64, asset_class: AssetClass) -> f64 {
        self.base_fraction * self.confidence(asset_class) * account_balance
    }

    /// Quantity at the given price; zero when the price is non-positive.
    pub fn quantity(&self, account_balance: f64, asset_class: AssetClass, price: f64) -> f64 {
        if price <= 0.0 {
            return 0.0;
        }
        self.dollar_amount(account_balance, asset_class) / price
    }

    pub fn stop_loss_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.stop_loss_pct / 100.0)
    }

    pub fn take_profit_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 + self.take_profit_pct / 100.0)
    }
}
