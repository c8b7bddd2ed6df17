//! Market data access port trait.

use crate::domain::bar::PriceBar;
use crate::domain::error::TradeLoopError;
use std::time::Duration;

/// Capability: fetch the most recent OHLC window for a symbol. May fail, may
/// return fewer bars than requested — short windows are a valid result
/// ("evaluate later"), not an error. Adapters must enforce `timeout` so a
/// slow provider cannot stall the tick scheduler; a timeout surfaces as
/// [`TradeLoopError::FetchFailed`].
pub trait MarketDataPort {
    fn fetch_ohlc(
        &self,
        symbol: &str,
        window: usize,
        timeout: Duration,
    ) -> Result<Vec<PriceBar>, TradeLoopError>;
}
