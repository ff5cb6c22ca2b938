// Market data domain
pub mod candle;
pub mod pair;
pub mod session;

pub use candle::{Candle, CandleResponse, CandleSeries, SeriesOrigin};
pub use pair::CurrencyPair;
pub use session::{MarketSession, MarketStatus};
