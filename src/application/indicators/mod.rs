// Technical indicator library
//
// Pure functions over close prices or candles. Short inputs degrade to
// neutral values rather than failing.
pub mod moving_average;
pub mod oscillators;
pub mod patterns;
pub mod trend;
pub mod volatility;

pub use moving_average::{ema, sma};
pub use oscillators::{RSI_NEUTRAL, STOCHASTIC_NEUTRAL, macd, rsi, stochastic_k};
pub use patterns::{detect_patterns, divergence, engulfing, pin_bar, volume_surge};
pub use trend::{ADX_NEUTRAL, adx, fractal_high, fractal_low};
pub use volatility::{MIN_ATR, atr, bollinger_bands};
