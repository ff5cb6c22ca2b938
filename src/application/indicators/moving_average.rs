//! Moving averages over a close-price series.

/// Simple Moving Average of the last `period` prices.
///
/// Degrades instead of failing:
/// * empty series -> `0.0`
/// * fewer than `period` prices (or `period == 0`) -> the last available price
pub fn sma(prices: &[f64], period: usize) -> f64 {
    let Some(&last) = prices.last() else {
        return 0.0;
    };
    if period == 0 || prices.len() < period {
        return last;
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Exponential Moving Average with `k = 2 / (period + 1)`, seeded from the
/// first price of the slice and folded over the rest.
///
/// Empty series -> `0.0`.
pub fn ema(prices: &[f64], period: usize) -> f64 {
    let Some((&seed, rest)) = prices.split_first() else {
        return 0.0;
    };

    let k = 2.0 / (period as f64 + 1.0);
    rest.iter().fold(seed, |prev, &price| price * k + prev * (1.0 - k))
}
