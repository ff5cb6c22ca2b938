use crate::domain::market::{CandleResponse, CurrencyPair};
use rand::Rng;

/// Points in a synthetic series
pub const SYNTHETIC_POINTS: usize = 50;
const CANDLE_SECONDS: i64 = 300;
/// Per-candle perturbation for non-JPY pairs; JPY pairs scale it by 100
const BASE_NOISE: f64 = 0.001;
const MAX_VOLUME: f64 = 1000.0;

/// Random-walk M5 candles around the pair's base price, ending at `to`.
///
/// The payload has the same shape as a provider response (`s = "ok"`), so the
/// rest of the pipeline treats it uniformly; callers tag the resulting series
/// as synthetic.
pub fn synthetic_response<R: Rng>(
    pair: &CurrencyPair,
    to: i64,
    rng: &mut R,
) -> CandleResponse {
    let noise = if pair.is_jpy() {
        BASE_NOISE * 100.0
    } else {
        BASE_NOISE
    };

    let mut response = CandleResponse {
        s: CandleResponse::STATUS_OK.to_string(),
        ..Default::default()
    };

    let mut prev_close = pair.base_price();
    for i in 0..SYNTHETIC_POINTS {
        let open = prev_close;
        let close = open + rng.random_range(-noise..noise);
        let high = open.max(close) + rng.random_range(0.0..noise / 2.0);
        let low = open.min(close) - rng.random_range(0.0..noise / 2.0);

        response.o.push(open);
        response.h.push(high);
        response.l.push(low);
        response.c.push(close);
        response.v.push(rng.random_range(0.0..MAX_VOLUME).floor());
        response
            .t
            .push(to - (SYNTHETIC_POINTS - i) as i64 * CANDLE_SECONDS);

        prev_close = close;
    }

    response
}
