use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// FX weekend boundary (UTC hour) on Friday close and Sunday open
const WEEKEND_BOUNDARY_HOUR: u32 = 21;

/// Trading session derived from the UTC clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketSession {
    Asian,
    London,
    #[serde(rename = "New York")]
    NewYork,
    Closed,
}

impl MarketSession {
    /// `[0,8)` Asian, `[8,16)` London, `[16,24)` New York, Closed over the FX weekend
    pub fn at(now: DateTime<Utc>) -> Self {
        let hour = now.hour();
        let weekend = match now.weekday() {
            Weekday::Fri => hour >= WEEKEND_BOUNDARY_HOUR,
            Weekday::Sat => true,
            Weekday::Sun => hour < WEEKEND_BOUNDARY_HOUR,
            _ => false,
        };
        if weekend {
            return MarketSession::Closed;
        }

        match hour {
            0..=7 => MarketSession::Asian,
            8..=15 => MarketSession::London,
            _ => MarketSession::NewYork,
        }
    }

    pub fn current() -> Self {
        Self::at(Utc::now())
    }

    pub fn is_open(&self) -> bool {
        *self != MarketSession::Closed
    }
}

impl fmt::Display for MarketSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSession::Asian => write!(f, "Asian"),
            MarketSession::London => write!(f, "London"),
            MarketSession::NewYork => write!(f, "New York"),
            MarketSession::Closed => write!(f, "Closed"),
        }
    }
}

/// Snapshot reported to dashboards: `{ session, is_open }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub session: MarketSession,
    pub is_open: bool,
}

impl MarketStatus {
    pub fn at(now: DateTime<Utc>) -> Self {
        let session = MarketSession::at(now);
        Self {
            session,
            is_open: session.is_open(),
        }
    }
}
