//! Shared models for market data messages and view state.
//!
//! Contains the raw wire types received from the exchange, the derived
//! read-only view types handed to consumers, and the fixed set of
//! supported chart ranges.

pub mod candle;
pub mod summary;
pub mod ticker;

/// Supported historical chart windows.
///
/// The variants map 1:1 onto the interval tokens recognized by the
/// klines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    H1,
    H4,
    H12,
    /// 24 hours (wire name: `"1d"`).
    D1,
    D3,
    W1,
    /// One month (wire name: `"1M"`, capitalized to distinguish from minutes).
    M1,
}

impl RangeToken {
    /// All supported ranges, in the order a picker would display them.
    pub const ALL: [RangeToken; 7] = [
        RangeToken::H1,
        RangeToken::H4,
        RangeToken::H12,
        RangeToken::D1,
        RangeToken::D3,
        RangeToken::W1,
        RangeToken::M1,
    ];

    /// Returns the wire-format interval token expected by the REST API.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeToken::H1 => "1h",
            RangeToken::H4 => "4h",
            RangeToken::H12 => "12h",
            RangeToken::D1 => "1d",
            RangeToken::D3 => "3d",
            RangeToken::W1 => "1w",
            RangeToken::M1 => "1M",
        }
    }

    /// Returns the human-readable label for a range picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            RangeToken::H1 => "1 H",
            RangeToken::H4 => "4 H",
            RangeToken::H12 => "12 H",
            RangeToken::D1 => "24 H",
            RangeToken::D3 => "3 D",
            RangeToken::W1 => "1 W",
            RangeToken::M1 => "1 M",
        }
    }
}

/// The currently active chart window: a display name plus the wire token
/// sent upstream. Exactly one selection is active at a time; switching it
/// invalidates the whole candle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    pub name: &'static str,
    pub token: RangeToken,
}

impl RangeSelection {
    #[must_use]
    pub fn new(token: RangeToken) -> Self {
        Self {
            name: token.display_name(),
            token,
        }
    }
}

impl Default for RangeSelection {
    /// The original UI opens on the 24-hour window.
    fn default() -> Self {
        Self::new(RangeToken::D1)
    }
}
