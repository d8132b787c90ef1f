//! Static registry of dual-class share pairs.

use std::fmt;
use thiserror::Error;

/// Ordered pair of tickers for one company's share classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerPair {
    /// First listed class (ticker A)
    pub class_a: &'static str,
    /// Second listed class (ticker B)
    pub class_b: &'static str,
}

impl TickerPair {
    pub const fn new(class_a: &'static str, class_b: &'static str) -> Self {
        Self { class_a, class_b }
    }

    /// Tickers as an `(a, b)` tuple.
    pub fn as_tuple(&self) -> (&'static str, &'static str) {
        (self.class_a, self.class_b)
    }
}

impl fmt::Display for TickerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class_a, self.class_b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Security not found: {0}")]
    NotFound(String),
}

const DUAL_CLASS_SECURITIES: &[(&str, TickerPair)] = &[
    ("Alphabet", TickerPair::new("GOOGL", "GOOG")),
    ("American Homes 4 Rent", TickerPair::new("AMH", "AMH-PG")),
    ("Berkshire Hathaway", TickerPair::new("BRK-B", "BRK-A")),
    ("Crawford & Company", TickerPair::new("CRD-A", "CRD-B")),
    ("Gray Television", TickerPair::new("GTN", "GTN-A")),
    ("Haverty Furniture Companies", TickerPair::new("HVT", "HVT-A")),
    ("Moog", TickerPair::new("MOG-A", "MOG-B")),
];

/// Immutable lookup table from company name to its share-class tickers.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy)]
pub struct SecurityRegistry {
    entries: &'static [(&'static str, TickerPair)],
}

impl SecurityRegistry {
    /// Registry over the built-in dual-class securities.
    pub const fn builtin() -> Self {
        Self {
            entries: DUAL_CLASS_SECURITIES,
        }
    }

    /// Resolve a company name to its `(class A, class B)` tickers.
    pub fn resolve_tickers(&self, security_name: &str) -> Result<TickerPair, RegistryError> {
        self.entries
            .iter()
            .find(|(name, _)| *name == security_name)
            .map(|(_, pair)| *pair)
            .ok_or_else(|| RegistryError::NotFound(security_name.to_string()))
    }

    /// Company names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SecurityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
