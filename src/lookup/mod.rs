//! Grocery price lookup: the HTTP client for the product catalog and the
//! debounced search state machine that drives it from user input.

mod client;
mod search;

use thiserror::Error;

pub use client::{PriceLookupClient, ProductQuery, ProductSource, SortKey};
pub use search::{ProductSearch, RETRY_MESSAGE, SearchState, SearchTicket};

/// A product from the external price catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub external_id: u64,
    pub name: String,
    pub current_price: f64,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub ean: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("price lookup is not configured: {0}")]
    Configuration(String),

    #[error("price service answered with status {0}")]
    Status(u16),

    #[error("price service unreachable: {0}")]
    Transport(String),

    #[error("unexpected price service response: {0}")]
    Decode(String),

    #[error("'{0}' is not a barcode")]
    InvalidEan(String),
}
