use std::time::{Duration, Instant};

use tracing::debug;

use crate::lookup::client::{ProductQuery, ProductSource};
use crate::lookup::{LookupError, Product};

/// Message shown when a lookup fails. The planner keeps working without it.
pub const RETRY_MESSAGE: &str = "Could not search for products. Please try again later.";

/// Where the search box currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Pending { query: String },
    Success(Vec<Product>),
    Error(String),
}

/// Handle for a request issued under a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Draft {
    query: String,
    typed_at: Instant,
}

/// Debounced search-as-you-type over a [`ProductSource`].
///
/// Every input bumps the generation. A response is applied only when the
/// generation it was issued under is still current, so the last request
/// wins regardless of the order responses arrive in.
#[derive(Debug, Clone)]
pub struct ProductSearch {
    generation: u64,
    state: SearchState,
    draft: Option<Draft>,
    debounce: Duration,
    min_query_len: usize,
    page_size: u32,
}

impl ProductSearch {
    pub fn new(debounce: Duration, min_query_len: usize, page_size: u32) -> Self {
        Self {
            generation: 0,
            state: SearchState::Idle,
            draft: None,
            debounce,
            min_query_len,
            page_size,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SearchState::Pending { .. })
    }

    /// Record new text in the search box.
    ///
    /// Anything in flight is superseded. Text shorter than the minimum
    /// clears the results.
    pub fn input(&mut self, query: &str, now: Instant) {
        self.generation += 1;
        let query = query.trim();

        if query.chars().count() < self.min_query_len {
            self.draft = None;
            self.state = SearchState::Idle;
            return;
        }

        if self.is_pending() {
            self.state = SearchState::Idle;
        }
        self.draft = Some(Draft {
            query: query.to_string(),
            typed_at: now,
        });
    }

    /// Issue the typed query once the debounce interval has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let due = self
            .draft
            .as_ref()
            .is_some_and(|d| now.saturating_duration_since(d.typed_at) >= self.debounce);
        if due { self.issue() } else { None }
    }

    /// Issue the typed query right away, skipping the debounce.
    pub fn submit(&mut self) -> Option<SearchTicket> {
        self.issue()
    }

    /// Apply a response. Returns false when the ticket was superseded.
    pub fn resolve(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<Product>, LookupError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                issued = ticket.generation,
                current = self.generation,
                "Discarding superseded product search"
            );
            return false;
        }

        self.state = match result {
            Ok(products) => SearchState::Success(products),
            Err(e) => {
                debug!(error = %e, query = %ticket.query, "Product search failed");
                SearchState::Error(RETRY_MESSAGE.to_string())
            }
        };
        true
    }

    /// Drop whatever is typed or in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.draft = None;
        self.state = SearchState::Idle;
    }

    /// The query a ticket should be sent as.
    pub fn query_for(&self, ticket: &SearchTicket) -> ProductQuery {
        ProductQuery::new(ticket.query.clone())
            .with_size(self.page_size)
            .unique(true)
    }

    /// Poll and, when due, run the request against `source` synchronously.
    pub fn run_due<S: ProductSource + ?Sized>(&mut self, source: &S, now: Instant) -> &SearchState {
        if let Some(ticket) = self.poll(now) {
            let result = source.search_products(&self.query_for(&ticket));
            self.resolve(&ticket, result);
        }
        &self.state
    }

    fn issue(&mut self) -> Option<SearchTicket> {
        let draft = self.draft.take()?;
        self.state = SearchState::Pending {
            query: draft.query.clone(),
        };
        Some(SearchTicket {
            generation: self.generation,
            query: draft.query,
        })
    }
}
