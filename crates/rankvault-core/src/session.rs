//! Leaderboard query requests and their transitions.
//!
//! A `LeaderboardRequest` is an immutable value describing what a client is
//! looking at. User actions produce a new request through
//! [`LeaderboardRequest::apply`]; nothing is mutated in place, so a partition
//! switch can never carry stale filters or a stale page across.

use serde::{Deserialize, Serialize};

use crate::model::PartitionKey;

/// Default number of rows per unfiltered page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Optional row filters. Any active filter suspends pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Exact rank match
    pub rank: Option<u32>,
    /// Case-insensitive substring of the account id
    pub name_contains: Option<String>,
}

impl Filters {
    pub fn none() -> Self {
        Self::default()
    }

    /// Name needle with surrounding whitespace removed; blank counts as absent.
    pub fn name_needle(&self) -> Option<&str> {
        self.name_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.rank.is_some() || self.name_needle().is_some()
    }
}

/// A single immutable leaderboard view request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRequest {
    pub partition: PartitionKey,
    pub filters: Filters,
    /// 1-based page number; ignored while a filter is active
    pub page: u32,
    pub page_size: u32,
}

/// A user action against the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SelectPartition(PartitionKey),
    SetRankFilter(Option<u32>),
    SetNameFilter(Option<String>),
    ClearFilters,
    NextPage,
    PreviousPage,
    GoToPage(u32),
}

impl LeaderboardRequest {
    /// Unfiltered first page of a partition
    pub fn new(partition: PartitionKey) -> Self {
        Self {
            partition,
            filters: Filters::none(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Page number clamped to at least 1
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size clamped to at least 1
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }

    /// Row offset of the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_page_size())
    }

    /// Compute the request that follows `action`.
    pub fn apply(self, action: SessionAction) -> LeaderboardRequest {
        match action {
            SessionAction::SelectPartition(partition) => {
                if partition == self.partition {
                    self
                } else {
                    LeaderboardRequest {
                        partition,
                        filters: Filters::none(),
                        page: 1,
                        page_size: self.page_size,
                    }
                }
            }
            SessionAction::SetRankFilter(rank) => LeaderboardRequest {
                filters: Filters {
                    rank,
                    ..self.filters
                },
                page: 1,
                ..self
            },
            SessionAction::SetNameFilter(name_contains) => LeaderboardRequest {
                filters: Filters {
                    name_contains,
                    ..self.filters
                },
                page: 1,
                ..self
            },
            SessionAction::ClearFilters => LeaderboardRequest {
                filters: Filters::none(),
                page: 1,
                ..self
            },
            SessionAction::NextPage => LeaderboardRequest {
                page: self.effective_page().saturating_add(1),
                ..self
            },
            SessionAction::PreviousPage => LeaderboardRequest {
                page: self.effective_page().saturating_sub(1).max(1),
                ..self
            },
            SessionAction::GoToPage(page) => LeaderboardRequest {
                page: page.max(1),
                ..self
            },
        }
    }
}
