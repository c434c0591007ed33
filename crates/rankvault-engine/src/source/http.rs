//! HTTP adapter for the community leaderboard API.
//!
//! `GET {base_url}?region=EU&leaderboardId=battlegrounds&page=N` returns
//! one page of rows plus pagination totals. Page 1 is fetched first to learn
//! the page count, then the remaining pages are walked in order with a
//! politeness delay between requests.

use std::thread;
use std::time::Duration;

use rankvault_core::config::SourceConfig;
use rankvault_core::model::{PartitionKey, RawPlayerRecord};
use reqwest::blocking::Client;
use serde::Deserialize;

use super::{LeaderboardSource, SourceError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardResponse {
    #[serde(default)]
    season_id: Option<i64>,
    #[serde(default)]
    leaderboard: Option<LeaderboardBody>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardBody {
    #[serde(default)]
    rows: Vec<LeaderboardRow>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardRow {
    #[serde(default)]
    rank: u32,
    #[serde(default)]
    accountid: String,
    #[serde(default)]
    rating: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    #[serde(default = "one")]
    total_pages: u32,
    #[serde(default)]
    total_size: u64,
}

fn one() -> u32 {
    1
}

/// Blocking HTTP leaderboard source
#[derive(Debug, Clone)]
pub struct HttpLeaderboardSource {
    client: Client,
    base_url: String,
    page_delay: Duration,
}

impl HttpLeaderboardSource {
    /// Build a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_delay: config.page_delay,
        })
    }

    fn fetch_page(
        &self,
        partition: PartitionKey,
        page: u32,
    ) -> Result<LeaderboardResponse, SourceError> {
        let page_param = page.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("region", partition.region.as_str()),
                ("leaderboardId", partition.game_mode.leaderboard_id()),
                ("page", page_param.as_str()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout { page }
                } else {
                    SourceError::Request {
                        page,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                page,
                status: status.as_u16(),
            });
        }

        response
            .json::<LeaderboardResponse>()
            .map_err(|e| SourceError::Decode {
                page,
                message: e.to_string(),
            })
    }
}

impl LeaderboardSource for HttpLeaderboardSource {
    fn fetch_partition(&self, partition: PartitionKey) -> Result<Vec<RawPlayerRecord>, SourceError> {
        walk_pages(partition, self.page_delay, |page| {
            self.fetch_page(partition, page)
        })
    }
}

/// Fetch page 1, then pages `2..=total_pages` in order.
///
/// The first failing page aborts the walk and discards what was collected.
fn walk_pages<F>(
    partition: PartitionKey,
    page_delay: Duration,
    mut fetch: F,
) -> Result<Vec<RawPlayerRecord>, SourceError>
where
    F: FnMut(u32) -> Result<LeaderboardResponse, SourceError>,
{
    let first = fetch(1)?;
    let (total_pages, total_size) = first
        .leaderboard
        .as_ref()
        .and_then(|body| body.pagination.as_ref())
        .map(|p| (p.total_pages.max(1), p.total_size))
        .unwrap_or((1, 0));

    tracing::debug!(
        region = partition.region.as_str(),
        game_mode = partition.game_mode.as_str(),
        season_id = first.season_id,
        total_pages,
        total_size,
        "Fetched first leaderboard page"
    );

    let mut records = Vec::with_capacity(total_size.min(100_000) as usize);
    collect_rows(first, &mut records);

    for page in 2..=total_pages {
        thread::sleep(page_delay);
        let response = fetch(page)?;
        collect_rows(response, &mut records);
    }

    Ok(records)
}

fn collect_rows(response: LeaderboardResponse, into: &mut Vec<RawPlayerRecord>) {
    if let Some(body) = response.leaderboard {
        into.extend(
            body.rows
                .into_iter()
                .map(|row| RawPlayerRecord::new(row.rank, row.accountid, row.rating)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankvault_core::model::{GameMode, Region};

    #[test]
    fn test_decode_page_body() {
        let json = r#"{
            "seasonId": 12,
            "leaderboard": {
                "rows": [
                    {"rank": 1, "accountid": "Alpha", "rating": 14021},
                    {"rank": 2, "accountid": "Beta", "rating": 13990}
                ],
                "pagination": {"totalPages": 4, "totalSize": 100}
            }
        }"#;
        let response: LeaderboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.season_id, Some(12));

        let body = response.leaderboard.as_ref().unwrap();
        let pagination = body.pagination.as_ref().unwrap();
        assert_eq!(pagination.total_pages, 4);
        assert_eq!(pagination.total_size, 100);

        let mut records = Vec::new();
        collect_rows(response, &mut records);
        assert_eq!(records[1], RawPlayerRecord::new(2, "Beta", 13990));
    }

    #[test]
    fn test_decode_tolerates_missing_sections() {
        let response: LeaderboardResponse = serde_json::from_str("{}").unwrap();
        let mut records = Vec::new();
        collect_rows(response, &mut records);
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_fields_decode_to_invalid_rows() {
        // Defaults are rejected later by snapshot validation
        let json = r#"{"leaderboard": {"rows": [{"accountid": "x"}]}}"#;
        let response: LeaderboardResponse = serde_json::from_str(json).unwrap();
        let mut records = Vec::new();
        collect_rows(response, &mut records);
        assert_eq!(records, vec![RawPlayerRecord::new(0, "x", 0)]);
    }

    fn page(rows: &[(u32, &str, i64)], total_pages: u32) -> LeaderboardResponse {
        LeaderboardResponse {
            season_id: Some(12),
            leaderboard: Some(LeaderboardBody {
                rows: rows
                    .iter()
                    .map(|&(rank, accountid, rating)| LeaderboardRow {
                        rank,
                        accountid: accountid.to_string(),
                        rating,
                    })
                    .collect(),
                pagination: Some(Pagination {
                    total_pages,
                    total_size: 6,
                }),
            }),
        }
    }

    fn eu_standard() -> PartitionKey {
        PartitionKey::new(Region::Eu, GameMode::Standard)
    }

    #[test]
    fn test_walk_concatenates_pages_in_order() {
        let mut requested = Vec::new();
        let records = walk_pages(eu_standard(), Duration::ZERO, |n| {
            requested.push(n);
            Ok(match n {
                1 => page(&[(1, "a", 900), (2, "b", 800)], 3),
                2 => page(&[(3, "c", 700), (4, "d", 600)], 3),
                _ => page(&[(5, "e", 500), (6, "f", 400)], 3),
            })
        })
        .unwrap();

        assert_eq!(requested, vec![1, 2, 3]);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(records[5], RawPlayerRecord::new(6, "f", 400));
    }

    #[test]
    fn test_walk_fails_whole_partition_on_later_page() {
        let mut requested = Vec::new();
        let result = walk_pages(eu_standard(), Duration::ZERO, |n| {
            requested.push(n);
            match n {
                1 => Ok(page(&[(1, "a", 900), (2, "b", 800)], 3)),
                2 => Err(SourceError::Status {
                    page: 2,
                    status: 503,
                }),
                _ => Ok(page(&[(5, "e", 500)], 3)),
            }
        });

        assert!(matches!(
            result,
            Err(SourceError::Status {
                page: 2,
                status: 503
            })
        ));
        assert_eq!(requested, vec![1, 2]);
    }

    #[test]
    fn test_walk_without_pagination_fetches_one_page() {
        let mut calls = 0;
        let records = walk_pages(eu_standard(), Duration::ZERO, |_| {
            calls += 1;
            let json = r#"{"leaderboard": {"rows": [{"rank": 1, "accountid": "a", "rating": 10}]}}"#;
            Ok(serde_json::from_str(json).unwrap())
        })
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_new_from_default_config() {
        let source = HttpLeaderboardSource::new(&SourceConfig::default()).unwrap();
        assert_eq!(source.page_delay, Duration::from_secs(1));
    }
}
