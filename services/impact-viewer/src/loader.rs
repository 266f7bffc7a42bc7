//! Meteorite loading from the Socrata API.
//!
//! Every load takes a ticket from a monotonic counter before it starts. A
//! finished load is committed only when its ticket is newer than the one
//! already committed, so a slow, older request that finishes last cannot
//! overwrite fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use impact_common::{ImpactError, MeteoriteRecord};
use impact_pipeline::ViewStore;
use metrics::{counter, gauge};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Fetches the meteorite array with a fixed `$limit`.
#[derive(Debug, Clone)]
pub struct MeteoriteLoader {
    client: Client,
    url: String,
    limit: usize,
}

impl MeteoriteLoader {
    pub fn new(url: impl Into<String>, limit: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            limit,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET, no retry.
    #[instrument(skip(self), fields(url = %self.url, limit = self.limit))]
    pub async fn fetch(&self) -> Result<Vec<MeteoriteRecord>, ImpactError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("$limit", self.limit)])
            .send()
            .await
            .map_err(|e| ImpactError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImpactError::Upstream(format!(
                "{} returned HTTP {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ImpactError::Upstream(e.to_string()))?;
        decode_meteorites(&body)
    }
}

/// Decode an API response body (a JSON array of rows).
///
/// Only a body that is not an array is an error; rows that fail to decode
/// are skipped with a warning.
pub fn decode_meteorites(body: &str) -> Result<Vec<MeteoriteRecord>, ImpactError> {
    let rows: Vec<Value> =
        serde_json::from_str(body).map_err(|e| ImpactError::MeteoriteDecode(e.to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<MeteoriteRecord>(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(index, error = %e, "Skipping undecodable meteorite row");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, decoded = records.len(), "Some meteorite rows were skipped");
    }
    Ok(records)
}

/// The view store plus the ticket counter guarding meteorite commits.
pub struct MeteoriteStore {
    view: RwLock<ViewStore>,
    next_ticket: AtomicU64,
    loaded_at: RwLock<Option<DateTime<Utc>>>,
}

impl MeteoriteStore {
    pub fn new(view: ViewStore) -> Self {
        Self {
            view: RwLock::new(view),
            next_ticket: AtomicU64::new(0),
            loaded_at: RwLock::new(None),
        }
    }

    /// Take the next load ticket. Tickets start at 1.
    pub fn ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit `records` under `ticket` unless a newer load is already in.
    pub async fn commit(&self, ticket: u64, records: Vec<MeteoriteRecord>) -> bool {
        let count = records.len();
        let committed = self.view.write().await.commit_meteorites(records, ticket);
        if committed {
            *self.loaded_at.write().await = Some(Utc::now());
            gauge!("impact_meteorites_loaded").set(count as f64);
        } else {
            debug!(ticket, "Load finished after a newer one, discarded");
        }
        committed
    }

    /// A cheap copy of the current state; views are computed from it
    /// without holding the lock.
    pub async fn snapshot(&self) -> ViewStore {
        self.view.read().await.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.view.read().await.generation()
    }

    /// Ready once any load has been committed.
    pub async fn is_ready(&self) -> bool {
        self.generation().await > 0
    }

    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        *self.loaded_at.read().await
    }
}

/// Run one load and commit it. Failures leave the store untouched.
pub async fn load_meteorites(loader: &MeteoriteLoader, store: &MeteoriteStore) -> bool {
    let ticket = store.ticket();
    match loader.fetch().await {
        Ok(records) => {
            info!(ticket, records = records.len(), "Fetched meteorites");
            let committed = store.commit(ticket, records).await;
            counter!("impact_loads_total", "outcome" => commit_outcome(committed)).increment(1);
            committed
        }
        Err(e) => {
            error!(ticket, error = %e, "Meteorite load failed");
            counter!("impact_loads_total", "outcome" => "error").increment(1);
            false
        }
    }
}

/// The single `impact_loads_total` label for a fetched load.
fn commit_outcome(committed: bool) -> &'static str {
    if committed {
        "ok"
    } else {
        "stale"
    }
}

/// Load once now, then on every `interval` tick if one is set. Each
/// refresh runs as its own task, so a slow request does not hold up the
/// next one.
pub fn spawn_loads(
    loader: Arc<MeteoriteLoader>,
    store: Arc<MeteoriteStore>,
    interval: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(period) = interval else {
            load_meteorites(&loader, &store).await;
            return;
        };

        info!(seconds = period.as_secs(), "Meteorite refresh enabled");
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let loader = Arc::clone(&loader);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                load_meteorites(&loader, &store).await;
            });
        }
    })
}
