//! Dashboard controller
//!
//! Owns pagination, filters and the view model. Stats and requests are two
//! independent load tracks, each with an explicit state machine. Loads are
//! split into `begin_*` (state transition, returns what to fetch) and
//! `finish_*` (applies the fetch result), so a caller can run the network
//! part anywhere; the async `load_*` helpers do both in one go.

use crate::api::{ApiClient, QueryParams};
use crate::dashboard::filters::{FilterInputs, FilterSet};
use crate::dashboard::view::{stat_cards, RequestRow, StatCard};
use crate::error::ApiResult;
use crate::format::Region;
use crate::models::{RequestRecord, StatsSummary};

pub const STATS_LOADING_MESSAGE: &str = "Loading statistics...";
pub const STATS_ERROR_MESSAGE: &str = "Failed to load statistics";
pub const REQUESTS_ERROR_MESSAGE: &str = "Failed to load requests";
pub const LOAD_MORE_ERROR_MESSAGE: &str = "Failed to load more requests";
pub const UNEXPECTED_ERROR_PREFIX: &str = "Unexpected error";

/// Stats track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Requests track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestsState {
    Idle,
    Loading { reset: bool },
    Loaded,
    Failed { reset: bool },
}

/// A requests fetch handed out by [`Dashboard::begin_requests`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestsQuery {
    pub limit: usize,
    pub offset: usize,
    pub filters: FilterSet,
    pub reset: bool,
    generation: u64,
}

impl RequestsQuery {
    /// `limit`, `offset`, then the active filters
    pub fn to_params(&self) -> QueryParams {
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        params.extend(self.filters.to_params());
        params
    }
}

pub struct Dashboard {
    limit: usize,
    offset: usize,
    filters: FilterSet,
    stats_state: StatsState,
    requests_state: RequestsState,
    /// Bumped by every reset load; results from older generations are dropped
    generation: u64,
    stats: Region<Vec<StatCard>>,
    table: Region<Vec<RequestRow>>,
    load_more_visible: bool,
    notice: Option<String>,
}

impl Dashboard {
    /// Create a controller with a fixed page size
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
            filters: FilterSet::default(),
            stats_state: StatsState::Idle,
            requests_state: RequestsState::Idle,
            generation: 0,
            stats: Region::Ready(Vec::new()),
            table: Region::Ready(Vec::new()),
            load_more_visible: false,
            notice: None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn stats_state(&self) -> StatsState {
        self.stats_state
    }

    pub fn requests_state(&self) -> RequestsState {
        self.requests_state
    }

    pub fn stats(&self) -> &Region<Vec<StatCard>> {
        &self.stats
    }

    pub fn table(&self) -> &Region<Vec<RequestRow>> {
        &self.table
    }

    /// Rows currently in the table (empty while the table shows an error)
    pub fn rows(&self) -> &[RequestRow] {
        self.table.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn load_more_visible(&self) -> bool {
        self.load_more_visible
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Show a failure that no region owns in the footer notice. The next
    /// successful requests load clears it.
    pub fn report_unexpected(&mut self, message: &str) {
        self.notice = Some(format!("{}: {}", UNEXPECTED_ERROR_PREFIX, message));
    }

    // ---- stats track ----

    /// Start a stats load. Returns false if one is already in flight.
    pub fn begin_stats(&mut self) -> bool {
        if self.stats_state == StatsState::Loading {
            tracing::debug!("Stats load already in flight");
            return false;
        }
        self.stats_state = StatsState::Loading;
        self.stats.show_loading(Some(STATS_LOADING_MESSAGE));
        true
    }

    /// Apply the result of a stats load started with [`Self::begin_stats`]
    pub fn finish_stats(&mut self, result: ApiResult<StatsSummary>) {
        match result {
            Ok(summary) => {
                self.stats = Region::Ready(stat_cards(&summary));
                self.stats_state = StatsState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading stats");
                self.stats.show_error(Some(STATS_ERROR_MESSAGE));
                self.stats_state = StatsState::Failed;
            }
        }
    }

    // ---- requests track ----

    /// Start a requests load
    ///
    /// A reset load always starts (superseding any load in flight) and asks for
    /// offset 0. An incremental load is refused while another load is in flight.
    pub fn begin_requests(&mut self, reset: bool) -> Option<RequestsQuery> {
        if reset {
            self.generation += 1;
            self.offset = 0;
        } else if matches!(self.requests_state, RequestsState::Loading { .. }) {
            tracing::debug!("Requests load already in flight, ignoring load more");
            return None;
        }

        self.requests_state = RequestsState::Loading { reset };
        Some(RequestsQuery {
            limit: self.limit,
            offset: self.offset,
            filters: self.filters.clone(),
            reset,
            generation: self.generation,
        })
    }

    /// Start an incremental load, only when the load-more affordance is shown
    pub fn begin_load_more(&mut self) -> Option<RequestsQuery> {
        if !self.load_more_visible {
            return None;
        }
        self.begin_requests(false)
    }

    /// Replace the active filters from control values and start a reset load
    pub fn begin_apply_filters(&mut self, inputs: &FilterInputs) -> Option<RequestsQuery> {
        self.filters = FilterSet::from_inputs(inputs);
        tracing::info!(filters = %self.filters, "Applying filters");
        self.begin_requests(true)
    }

    /// Apply the result of a requests load
    pub fn finish_requests(&mut self, query: &RequestsQuery, result: ApiResult<Vec<RequestRecord>>) {
        if query.generation != self.generation {
            tracing::debug!(
                generation = query.generation,
                current = self.generation,
                "Dropping superseded requests result"
            );
            return;
        }

        match result {
            Ok(records) => {
                if query.reset {
                    self.clear_requests_table();
                }
                self.render_requests(&records);
                self.update_load_more(records.len());
                self.offset = query.offset + records.len();
                self.notice = None;
                self.requests_state = RequestsState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, reset = query.reset, "Error loading requests");
                if query.reset {
                    self.table.show_error(Some(REQUESTS_ERROR_MESSAGE));
                    self.load_more_visible = false;
                } else {
                    self.notice = Some(LOAD_MORE_ERROR_MESSAGE.to_string());
                }
                self.requests_state = RequestsState::Failed { reset: query.reset };
            }
        }
    }

    fn clear_requests_table(&mut self) {
        self.table = Region::Ready(Vec::new());
    }

    /// Append one formatted row per record
    pub fn render_requests(&mut self, records: &[RequestRecord]) {
        let new_rows = records.iter().map(RequestRow::from_record);
        match &mut self.table {
            Region::Ready(rows) => rows.extend(new_rows),
            other => *other = Region::Ready(new_rows.collect()),
        }
    }

    fn update_load_more(&mut self, received: usize) {
        self.load_more_visible = received == self.limit;
    }

    // ---- async conveniences ----

    /// Load stats and the first page of requests concurrently
    pub async fn initialize(&mut self, api: &ApiClient) {
        self.refresh(api).await;
    }

    /// Reload stats and restart the request list from offset 0
    pub async fn refresh(&mut self, api: &ApiClient) {
        let stats_started = self.begin_stats();
        let query = self.begin_requests(true);

        let stats_fut = async {
            if stats_started {
                Some(api.get_stats().await)
            } else {
                None
            }
        };
        let requests_fut = async {
            match &query {
                Some(q) => Some(api.get_requests(&q.to_params()).await),
                None => None,
            }
        };
        let (stats, requests) = tokio::join!(stats_fut, requests_fut);

        if let Some(result) = stats {
            self.finish_stats(result);
        }
        if let (Some(q), Some(result)) = (&query, requests) {
            self.finish_requests(q, result);
        }
    }

    pub async fn load_stats(&mut self, api: &ApiClient) {
        if self.begin_stats() {
            let result = api.get_stats().await;
            self.finish_stats(result);
        }
    }

    pub async fn load_requests(&mut self, api: &ApiClient, reset: bool) {
        if let Some(query) = self.begin_requests(reset) {
            self.run_requests(api, query).await;
        }
    }

    pub async fn load_more(&mut self, api: &ApiClient) {
        if let Some(query) = self.begin_load_more() {
            self.run_requests(api, query).await;
        }
    }

    pub async fn apply_filters(&mut self, api: &ApiClient, inputs: &FilterInputs) {
        if let Some(query) = self.begin_apply_filters(inputs) {
            self.run_requests(api, query).await;
        }
    }

    async fn run_requests(&mut self, api: &ApiClient, query: RequestsQuery) {
        let result = api.get_requests(&query.to_params()).await;
        self.finish_requests(&query, result);
    }
}
