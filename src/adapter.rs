/// Lazy, paginated access to one player's records and metadata
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::cache;
use crate::data_provider::{PlayerQuery, RecordSource};
use crate::metadata::{ExtendedStats, PlayerMetadata, RecordSummary};
use crate::records::GameRecord;
use crate::stats::PlayerExtendedStats;

/// Called whenever a background load completes
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Data source the player view renders from
///
/// Reads are side-effecting: asking for data that is not loaded yet starts
/// a background load and answers "absent". Completion is announced through
/// the adapter's change listener.
pub trait DataAdapter: Send + Sync + fmt::Debug {
    fn metadata(&self) -> Option<Arc<PlayerMetadata>>;

    /// Record count, 0 until the metadata is known
    fn count(&self) -> usize;

    fn is_item_loaded(&self, index: usize) -> bool;

    fn item(&self, index: usize) -> Option<Arc<GameRecord>>;

    /// Last load failure, if any
    fn error(&self) -> Option<String> {
        None
    }
}

pub type AdapterRef = Arc<dyn DataAdapter>;

/// Identity comparison, ignoring vtable differences
pub fn same_adapter(a: &AdapterRef, b: &AdapterRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Adapter for "no player selected"
#[derive(Debug, Default)]
pub struct EmptyAdapter;

impl EmptyAdapter {
    pub fn shared() -> AdapterRef {
        Arc::new(EmptyAdapter)
    }
}

impl DataAdapter for EmptyAdapter {
    fn metadata(&self) -> Option<Arc<PlayerMetadata>> {
        None
    }

    fn count(&self) -> usize {
        0
    }

    fn is_item_loaded(&self, _index: usize) -> bool {
        false
    }

    fn item(&self, _index: usize) -> Option<Arc<GameRecord>> {
        None
    }
}

#[derive(Debug, Clone)]
enum LoadSlot<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T: Clone> LoadSlot<T> {
    fn ready(&self) -> Option<T> {
        match self {
            LoadSlot::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Mark idle slots as loading; true when the caller should start the load
    fn begin(&mut self) -> bool {
        if matches!(self, LoadSlot::Idle) {
            *self = LoadSlot::Loading;
            true
        } else {
            false
        }
    }
}

#[derive(Debug)]
struct Inner {
    metadata: LoadSlot<Arc<PlayerMetadata>>,
    pages: HashMap<usize, LoadSlot<Arc<Vec<Arc<GameRecord>>>>>,
    error: Option<String>,
}

/// Adapter over a `RecordSource` for one `PlayerQuery`
pub struct PlayerDataAdapter {
    query: PlayerQuery,
    source: Arc<dyn RecordSource>,
    runtime: Handle,
    page_size: usize,
    inner: Arc<Mutex<Inner>>,
    listener: ChangeListener,
}

impl fmt::Debug for PlayerDataAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerDataAdapter")
            .field("query", &self.query)
            .field("source", &self.source.name())
            .finish()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlayerDataAdapter {
    pub fn new(
        query: PlayerQuery,
        source: Arc<dyn RecordSource>,
        runtime: Handle,
        page_size: usize,
        listener: ChangeListener,
    ) -> Self {
        Self {
            query,
            source,
            runtime,
            page_size: page_size.max(1),
            inner: Arc::new(Mutex::new(Inner {
                metadata: LoadSlot::Idle,
                pages: HashMap::new(),
                error: None,
            })),
            listener,
        }
    }

    pub fn query(&self) -> &PlayerQuery {
        &self.query
    }

    fn ensure_metadata(&self) {
        if !lock(&self.inner).metadata.begin() {
            return;
        }
        debug!("ADAPTER: loading metadata for {}", self.query.cache_key());

        let source = self.source.clone();
        let query = self.query.clone();
        let inner = self.inner.clone();
        let listener = self.listener.clone();
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let summary = cache::fetch_summary_cached(source.as_ref(), &query).await;
            let cross = cache::fetch_cross_stats_cached(source.as_ref(), query.player_id).await;

            let slot = match summary {
                Ok(summary) => {
                    let cross_stats = match cross {
                        Ok(cross) => Some(cross),
                        Err(e) => {
                            warn!("ADAPTER: cross stats failed for {}: {}", query.player_id, e);
                            None
                        }
                    };
                    let summary = summary.unwrap_or_else(|| RecordSummary {
                        id: query.player_id,
                        ..Default::default()
                    });
                    let (resolver, extended_stats) = ExtendedStats::pending();

                    let stats_source = source.clone();
                    let stats_query = query.clone();
                    let stats_listener = listener.clone();
                    runtime.spawn(async move {
                        let stats = match cache::fetch_extended_stats_cached(
                            stats_source.as_ref(),
                            &stats_query,
                        )
                        .await
                        {
                            Ok(stats) => stats,
                            Err(e) => {
                                warn!("ADAPTER: extended stats failed: {}", e);
                                PlayerExtendedStats::default()
                            }
                        };
                        resolver.resolve(stats);
                        stats_listener();
                    });

                    LoadSlot::Ready(Arc::new(PlayerMetadata {
                        summary,
                        cross_stats,
                        extended_stats,
                    }))
                }
                Err(e) => {
                    warn!("ADAPTER: metadata failed for {}: {}", query.cache_key(), e);
                    LoadSlot::Failed(e.to_string())
                }
            };

            {
                let mut guard = lock(&inner);
                if let LoadSlot::Failed(message) = &slot {
                    guard.error = Some(message.clone());
                }
                guard.metadata = slot;
            }
            listener();
        });
    }

    fn ensure_page(&self, page: usize) {
        if !lock(&self.inner)
            .pages
            .entry(page)
            .or_insert(LoadSlot::Idle)
            .begin()
        {
            return;
        }
        debug!("ADAPTER: loading page {} for {}", page, self.query.cache_key());

        let source = self.source.clone();
        let query = self.query.clone();
        let inner = self.inner.clone();
        let listener = self.listener.clone();
        let page_size = self.page_size;

        self.runtime.spawn(async move {
            let result = source.records(&query, page * page_size, page_size).await;
            {
                let mut guard = lock(&inner);
                let slot = match result {
                    Ok(records) => {
                        LoadSlot::Ready(Arc::new(records.into_iter().map(Arc::new).collect()))
                    }
                    Err(e) => {
                        warn!("ADAPTER: page {} failed: {}", page, e);
                        guard.error = Some(e.to_string());
                        LoadSlot::Failed(e.to_string())
                    }
                };
                guard.pages.insert(page, slot);
            }
            listener();
        });
    }

    fn loaded_item(&self, index: usize) -> Option<Arc<GameRecord>> {
        let guard = lock(&self.inner);
        let page = guard.pages.get(&(index / self.page_size))?.ready()?;
        page.get(index % self.page_size).cloned()
    }
}

impl DataAdapter for PlayerDataAdapter {
    fn metadata(&self) -> Option<Arc<PlayerMetadata>> {
        let ready = lock(&self.inner).metadata.ready();
        if ready.is_none() {
            self.ensure_metadata();
        }
        ready
    }

    fn count(&self) -> usize {
        self.metadata().map_or(0, |m| m.count())
    }

    fn is_item_loaded(&self, index: usize) -> bool {
        self.loaded_item(index).is_some()
    }

    fn item(&self, index: usize) -> Option<Arc<GameRecord>> {
        let item = self.loaded_item(index);
        if item.is_none() {
            self.ensure_page(index / self.page_size);
        }
        item
    }

    fn error(&self) -> Option<String> {
        lock(&self.inner).error.clone()
    }
}

/// Hands out adapters for queries, reusing the current one while the query
/// is unchanged
pub struct AdapterProvider {
    source: Arc<dyn RecordSource>,
    runtime: Handle,
    page_size: usize,
    listener: ChangeListener,
    current: Mutex<Option<(PlayerQuery, AdapterRef)>>,
}

impl AdapterProvider {
    pub fn new(
        source: Arc<dyn RecordSource>,
        runtime: Handle,
        page_size: usize,
        listener: ChangeListener,
    ) -> Self {
        Self {
            source,
            runtime,
            page_size,
            listener,
            current: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// Adapter for the query; `None` yields the empty adapter
    pub fn adapter_for(&self, query: Option<&PlayerQuery>) -> AdapterRef {
        let Some(query) = query else {
            return EmptyAdapter::shared();
        };
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((current_query, adapter)) = current.as_ref() {
            if current_query == query {
                return adapter.clone();
            }
        }
        let adapter = self.build(query);
        *current = Some((query.clone(), adapter.clone()));
        adapter
    }

    /// Always build a new adapter, discarding anything loaded for the query
    pub fn fresh_adapter(&self, query: Option<&PlayerQuery>) -> AdapterRef {
        let Some(query) = query else {
            return EmptyAdapter::shared();
        };
        let adapter = self.build(query);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((query.clone(), adapter.clone()));
        adapter
    }

    fn build(&self, query: &PlayerQuery) -> AdapterRef {
        Arc::new(PlayerDataAdapter::new(
            query.clone(),
            self.source.clone(),
            self.runtime.clone(),
            self.page_size,
            self.listener.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_provider::DatasetSource;
    use crate::fixtures;
    use crate::records::DateRange;
    use crate::types::GameMode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn source() -> Arc<dyn RecordSource> {
        Arc::new(DatasetSource::new(fixtures::demo_dataset()))
    }

    fn notifying_listener() -> (ChangeListener, Arc<Notify>, Arc<AtomicUsize>) {
        let notify = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let n = notify.clone();
        let c = calls.clone();
        let listener: ChangeListener = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
            n.notify_one();
        });
        (listener, notify, calls)
    }

    async fn settle(notify: &Notify) {
        tokio::time::timeout(Duration::from_secs(5), notify.notified())
            .await
            .unwrap();
    }

    fn demo_query() -> PlayerQuery {
        PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[], DateRange::all())
    }

    #[tokio::test]
    async fn test_metadata_loads_in_background() {
        let (listener, notify, _) = notifying_listener();
        let adapter = PlayerDataAdapter::new(demo_query(), source(), Handle::current(), 10, listener);

        assert!(adapter.metadata().is_none());
        assert_eq!(adapter.count(), 0);
        settle(&notify).await;

        let metadata = adapter.metadata().unwrap();
        assert_eq!(metadata.nickname(), fixtures::DEMO_PLAYER_NICKNAME);
        assert_eq!(adapter.count(), metadata.count());
        assert!(metadata.played_modes().unwrap().contains(&GameMode::Jade4South));

        let stats = tokio::time::timeout(Duration::from_secs(5), metadata.extended_stats.wait())
            .await
            .unwrap()
            .unwrap();
        assert!(stats.count > 0);
    }

    #[tokio::test]
    async fn test_items_load_by_page() {
        let (listener, notify, _) = notifying_listener();
        let adapter = PlayerDataAdapter::new(demo_query(), source(), Handle::current(), 10, listener);

        assert!(!adapter.is_item_loaded(0));
        assert!(adapter.item(0).is_none());
        settle(&notify).await;

        assert!(adapter.is_item_loaded(0));
        assert!(adapter.is_item_loaded(9));
        assert!(!adapter.is_item_loaded(10));
        let first = adapter.item(0).unwrap();
        assert!(first.player(fixtures::DEMO_PLAYER_ID).is_some());
    }

    #[tokio::test]
    async fn test_player_without_records_has_zero_count_metadata() {
        let (listener, notify, _) = notifying_listener();
        let query = PlayerQuery::new(
            fixtures::DEMO_PLAYER_ID,
            &[GameMode::Gold4East],
            DateRange::all(),
        );
        let adapter = PlayerDataAdapter::new(query, source(), Handle::current(), 10, listener);

        adapter.metadata();
        settle(&notify).await;

        let metadata = adapter.metadata().unwrap();
        assert_eq!(metadata.count(), 0);
        assert!(metadata.played_modes().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_provider_reuses_adapter_for_same_query() {
        let (listener, _, _) = notifying_listener();
        let provider = AdapterProvider::new(source(), Handle::current(), 10, listener);
        let query = demo_query();

        let a = provider.adapter_for(Some(&query));
        let b = provider.adapter_for(Some(&query));
        assert!(same_adapter(&a, &b));

        let other = PlayerQuery::new(
            fixtures::DEMO_PLAYER_ID,
            &[GameMode::Jade4South],
            DateRange::all(),
        );
        let c = provider.adapter_for(Some(&other));
        assert!(!same_adapter(&a, &c));

        let d = provider.fresh_adapter(Some(&other));
        assert!(!same_adapter(&c, &d));
    }

    #[test]
    fn test_empty_adapter() {
        let adapter = EmptyAdapter::shared();
        assert!(adapter.metadata().is_none());
        assert_eq!(adapter.count(), 0);
        assert!(adapter.item(0).is_none());
    }
}
