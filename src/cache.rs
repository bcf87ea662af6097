use crate::data_provider::{PlayerQuery, RecordSource, SameMatchEntry, SourceError};
use crate::metadata::{CrossStats, RecordSummary};
use crate::stats::PlayerExtendedStats;
use cached::proc_macro::cached;

pub use cached::Cached;

pub async fn clear_all_caches() {
    SUMMARY_CACHE.lock().await.cache_clear();
    CROSS_STATS_CACHE.lock().await.cache_clear();
    EXTENDED_STATS_CACHE.lock().await.cache_clear();
    SAME_MATCH_CACHE.lock().await.cache_clear();
}

#[cfg(test)]
#[derive(Debug)]
pub struct CacheStats {
    pub summary_entries: usize,
    pub cross_stats_entries: usize,
    pub extended_stats_entries: usize,
    pub same_match_entries: usize,
}

#[cfg(test)]
pub async fn cache_stats() -> CacheStats {
    CacheStats {
        summary_entries: SUMMARY_CACHE.lock().await.cache_size(),
        cross_stats_entries: CROSS_STATS_CACHE.lock().await.cache_size(),
        extended_stats_entries: EXTENDED_STATS_CACHE.lock().await.cache_size(),
        same_match_entries: SAME_MATCH_CACHE.lock().await.cache_size(),
    }
}

#[cached(
    name = "SUMMARY_CACHE",
    type = "cached::TimedSizedCache<String, Option<RecordSummary>>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(64, 300) }",
    convert = r#"{ format!("{}/{}", source.name(), query.cache_key()) }"#,
    result = true
)]
pub async fn fetch_summary_cached(
    source: &dyn RecordSource,
    query: &PlayerQuery,
) -> Result<Option<RecordSummary>, SourceError> {
    source.summary(query).await
}

#[cached(
    name = "CROSS_STATS_CACHE",
    type = "cached::TimedSizedCache<String, CrossStats>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(32, 600) }",
    convert = r#"{ format!("{}/{}", source.name(), player_id) }"#,
    result = true
)]
pub async fn fetch_cross_stats_cached(
    source: &dyn RecordSource,
    player_id: u32,
) -> Result<CrossStats, SourceError> {
    source.cross_stats(player_id).await
}

#[cached(
    name = "EXTENDED_STATS_CACHE",
    type = "cached::TimedSizedCache<String, PlayerExtendedStats>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(64, 600) }",
    convert = r#"{ format!("{}/{}", source.name(), query.cache_key()) }"#,
    result = true
)]
pub async fn fetch_extended_stats_cached(
    source: &dyn RecordSource,
    query: &PlayerQuery,
) -> Result<PlayerExtendedStats, SourceError> {
    source.extended_stats(query).await
}

#[cached(
    name = "SAME_MATCH_CACHE",
    type = "cached::TimedSizedCache<String, Vec<SameMatchEntry>>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(32, 600) }",
    convert = r#"{ format!("{}/{}/{}", source.name(), query.cache_key(), limit) }"#,
    result = true
)]
pub async fn fetch_same_match_cached(
    source: &dyn RecordSource,
    query: &PlayerQuery,
    limit: usize,
) -> Result<Vec<SameMatchEntry>, SourceError> {
    source.same_match(query, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_provider::DatasetSource;
    use crate::fixtures;
    use crate::records::DateRange;
    use crate::types::GameMode;

    // Each test gets its own source, so cache keys never collide across tests
    fn source() -> DatasetSource {
        DatasetSource::new(fixtures::demo_dataset())
    }

    #[tokio::test]
    async fn test_summary_cache_hit_returns_same_value() {
        let source = source();
        let query = PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[], DateRange::all());

        let first = fetch_summary_cached(&source, &query).await.unwrap();
        let second = fetch_summary_cached(&source, &query).await.unwrap();
        assert_eq!(first, second);

        let key = format!("{}/{}", source.name(), query.cache_key());
        assert!(SUMMARY_CACHE.lock().await.cache_get(&key).is_some());
    }

    #[tokio::test]
    async fn test_distinct_queries_are_cached_separately() {
        let source = source();
        let all = PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[], DateRange::all());
        let jade = PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[GameMode::Jade4South], DateRange::all());

        let a = fetch_extended_stats_cached(&source, &all).await.unwrap();
        let b = fetch_extended_stats_cached(&source, &jade).await.unwrap();
        assert_ne!(a.count, b.count);

        let mut cache = EXTENDED_STATS_CACHE.lock().await;
        assert!(cache
            .cache_get(&format!("{}/{}", source.name(), all.cache_key()))
            .is_some());
        assert!(cache
            .cache_get(&format!("{}/{}", source.name(), jade.cache_key()))
            .is_some());
    }

    #[tokio::test]
    async fn test_cache_stats_counts_entries() {
        let source = source();
        fetch_cross_stats_cached(&source, fixtures::DEMO_PLAYER_ID)
            .await
            .unwrap();
        let stats = cache_stats().await;
        assert!(stats.cross_stats_entries >= 1);
    }
}
