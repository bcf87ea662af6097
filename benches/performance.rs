use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riichi_stats::adapter::{AdapterRef, DataAdapter};
use riichi_stats::data_provider::Dataset;
use riichi_stats::fixtures::{self, DEMO_PLAYER_ID};
use riichi_stats::metadata::{self, ExtendedStats, PlayerMetadata};
use riichi_stats::reconcile::Reconciler;
use riichi_stats::records::GameRecord;
use riichi_stats::stats::PlayerExtendedStats;
use riichi_stats::tui::action::Action;
use riichi_stats::tui::reducer::reduce;
use riichi_stats::tui::state::AppState;
use std::sync::Arc;

/// Adapter with everything loaded up front
#[derive(Debug)]
struct LoadedAdapter {
    metadata: Arc<PlayerMetadata>,
    records: Vec<Arc<GameRecord>>,
}

impl DataAdapter for LoadedAdapter {
    fn metadata(&self) -> Option<Arc<PlayerMetadata>> {
        Some(self.metadata.clone())
    }

    fn count(&self) -> usize {
        self.records.len()
    }

    fn is_item_loaded(&self, index: usize) -> bool {
        index < self.records.len()
    }

    fn item(&self, index: usize) -> Option<Arc<GameRecord>> {
        self.records.get(index).cloned()
    }
}

fn demo_adapter(dataset: &Dataset) -> AdapterRef {
    let records: Vec<GameRecord> = dataset
        .records
        .iter()
        .filter(|r| r.player(DEMO_PLAYER_ID).is_some())
        .cloned()
        .collect();
    let summary = metadata::summarize(DEMO_PLAYER_ID, &records).unwrap_or_default();
    Arc::new(LoadedAdapter {
        metadata: Arc::new(PlayerMetadata {
            summary,
            cross_stats: Some(metadata::cross_stats(DEMO_PLAYER_ID, &records)),
            extended_stats: ExtendedStats::resolved(PlayerExtendedStats::new(0)),
        }),
        records: records.into_iter().map(Arc::new).collect(),
    })
}

/// Benchmark record summaries over the demo dataset
fn bench_summarize(c: &mut Criterion) {
    let dataset = fixtures::demo_dataset();

    let mut group = c.benchmark_group("metadata");

    group.bench_function("summarize_demo_player", |b| {
        b.iter(|| metadata::summarize(black_box(DEMO_PLAYER_ID), black_box(&dataset.records)))
    });

    group.bench_function("cross_stats_demo_player", |b| {
        b.iter(|| metadata::cross_stats(black_box(DEMO_PLAYER_ID), black_box(&dataset.records)))
    });

    group.finish();
}

/// Benchmark merging per-lobby extended stats
fn bench_merge(c: &mut Criterion) {
    let dataset = fixtures::demo_dataset();
    let parts: Vec<PlayerExtendedStats> = dataset
        .extended_stats
        .iter()
        .filter(|entry| entry.account_id == DEMO_PLAYER_ID)
        .map(|entry| entry.stats.clone())
        .collect();

    c.bench_function("merge_extended_stats", |b| {
        b.iter(|| PlayerExtendedStats::merge(black_box(&parts)))
    });
}

/// Benchmark one adapter switch through the reconciler
fn bench_reconcile(c: &mut Criterion) {
    let dataset = fixtures::demo_dataset();
    let adapter = demo_adapter(&dataset);

    c.bench_function("reconcile_switch", |b| {
        b.iter(|| {
            let mut reconciler = Reconciler::new(riichi_stats::adapter::EmptyAdapter::shared());
            reconciler.set_latest(black_box(adapter.clone()))
        })
    });
}

/// Benchmark reducer action dispatch
fn bench_reducer_dispatch(c: &mut Criterion) {
    let state = AppState::default();

    let mut group = c.benchmark_group("reducer");

    group.bench_function("next_sub_view", |b| {
        b.iter(|| {
            let (new_state, _effect) = reduce(black_box(state.clone()), black_box(Action::NextSubView));
            new_state
        })
    });

    group.bench_function("toggle_settings_focus", |b| {
        b.iter(|| {
            let (new_state, _effect) =
                reduce(black_box(state.clone()), black_box(Action::ToggleSettingsFocus));
            new_state
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_summarize,
    bench_merge,
    bench_reconcile,
    bench_reducer_dispatch
);
criterion_main!(benches);
