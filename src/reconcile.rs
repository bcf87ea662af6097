/// Decides when the player view may switch from the adapter it displays to
/// the latest one
///
/// The view keeps rendering the old adapter until the new one has metadata,
/// its first record and its extended statistics, so switching settings never
/// flashes half-loaded data. Every run bumps an epoch; a deferred switch only
/// commits if its epoch is still the pending one when the stats resolve.
use std::sync::Arc;
use tracing::debug;

use crate::adapter::{same_adapter, AdapterRef};
use crate::metadata::{self, ExtendedStats, PlayerMetadata};

/// Outcome of one reconciliation run
#[derive(Debug, Clone)]
pub enum Reconcile {
    /// Latest adapter is already displayed
    Unchanged,
    AwaitingMetadata,
    /// First record was requested; retry on the next change notification
    AwaitingFirstItem,
    /// Switch once `stats` resolves, via `Reconciler::resolve(epoch)`
    Deferred { epoch: u64, stats: ExtendedStats },
    Switched,
}

impl Reconcile {
    pub fn switched(&self) -> bool {
        matches!(self, Reconcile::Switched)
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    latest: AdapterRef,
    displayed: AdapterRef,
    epoch: u64,
    pending: Option<u64>,
}

impl Reconciler {
    pub fn new(adapter: AdapterRef) -> Self {
        Self {
            latest: adapter.clone(),
            displayed: adapter,
            epoch: 0,
            pending: None,
        }
    }

    pub fn latest(&self) -> &AdapterRef {
        &self.latest
    }

    pub fn displayed(&self) -> &AdapterRef {
        &self.displayed
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Epoch of the deferred switch waiting on extended stats
    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Replace the latest adapter and reconcile against it
    pub fn set_latest(&mut self, adapter: AdapterRef) -> Reconcile {
        self.latest = adapter;
        self.reconcile()
    }

    /// Run one reconciliation step
    ///
    /// Any previously deferred switch is superseded, whatever the outcome.
    pub fn reconcile(&mut self) -> Reconcile {
        self.epoch += 1;
        self.pending = None;

        if same_adapter(&self.latest, &self.displayed) {
            return Reconcile::Unchanged;
        }

        self.latest.count();
        let Some(latest_metadata) = self.latest.metadata() else {
            debug!("RECONCILE[{}]: waiting for metadata", self.epoch);
            return Reconcile::AwaitingMetadata;
        };

        if self.displayed.metadata().is_some_and(|m| m.count() == 0) {
            debug!("RECONCILE[{}]: displayed adapter is empty, switching", self.epoch);
            return self.switch();
        }

        // Nothing matches the filters, so no first record will ever load
        if latest_metadata.count() > 0 && !self.latest.is_item_loaded(0) {
            self.latest.item(0);
            debug!("RECONCILE[{}]: waiting for first record", self.epoch);
            return Reconcile::AwaitingFirstItem;
        }

        if latest_metadata.extended_stats.is_pending() {
            debug!("RECONCILE[{}]: deferring until extended stats resolve", self.epoch);
            self.pending = Some(self.epoch);
            return Reconcile::Deferred {
                epoch: self.epoch,
                stats: latest_metadata.extended_stats.clone(),
            };
        }

        self.switch()
    }

    /// Commit a deferred switch; stale epochs are ignored
    pub fn resolve(&mut self, epoch: u64) -> bool {
        if self.pending != Some(epoch) {
            debug!("RECONCILE: ignoring stale resolution for epoch {}", epoch);
            return false;
        }
        self.switch();
        true
    }

    fn switch(&mut self) -> Reconcile {
        self.pending = None;
        self.displayed = self.latest.clone();
        Reconcile::Switched
    }

    pub fn displayed_metadata(&self) -> Option<Arc<PlayerMetadata>> {
        self.displayed.metadata()
    }

    pub fn latest_metadata(&self) -> Option<Arc<PlayerMetadata>> {
        self.latest.metadata()
    }

    /// Displayed metadata names a player with records
    pub fn has_metadata(&self) -> bool {
        metadata::has_metadata(self.displayed_metadata().as_deref())
    }

    /// A switch is underway while older data is still on screen
    pub fn is_changing_settings(&self) -> bool {
        if !self.has_metadata() || same_adapter(&self.latest, &self.displayed) {
            return false;
        }
        match (self.displayed_metadata(), self.latest_metadata()) {
            (Some(displayed), Some(latest)) => !Arc::ptr_eq(&displayed, &latest),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ChangeListener, EmptyAdapter, PlayerDataAdapter};
    use crate::data_provider::{DatasetSource, PlayerQuery, RecordSource};
    use crate::fixtures;
    use crate::records::DateRange;
    use crate::stats::PlayerExtendedStats;
    use crate::tui::testing::{test_metadata, ScriptedAdapter};
    use chrono::NaiveDate;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::runtime::Handle;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    fn displaying(nickname: &str, count: usize) -> Reconciler {
        let shown = ScriptedAdapter::with_metadata(nickname, count);
        shown.load_first_item();
        Reconciler::new(shown.shared())
    }

    #[test]
    fn test_same_adapter_is_unchanged() {
        let adapter = ScriptedAdapter::with_metadata("a", 3);
        let mut reconciler = Reconciler::new(adapter.shared());
        assert!(matches!(reconciler.reconcile(), Reconcile::Unchanged));
        assert_eq!(adapter.metadata_requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_waits_for_latest_metadata() {
        let mut reconciler = displaying("a", 3);
        let latest = ScriptedAdapter::new();

        assert!(matches!(
            reconciler.set_latest(latest.shared()),
            Reconcile::AwaitingMetadata
        ));
        assert!(latest.metadata_requests.load(Ordering::SeqCst) > 0);
        assert!(!same_adapter(reconciler.displayed(), reconciler.latest()));
    }

    #[test]
    fn test_displayed_with_zero_records_switches_immediately() {
        let shown = ScriptedAdapter::with_metadata("a", 0);
        let mut reconciler = Reconciler::new(shown.shared());

        // Latest has no first item and pending stats, still switches
        let (latest, _resolver) = ScriptedAdapter::with_pending_stats("b", 5);
        assert!(reconciler.set_latest(latest.shared()).switched());
        assert!(same_adapter(reconciler.displayed(), &latest.shared()));
    }

    #[test]
    fn test_first_item_not_loaded_defers_until_next_change() {
        let mut reconciler = displaying("a", 3);
        let latest = ScriptedAdapter::with_metadata("b", 5);

        assert!(matches!(
            reconciler.set_latest(latest.shared()),
            Reconcile::AwaitingFirstItem
        ));
        assert_eq!(latest.item_requests.load(Ordering::SeqCst), 1);

        // Loading alone does not switch; the next notification does
        latest.load_first_item();
        assert!(!same_adapter(reconciler.displayed(), reconciler.latest()));
        assert!(reconciler.reconcile().switched());
        assert!(same_adapter(reconciler.displayed(), &latest.shared()));
    }

    #[test]
    fn test_latest_without_records_skips_first_item_wait() {
        let mut reconciler = displaying("a", 3);
        let latest = ScriptedAdapter::with_metadata("a", 0);

        assert!(reconciler.set_latest(latest.shared()).switched());
        assert_eq!(latest.item_requests.load(Ordering::SeqCst), 0);
        assert!(!reconciler.is_changing_settings());
    }

    /// Wait for background loads until the reconciler switches
    async fn settle_switch(reconciler: &mut Reconciler, notify: &Notify) {
        for _ in 0..20 {
            match reconciler.reconcile() {
                Reconcile::Switched | Reconcile::Unchanged => return,
                Reconcile::Deferred { epoch, stats } => {
                    timeout(Duration::from_secs(5), stats.wait()).await.unwrap();
                    assert!(reconciler.resolve(epoch));
                    return;
                }
                Reconcile::AwaitingMetadata | Reconcile::AwaitingFirstItem => {
                    let _ = timeout(Duration::from_millis(500), notify.notified()).await;
                }
            }
        }
        panic!("reconciler never switched");
    }

    #[tokio::test]
    async fn test_switches_to_filter_matching_no_records() {
        let notify = Arc::new(Notify::new());
        let n = notify.clone();
        let listener: ChangeListener = Arc::new(move || n.notify_one());
        let source: Arc<dyn RecordSource> = Arc::new(DatasetSource::new(fixtures::demo_dataset()));
        let adapter = |range: DateRange| -> AdapterRef {
            Arc::new(PlayerDataAdapter::new(
                PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[], range),
                source.clone(),
                Handle::current(),
                10,
                listener.clone(),
            ))
        };

        // Startup: nothing displayed, then the full history
        let mut reconciler = Reconciler::new(EmptyAdapter::shared());
        reconciler.set_latest(adapter(DateRange::all()));
        settle_switch(&mut reconciler, &notify).await;
        assert!(reconciler.has_metadata());

        // A range in the future matches nothing
        let future = DateRange {
            start: NaiveDate::from_ymd_opt(2999, 1, 1),
            end: None,
        };
        let empty = adapter(future);
        reconciler.set_latest(empty.clone());
        settle_switch(&mut reconciler, &notify).await;

        assert!(same_adapter(reconciler.displayed(), &empty));
        assert!(!reconciler.is_changing_settings());
        assert_eq!(reconciler.displayed_metadata().unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_startup_without_records_switches() {
        let notify = Arc::new(Notify::new());
        let n = notify.clone();
        let listener: ChangeListener = Arc::new(move || n.notify_one());
        let source: Arc<dyn RecordSource> = Arc::new(DatasetSource::new(fixtures::demo_dataset()));
        let future = DateRange {
            start: NaiveDate::from_ymd_opt(2999, 1, 1),
            end: None,
        };
        let empty: AdapterRef = Arc::new(PlayerDataAdapter::new(
            PlayerQuery::new(fixtures::DEMO_PLAYER_ID, &[], future),
            source,
            Handle::current(),
            10,
            listener,
        ));

        let mut reconciler = Reconciler::new(EmptyAdapter::shared());
        reconciler.set_latest(empty.clone());
        settle_switch(&mut reconciler, &notify).await;

        assert!(same_adapter(reconciler.displayed(), &empty));
        assert!(reconciler.displayed_metadata().is_some());
        assert!(!reconciler.has_metadata());
    }

    #[test]
    fn test_pending_stats_switch_after_resolution() {
        let mut reconciler = displaying("a", 3);
        let (latest, resolver) = ScriptedAdapter::with_pending_stats("b", 5);
        latest.load_first_item();

        let epoch = match reconciler.set_latest(latest.shared()) {
            Reconcile::Deferred { epoch, .. } => epoch,
            other => panic!("expected deferred switch, got {:?}", other),
        };
        assert!(reconciler.is_changing_settings());

        resolver.resolve(PlayerExtendedStats::new(5));
        assert!(reconciler.resolve(epoch));
        assert!(same_adapter(reconciler.displayed(), &latest.shared()));
        assert!(!reconciler.is_changing_settings());
    }

    #[test]
    fn test_superseded_resolution_is_ignored() {
        let mut reconciler = displaying("a", 3);
        let (first, _first_resolver) = ScriptedAdapter::with_pending_stats("b", 5);
        first.load_first_item();
        let (second, _second_resolver) = ScriptedAdapter::with_pending_stats("c", 7);
        second.load_first_item();

        let stale = match reconciler.set_latest(first.shared()) {
            Reconcile::Deferred { epoch, .. } => epoch,
            other => panic!("expected deferred switch, got {:?}", other),
        };
        let fresh = match reconciler.set_latest(second.shared()) {
            Reconcile::Deferred { epoch, .. } => epoch,
            other => panic!("expected deferred switch, got {:?}", other),
        };
        assert!(fresh > stale);

        assert!(!reconciler.resolve(stale));
        assert!(!same_adapter(reconciler.displayed(), &first.shared()));
        assert!(reconciler.resolve(fresh));
        assert!(same_adapter(reconciler.displayed(), &second.shared()));
    }

    #[test]
    fn test_rerun_cancels_pending_wait() {
        let mut reconciler = displaying("a", 3);
        let (latest, _resolver) = ScriptedAdapter::with_pending_stats("b", 5);
        latest.load_first_item();

        let epoch = match reconciler.set_latest(latest.shared()) {
            Reconcile::Deferred { epoch, .. } => epoch,
            other => panic!("expected deferred switch, got {:?}", other),
        };
        reconciler.reconcile();
        assert!(!reconciler.resolve(epoch));
        assert!(reconciler.pending().is_some());
    }

    #[test]
    fn test_resolved_stats_switch_immediately() {
        let mut reconciler = displaying("a", 3);
        let latest = ScriptedAdapter::with_metadata("b", 5);
        latest.load_first_item();
        assert!(reconciler.set_latest(latest.shared()).switched());
    }

    #[test]
    fn test_has_metadata_flag() {
        assert!(!Reconciler::new(EmptyAdapter::shared()).has_metadata());
        assert!(!displaying("", 3).has_metadata());
        assert!(!displaying("a", 0).has_metadata());
        assert!(displaying("a", 3).has_metadata());
    }

    #[test]
    fn test_changing_settings_requires_displayed_metadata() {
        // Nothing on screen yet: a pending switch is not "changing settings"
        let mut reconciler = Reconciler::new(EmptyAdapter::shared());
        let latest = ScriptedAdapter::with_metadata("b", 5);
        reconciler.set_latest(latest.shared());
        assert!(!reconciler.is_changing_settings());

        let mut reconciler = displaying("a", 3);
        let latest = ScriptedAdapter::new();
        reconciler.set_latest(latest.shared());
        assert!(reconciler.is_changing_settings());
    }

    #[test]
    fn test_shared_metadata_is_not_changing_settings() {
        let shown = ScriptedAdapter::new();
        let metadata = Arc::new(test_metadata("a", 3));
        shown.share_metadata(metadata.clone());
        let mut reconciler = Reconciler::new(shown.shared());

        // A distinct adapter exposing the very same metadata object
        let latest = ScriptedAdapter::new();
        latest.share_metadata(metadata);
        reconciler.set_latest(latest.shared());
        assert!(!same_adapter(reconciler.displayed(), reconciler.latest()));
        assert!(!reconciler.is_changing_settings());
    }
}
