/// Page-view analytics
///
/// A view is scheduled when the page path changes and sent after the next
/// rendered frame, so the title reflects what was actually drawn. A newer
/// path change before that frame replaces the scheduled view.
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::AnalyticsConfig;

const DEFAULT_CATEGORY: &str = "Home";

/// Category the current page belongs to, passed with every tracking call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub category: String,
}

impl PageContext {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl Default for PageContext {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub hit_type: String,
    pub page: String,
    pub title: String,
    pub content_group: String,
}

pub trait PageViewSink: Send + Sync {
    fn send(&self, view: &PageView) -> Result<()>;
}

/// Appends page views to a JSON-lines file
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PageViewSink for FileSink {
    fn send(&self, view: &PageView) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let line = serde_json::to_string(view)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

pub struct Tracker {
    sink: Option<Box<dyn PageViewSink>>,
    current_page: Option<String>,
    scheduled: Option<String>,
}

impl Tracker {
    pub fn disabled() -> Self {
        Self {
            sink: None,
            current_page: None,
            scheduled: None,
        }
    }

    pub fn new(sink: Box<dyn PageViewSink>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::disabled()
        }
    }

    /// Active only when enabled with a sink, and in release builds unless
    /// debug builds are explicitly allowed
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let build_allowed = !cfg!(debug_assertions) || config.allow_debug_builds;
        match (&config.sink, config.enabled && build_allowed) {
            (Some(path), true) => Self::new(Box::new(FileSink::new(path.clone()))),
            _ => Self::disabled(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Record a navigation; a view is scheduled only when the path changed
    pub fn location_changed(&mut self, page: &str) {
        if !self.is_active() || self.current_page.as_deref() == Some(page) {
            return;
        }
        self.current_page = Some(page.to_string());
        // Replaces any view still waiting for its frame
        self.scheduled = Some(page.to_string());
    }

    /// Send the scheduled view, if any, once a frame has been drawn
    pub fn on_frame(&mut self, context: &PageContext, title: &str) -> Option<PageView> {
        let page = self.scheduled.take()?;
        let sink = self.sink.as_ref()?;
        let view = PageView {
            hit_type: "pageview".to_string(),
            page,
            title: format!("{} {}", context.category, title),
            content_group: context.category.clone(),
        };
        info!(target: "analytics", page = %view.page, title = %view.title, "pageview");
        if let Err(e) = sink.send(&view) {
            warn!("Failed to record page view: {:#}", e);
        }
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemorySink(Arc<Mutex<Vec<PageView>>>);

    impl PageViewSink for MemorySink {
        fn send(&self, view: &PageView) -> Result<()> {
            self.0.lock().unwrap().push(view.clone());
            Ok(())
        }
    }

    fn tracker() -> (Tracker, MemorySink) {
        let sink = MemorySink::default();
        (Tracker::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_view_is_sent_after_frame() {
        let (mut tracker, sink) = tracker();
        let context = PageContext::new("Player");

        tracker.location_changed("/player/1");
        assert!(sink.0.lock().unwrap().is_empty());

        let view = tracker.on_frame(&context, "someone").unwrap();
        assert_eq!(view.page, "/player/1");
        assert_eq!(view.title, "Player someone");
        assert_eq!(view.content_group, "Player");
        assert_eq!(view.hit_type, "pageview");
        assert_eq!(sink.0.lock().unwrap().len(), 1);

        // Nothing scheduled for later frames
        assert!(tracker.on_frame(&context, "someone").is_none());
    }

    #[test]
    fn test_newer_location_cancels_scheduled_view() {
        let (mut tracker, sink) = tracker();
        tracker.location_changed("/player/1");
        tracker.location_changed("/player/1/riichi");
        tracker.on_frame(&PageContext::default(), "t");

        let sent = sink.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].page, "/player/1/riichi");
        assert_eq!(sent[0].content_group, "Home");
    }

    #[test]
    fn test_same_location_is_not_tracked_twice() {
        let (mut tracker, sink) = tracker();
        tracker.location_changed("/a");
        tracker.on_frame(&PageContext::default(), "t");
        tracker.location_changed("/a");
        assert!(tracker.on_frame(&PageContext::default(), "t").is_none());
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_context_is_explicit_per_call() {
        let (mut tracker, _) = tracker();
        tracker.location_changed("/a");
        let a = tracker.on_frame(&PageContext::new("Ranking"), "x").unwrap();
        tracker.location_changed("/b");
        let b = tracker.on_frame(&PageContext::new("Player"), "x").unwrap();
        assert_eq!(a.content_group, "Ranking");
        assert_eq!(b.content_group, "Player");
    }

    #[test]
    fn test_disabled_without_sink_or_flag() {
        let config = AnalyticsConfig {
            enabled: true,
            sink: None,
            allow_debug_builds: true,
        };
        assert!(!Tracker::from_config(&config).is_active());

        let config = AnalyticsConfig {
            enabled: false,
            sink: Some(PathBuf::from("/tmp/x.jsonl")),
            allow_debug_builds: true,
        };
        assert!(!Tracker::from_config(&config).is_active());

        let mut tracker = Tracker::disabled();
        tracker.location_changed("/a");
        assert!(tracker.on_frame(&PageContext::default(), "t").is_none());
    }

    #[test]
    fn test_file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.jsonl");
        let config = AnalyticsConfig {
            enabled: true,
            sink: Some(path.clone()),
            allow_debug_builds: true,
        };
        let mut tracker = Tracker::from_config(&config);
        assert!(tracker.is_active());

        tracker.location_changed("/a");
        tracker.on_frame(&PageContext::default(), "one");
        tracker.location_changed("/b");
        tracker.on_frame(&PageContext::default(), "two");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["page"], "/a");
        assert_eq!(first["title"], "Home one");
    }
}
