//! Hidden entry to the admin panel: tap an inert page element five times.
//!
//! Counts are kept per page load (`pageId`), so reloading the page starts
//! over. This is a convenience shortcut, not an access control; the password
//! check still applies once the panel opens.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;

/// Taps needed to reveal the admin panel.
pub const KNOCKS_TO_OPEN: u32 = 5;

/// Page loads idle longer than this are forgotten.
const FORGET_AFTER: Duration = Duration::from_secs(30 * 60);

/// Most page loads tracked at once; the longest idle one is dropped beyond this.
const MAX_PAGES: usize = 1024;

/// Tap counter for a single page load.
#[derive(Debug, Default)]
pub struct KnockCounter {
    count: u32,
    last: Option<Instant>,
}

/// What the page should do after a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockOutcome {
    pub count: u32,
    pub open_admin: bool,
}

impl KnockCounter {
    /// Register one tap. With a `window`, a gap longer than it restarts the count.
    pub fn knock(&mut self, now: Instant, window: Option<Duration>) -> KnockOutcome {
        if let (Some(window), Some(last)) = (window, self.last) {
            if now.duration_since(last) > window {
                self.count = 0;
            }
        }

        self.count += 1;
        self.last = Some(now);

        let count = self.count;
        let open_admin = count >= KNOCKS_TO_OPEN;
        if open_admin {
            self.count = 0;
        }

        KnockOutcome { count, open_admin }
    }
}

/// Knock counters for all live page loads.
pub struct KnockRegistry {
    window: Option<Duration>,
    pages: Mutex<HashMap<String, KnockCounter>>,
}

impl KnockRegistry {
    pub fn new(window: Option<Duration>) -> Self {
        Self {
            window,
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub async fn knock(&self, page_id: &str) -> KnockOutcome {
        let now = Instant::now();
        let mut pages = self.pages.lock().await;

        if !pages.contains_key(page_id) && pages.len() >= MAX_PAGES {
            make_room(&mut pages, now);
        }

        let outcome = pages
            .entry(page_id.to_string())
            .or_default()
            .knock(now, self.window);

        if outcome.open_admin {
            tracing::info!(page_id, "Admin panel requested via hidden shortcut");
        }

        outcome
    }
}

/// Forget stale page loads, then the longest idle one if still full.
fn make_room(pages: &mut HashMap<String, KnockCounter>, now: Instant) {
    pages.retain(|_, counter| {
        counter
            .last
            .is_some_and(|last| now.duration_since(last) < FORGET_AFTER)
    });

    if pages.len() < MAX_PAGES {
        return;
    }

    let oldest = pages
        .iter()
        .min_by_key(|(_, counter)| counter.last)
        .map(|(page_id, _)| page_id.clone());
    if let Some(page_id) = oldest {
        pages.remove(&page_id);
        tracing::debug!(page_id = %page_id, "Dropped idle page from knock registry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifth_knock_opens_and_resets() {
        let mut counter = KnockCounter::default();
        let now = Instant::now();

        for expected in 1..KNOCKS_TO_OPEN {
            let outcome = counter.knock(now, None);
            assert_eq!(outcome.count, expected);
            assert!(!outcome.open_admin);
        }

        let outcome = counter.knock(now, None);
        assert_eq!(outcome.count, KNOCKS_TO_OPEN);
        assert!(outcome.open_admin);

        // Counting starts over after opening
        assert_eq!(counter.knock(now, None).count, 1);
    }

    #[test]
    fn test_without_window_gaps_do_not_reset() {
        let mut counter = KnockCounter::default();
        let start = Instant::now();

        for i in 0..4 {
            counter.knock(start + Duration::from_secs(i * 600), None);
        }
        assert!(counter.knock(start + Duration::from_secs(3000), None).open_admin);
    }

    #[test]
    fn test_window_restarts_slow_sequence() {
        let mut counter = KnockCounter::default();
        let start = Instant::now();
        let window = Some(Duration::from_millis(500));

        for i in 0..4 {
            counter.knock(start + Duration::from_millis(i * 100), window);
        }
        let late = counter.knock(start + Duration::from_secs(5), window);
        assert_eq!(late.count, 1);
        assert!(!late.open_admin);
    }

    #[tokio::test]
    async fn test_registry_counts_per_page() {
        let registry = KnockRegistry::new(None);

        for _ in 0..4 {
            registry.knock("page-a").await;
        }
        // A fresh page load starts from zero
        assert_eq!(registry.knock("page-b").await.count, 1);
        assert!(registry.knock("page-a").await.open_admin);
    }

    #[tokio::test]
    async fn test_registry_stays_bounded() {
        let registry = KnockRegistry::new(None);

        for i in 0..MAX_PAGES + 50 {
            registry.knock(&format!("page-{}", i)).await;
        }
        assert_eq!(registry.pages.lock().await.len(), MAX_PAGES);

        // The newest page load keeps its count
        let newest = format!("page-{}", MAX_PAGES + 49);
        assert_eq!(registry.knock(&newest).await.count, 2);

        // The first ones were evicted and start over
        assert_eq!(registry.knock("page-0").await.count, 1);
        assert!(registry.pages.lock().await.len() <= MAX_PAGES);
    }

    #[test]
    fn test_make_room_prefers_stale_pages() {
        let start = Instant::now();
        let now = start + FORGET_AFTER + Duration::from_secs(1);
        let mut pages = HashMap::new();

        for i in 0..MAX_PAGES {
            let mut counter = KnockCounter::default();
            let at = if i == 7 { start } else { now };
            counter.knock(at, None);
            pages.insert(format!("page-{}", i), counter);
        }

        make_room(&mut pages, now);
        assert_eq!(pages.len(), MAX_PAGES - 1);
        assert!(!pages.contains_key("page-7"));
    }
}
