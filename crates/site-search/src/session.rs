/// Query session controller: sits between raw keystrokes and the search
/// index, and between the flattened result list and keyboard selection.
///
/// Time is passed in explicitly (`now`) so the controller can be driven by
/// any event loop. Nothing here spawns or sleeps.
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::{GroupedResults, SearchItem};
use crate::search::SearchIndex;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Last-write-wins deferred value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// Take the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    None,
    /// Navigate to this href; the router's route change will close the session.
    Navigate(String),
    Closed,
}

pub struct SearchSession {
    index: Arc<SearchIndex>,
    open: bool,
    query: String,
    active_index: usize,
    results: GroupedResults,
    debouncer: Debouncer<String>,
}

impl SearchSession {
    pub fn new(index: Arc<SearchIndex>) -> Self {
        Self::with_debounce(index, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(index: Arc<SearchIndex>, delay: Duration) -> Self {
        Self {
            index,
            open: false,
            query: String::new(),
            active_index: 0,
            results: GroupedResults::default(),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn open(&mut self) {
        if !self.open {
            self.clear();
            self.open = true;
            debug!("search session opened");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &GroupedResults {
        &self.results
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&Arc<SearchItem>> {
        self.results.get(self.active_index)
    }

    pub fn flattened(&self) -> Vec<Arc<SearchItem>> {
        self.results.flatten()
    }

    /// Record the new query text; results follow after the quiet period.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        if !self.open {
            return;
        }
        self.query = query.into();
        self.debouncer.schedule(self.query.clone(), now);
    }

    /// Apply a due recomputation. Returns true when results were refreshed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.open {
            return false;
        }
        let Some(query) = self.debouncer.poll(now) else {
            return false;
        };
        self.results = self.index.search(&query);
        self.active_index = 0;
        debug!(query = %query, results = self.results.len(), "search session refreshed");
        true
    }

    pub fn time_until_refresh(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_ready(now)
    }

    pub fn handle_key(&mut self, key: SessionKey) -> SessionAction {
        if !self.open {
            return SessionAction::None;
        }
        let len = self.results.len();
        match key {
            SessionKey::ArrowDown => {
                if len > 0 {
                    self.active_index = (self.active_index + 1).min(len - 1);
                }
                SessionAction::None
            }
            SessionKey::ArrowUp => {
                self.active_index = self.active_index.saturating_sub(1);
                SessionAction::None
            }
            SessionKey::Enter => match self.active_item() {
                Some(item) => {
                    debug!(href = %item.href, "search session navigating");
                    SessionAction::Navigate(item.href.clone())
                }
                None => SessionAction::None,
            },
            SessionKey::Escape => {
                self.close();
                SessionAction::Closed
            }
        }
    }

    /// Pointer hover selects a result directly.
    pub fn hover(&mut self, index: usize) {
        let len = self.results.len();
        if self.open && len > 0 {
            self.active_index = index.min(len - 1);
        }
    }

    /// External route change: the session never outlives a navigation.
    pub fn on_route_change(&mut self) {
        if self.open {
            self.close();
        }
    }

    /// Discard the query, results, selection and any pending recomputation.
    pub fn close(&mut self) {
        self.clear();
        self.open = false;
        debug!("search session closed");
    }

    fn clear(&mut self) {
        self.debouncer.cancel();
        self.query.clear();
        self.results = GroupedResults::default();
        self.active_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use crate::registry;

    fn index() -> Arc<SearchIndex> {
        Arc::new(SearchIndex::new(registry::builtin_items()))
    }

    fn open_session() -> SearchSession {
        let mut session = SearchSession::new(index());
        session.open();
        session
    }

    fn settle(session: &mut SearchSession, query: &str, now: Instant) -> Instant {
        session.input(query, now);
        let later = now + DEFAULT_DEBOUNCE;
        assert!(session.tick(later));
        later
    }

    #[test]
    fn debouncer_keeps_only_latest_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();

        debouncer.schedule("re", t0);
        debouncer.schedule("rea", t0 + Duration::from_millis(60));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(120)), None);
        assert_eq!(
            debouncer.time_until_ready(t0 + Duration::from_millis(120)),
            Some(Duration::from_millis(40))
        );
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(160)), Some("rea"));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(500)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn debouncer_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        debouncer.schedule(1, t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(debouncer.time_until_ready(t0), None);
    }

    #[test]
    fn results_wait_for_quiet_period() {
        let mut session = open_session();
        let t0 = Instant::now();

        session.input("rea", t0);
        session.input("react", t0 + Duration::from_millis(100));
        assert!(!session.tick(t0 + Duration::from_millis(200)));
        assert!(session.results().is_empty());

        assert!(session.tick(t0 + Duration::from_millis(250)));
        assert_eq!(session.query(), "react");
        assert!(!session.results().is_empty());
        assert!(!session.tick(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn arrow_keys_clamp_to_result_list() {
        let mut session = open_session();
        settle(&mut session, "react", Instant::now());
        let len = session.results().len();
        assert!(len > 1);

        for _ in 0..len + 10 {
            assert_eq!(session.handle_key(SessionKey::ArrowDown), SessionAction::None);
        }
        assert_eq!(session.active_index(), len - 1);

        for _ in 0..len + 10 {
            session.handle_key(SessionKey::ArrowUp);
        }
        assert_eq!(session.active_index(), 0);
    }

    #[test]
    fn selection_follows_flattened_order() {
        let mut session = open_session();
        settle(&mut session, "react", Instant::now());

        let flattened = session.flattened();
        for (index, expected) in flattened.iter().enumerate() {
            assert!(Arc::ptr_eq(session.active_item().unwrap(), expected), "index {index}");
            session.handle_key(SessionKey::ArrowDown);
        }

        let guides = session.results().guides.len();
        assert!(flattened[..guides].iter().all(|i| i.kind == ItemKind::Guide));
    }

    #[test]
    fn enter_navigates_to_active_item() {
        let mut session = open_session();
        settle(&mut session, "tdd   front", Instant::now());

        let target = session.flattened()[1].href.clone();
        session.handle_key(SessionKey::ArrowDown);
        assert_eq!(
            session.handle_key(SessionKey::Enter),
            SessionAction::Navigate(target)
        );
        assert!(session.is_open());

        session.on_route_change();
        assert!(!session.is_open());
    }

    #[test]
    fn keys_on_empty_results_are_inert() {
        let mut session = open_session();
        settle(&mut session, "zzzz", Instant::now());
        assert!(session.results().is_empty());

        assert_eq!(session.handle_key(SessionKey::ArrowDown), SessionAction::None);
        assert_eq!(session.handle_key(SessionKey::ArrowUp), SessionAction::None);
        assert_eq!(session.handle_key(SessionKey::Enter), SessionAction::None);
        assert_eq!(session.active_index(), 0);
        session.hover(3);
        assert_eq!(session.active_index(), 0);
    }

    #[test]
    fn new_results_reset_selection() {
        let mut session = open_session();
        let now = settle(&mut session, "react", Instant::now());
        session.handle_key(SessionKey::ArrowDown);
        session.handle_key(SessionKey::ArrowDown);
        assert_eq!(session.active_index(), 2);

        settle(&mut session, "hexagonale", now);
        assert_eq!(session.active_index(), 0);
    }

    #[test]
    fn escape_discards_everything() {
        let mut session = open_session();
        let t0 = Instant::now();
        let now = settle(&mut session, "react", t0);
        session.handle_key(SessionKey::ArrowDown);
        session.input("react hooks", now);

        assert_eq!(session.handle_key(SessionKey::Escape), SessionAction::Closed);
        assert!(!session.is_open());
        assert_eq!(session.query(), "");
        assert!(session.results().is_empty());
        assert_eq!(session.active_index(), 0);
        assert_eq!(session.time_until_refresh(now), None);

        // The cancelled recomputation never lands, even after reopening.
        session.open();
        assert!(!session.tick(now + Duration::from_secs(1)));
        assert!(session.results().is_empty());
        assert_eq!(session.query(), "");
    }

    #[test]
    fn closed_session_ignores_input() {
        let mut session = SearchSession::new(index());
        let t0 = Instant::now();
        session.input("react", t0);
        assert!(!session.tick(t0 + Duration::from_secs(1)));
        assert_eq!(session.handle_key(SessionKey::Enter), SessionAction::None);
        assert_eq!(session.query(), "");
    }

    #[test]
    fn hover_clamps_selection() {
        let mut session = open_session();
        settle(&mut session, "react", Instant::now());
        let len = session.results().len();
        session.hover(1);
        assert_eq!(session.active_index(), 1);
        session.hover(usize::MAX);
        assert_eq!(session.active_index(), len - 1);
    }
}
