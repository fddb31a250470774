//! Query controller
//!
//! Turns input, focus, keyboard and pointer events into query state. Typed
//! text is debounced before it is searched, and every newly published index
//! snapshot re-runs the current query so results improve while shards load.
//! All state lives in one task: [`QueryController::run`] multiplexes UI
//! events, debounce completions and index updates.

use std::sync::{Arc, Mutex};

use ookstats_search::PlayerMatch;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::render::{render, ResultsView};
use crate::service::{IndexUpdate, LoadStatus, PlayerSearchService};

/// What the results panel is doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Hidden
    #[default]
    Idle,
    Loading,
    Showing,
    NoResults,
}

/// How the current selection was made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionSource {
    #[default]
    Keyboard,
    Pointer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Current contents of the search input
    pub input: String,

    pub matches: Vec<PlayerMatch>,

    /// Selected row, -1 for none
    pub selected: isize,

    pub selection_source: SelectionSource,
    pub phase: SearchPhase,
    pub clear_visible: bool,
    pub focused: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            input: String::new(),
            matches: Vec::new(),
            selected: -1,
            selection_source: SelectionSource::Keyboard,
            phase: SearchPhase::Idle,
            clear_visible: false,
            focused: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Tab,
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Whether a command modifier is held (shift does not count)
    pub fn any_command(&self) -> bool {
        self.ctrl || self.meta || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Element holding focus when a page-level key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveElement {
    /// Any single-line input, the search box included
    Input,
    TextArea,
    Other,
}

impl ActiveElement {
    fn accepts_text(&self) -> bool {
        matches!(self, ActiveElement::Input | ActiveElement::TextArea)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search input gained focus
    Focus,

    /// The search input now holds this text
    Input(String),

    /// A key pressed inside the search input
    Key(KeyPress),

    /// A key pressed anywhere on the page
    GlobalKey { key: KeyPress, active: ActiveElement },

    /// A click landed outside the search widget
    ClickOutside,

    ClearClicked,

    /// Pointer entered result row `n`
    Hover(usize),

    /// Result row `n` was clicked
    Click(usize),
}

/// Receives profile navigations
pub trait Navigator: Send {
    fn navigate(&self, path: &str);
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to so far, oldest first
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        let mut paths = self.paths.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        paths.push(path.to_string());
    }
}

/// Drives the search widget state
pub struct QueryController {
    service: Arc<PlayerSearchService>,
    navigator: Box<dyn Navigator>,
    debouncer: Debouncer,
    state: QueryState,

    /// Fires once per settled burst of input
    queries_tx: mpsc::UnboundedSender<()>,
    queries_rx: mpsc::UnboundedReceiver<()>,

    updates: watch::Receiver<IndexUpdate>,
    views: watch::Sender<ResultsView>,
}

impl QueryController {
    pub fn new(
        service: Arc<PlayerSearchService>,
        navigator: Box<dyn Navigator>,
        config: &SearchConfig,
    ) -> Self {
        let (queries_tx, queries_rx) = mpsc::unbounded_channel();
        let (views, _) = watch::channel(ResultsView::default());
        let updates = service.subscribe();

        Self {
            service,
            navigator,
            debouncer: Debouncer::new(config.debounce),
            state: QueryState::default(),
            queries_tx,
            queries_rx,
            updates,
            views,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Rendered panel for the current state
    pub fn view(&self) -> ResultsView {
        render(&self.state)
    }

    /// Receive a fresh view after every handled event
    pub fn subscribe_views(&self) -> watch::Receiver<ResultsView> {
        self.views.subscribe()
    }

    /// Process events until the sender side closes, then return the final state
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> QueryState {
        let mut index_open = true;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                },
                Some(()) = self.queries_rx.recv() => {
                    self.on_debounce_fired();
                }
                changed = self.updates.changed(), if index_open => {
                    if changed.is_ok() {
                        self.on_index_update();
                    } else {
                        index_open = false;
                    }
                }
            }
            self.views.send_replace(render(&self.state));
        }

        self.debouncer.cancel();
        self.state
    }

    /// Apply one UI event; returns whether its default action is suppressed
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Focus => {
                self.state.focused = true;
                self.service.ensure_loaded();
                if !self.state.input.is_empty() {
                    let input = self.state.input.clone();
                    self.run_query(&input);
                }
                false
            }
            UiEvent::Input(text) => {
                self.service.ensure_loaded();
                self.state.clear_visible = !text.is_empty();
                self.state.input = text;
                let queries = self.queries_tx.clone();
                self.debouncer.call(move || {
                    let _ = queries.send(());
                });
                false
            }
            UiEvent::Key(press) => self.handle_key(press),
            UiEvent::GlobalKey { key, active } => self.handle_global_key(key, active),
            UiEvent::ClickOutside => {
                self.hide();
                false
            }
            UiEvent::ClearClicked => {
                self.debouncer.cancel();
                self.state.input.clear();
                self.state.clear_visible = false;
                self.state.focused = true;
                self.service.ensure_loaded();
                self.hide();
                false
            }
            UiEvent::Hover(idx) => {
                if idx < self.state.matches.len() {
                    self.state.selected = idx as isize;
                    self.state.selection_source = SelectionSource::Pointer;
                }
                false
            }
            UiEvent::Click(idx) => {
                self.activate(idx);
                false
            }
        }
    }

    /// Search `text` against the latest snapshot and update the panel
    pub fn run_query(&mut self, text: &str) {
        if text.is_empty() {
            self.state.matches.clear();
            self.hide();
            return;
        }

        let update = self.updates.borrow().clone();
        let Some(snapshot) = update.snapshot else {
            self.state.matches.clear();
            self.state.selected = -1;
            self.state.phase = if update.status == LoadStatus::Failed {
                SearchPhase::NoResults
            } else {
                SearchPhase::Loading
            };
            return;
        };

        self.state.matches = snapshot.search(text);
        debug!("Query {:?}: {} matches", text, self.state.matches.len());

        if self.state.matches.is_empty() {
            self.state.selected = -1;
            self.state.phase = SearchPhase::NoResults;
        } else {
            self.state.selected = 0;
            self.state.selection_source = SelectionSource::Keyboard;
            self.state.phase = SearchPhase::Showing;
        }
    }

    /// Query whatever the input holds now, not what it held when typed
    fn on_debounce_fired(&mut self) {
        let input = self.state.input.clone();
        self.run_query(&input);
    }

    fn on_index_update(&mut self) {
        if !self.state.input.is_empty() {
            let input = self.state.input.clone();
            self.run_query(&input);
        }
    }

    fn handle_key(&mut self, press: KeyPress) -> bool {
        if self.state.phase == SearchPhase::Idle {
            return false;
        }

        let len = self.state.matches.len() as isize;
        match press.key {
            Key::ArrowDown => {
                if len > 0 {
                    self.select((self.state.selected + 1).min(len - 1));
                }
                true
            }
            Key::ArrowUp => {
                if len > 0 {
                    self.select((self.state.selected - 1).max(0));
                }
                true
            }
            Key::Tab => {
                if len > 0 {
                    let selected = self.state.selected;
                    let next = if press.modifiers.shift {
                        if selected <= 0 {
                            len - 1
                        } else {
                            selected - 1
                        }
                    } else if selected >= len - 1 {
                        0
                    } else {
                        selected + 1
                    };
                    self.select(next);
                }
                true
            }
            Key::Enter => {
                let idx = usize::try_from(self.state.selected)
                    .ok()
                    .filter(|idx| *idx < self.state.matches.len())
                    .unwrap_or(0);
                self.activate(idx);
                true
            }
            Key::Escape => {
                self.hide();
                false
            }
            Key::Char(_) => false,
        }
    }

    fn handle_global_key(&mut self, press: KeyPress, active: ActiveElement) -> bool {
        if press.key != Key::Char('/') || press.modifiers.any_command() || active.accepts_text() {
            return false;
        }

        self.debouncer.cancel();
        self.state.focused = true;
        self.state.input.clear();
        self.state.clear_visible = false;
        self.state.matches.clear();
        self.state.selected = -1;
        self.state.phase = SearchPhase::Showing;
        self.service.ensure_loaded();
        true
    }

    fn select(&mut self, idx: isize) {
        self.state.selected = idx;
        self.state.selection_source = SelectionSource::Keyboard;
    }

    fn activate(&mut self, idx: usize) {
        if let Some(hit) = self.state.matches.get(idx) {
            let path = hit.record.profile_path();
            debug!("Navigating to {}", path);
            self.navigator.navigate(&path);
        }
    }

    fn hide(&mut self) {
        self.state.phase = SearchPhase::Idle;
        self.state.selected = -1;
    }
}
