use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::action::{Action, Move};
use crate::backend::{LookupError, LookupRequest};
use crate::config::{Config, SPINNER_FRAMES};
use crate::link;
use crate::metadata::PageMetadata;
use crate::types::{LookupResult, MenuSuggestions};
use crate::ui_state::{Focus, UIState};

/// Columns in the suggestions grid
pub const GRID_COLUMNS: usize = 2;

const COPIED_NOTICE: &str = "已复制到剪贴板";

/// A displayed result and the query that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub query: String,
    pub result: LookupResult,
    pub resolved_at: Option<DateTime<Local>>,
}

impl Entry {
    fn seed() -> Self {
        Self {
            query: String::new(),
            result: LookupResult::Suggestions(MenuSuggestions::seed()),
            resolved_at: None,
        }
    }
}

/// The shown result plus one level of undo.
#[derive(Debug, Clone)]
pub struct History {
    current: Entry,
    previous: Option<Entry>,
}

impl History {
    pub fn new(current: Entry) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    pub fn current(&self) -> &Entry {
        &self.current
    }

    #[cfg(test)]
    pub fn previous(&self) -> Option<&Entry> {
        self.previous.as_ref()
    }

    fn push(&mut self, entry: Entry) {
        let prior = std::mem::replace(&mut self.current, entry);
        self.previous = Some(prior);
    }

    /// Show the previous entry again. The slot is kept, so repeating this
    /// is a no-op.
    fn back(&mut self) -> bool {
        match &self.previous {
            Some(prev) => {
                self.current = prev.clone();
                true
            }
            None => false,
        }
    }
}

/// Work the event loop performs on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(LookupRequest),
    CopyToClipboard(String),
    PasteFromClipboard,
    Quit,
}

pub struct App {
    pub config: Config,
    pub ui: UIState,
    history: History,
    in_flight: Option<LookupRequest>,
    next_request_id: u64,
    error: Option<String>,
    metadata: PageMetadata,
    pub animation_frame: usize,
    pub animation_tick: u64,
}

impl App {
    pub fn new(config: Config) -> Self {
        let seed = Entry::seed();
        let metadata = PageMetadata::describe(&seed.query, &seed.result, &config.share_base_url);

        Self {
            config,
            ui: UIState::new(),
            history: History::new(seed),
            in_flight: None,
            next_request_id: 0,
            error: None,
            metadata,
            animation_frame: 0,
            animation_tick: 0,
        }
    }

    pub fn current(&self) -> &Entry {
        self.history.current()
    }

    #[cfg(test)]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<&LookupRequest> {
        self.in_flight.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    pub fn spinner(&self) -> &'static str {
        let step = self.animation_frame / self.config.spinner_ticks.max(1);
        SPINNER_FRAMES[step % SPINNER_FRAMES.len()]
    }

    /// Start a lookup for `query`.
    ///
    /// Returns `None` without touching any state when the query is blank or
    /// another lookup is still in flight.
    pub fn submit_query(&mut self, query: &str) -> Option<LookupRequest> {
        if query.trim().is_empty() {
            return None;
        }
        if let Some(pending) = &self.in_flight {
            debug!(pending = pending.id, "lookup already in flight, ignoring submit");
            return None;
        }

        self.next_request_id += 1;
        let request = LookupRequest {
            id: self.next_request_id,
            query: query.to_string(),
        };
        info!(id = request.id, query = %request.query, "lookup started");

        self.ui.input = request.query.clone();
        self.error = None;
        self.in_flight = Some(request.clone());
        Some(request)
    }

    pub fn submit_input(&mut self) -> Option<LookupRequest> {
        let query = self.ui.input.clone();
        self.submit_query(&query)
    }

    /// Open a deep link: the path segment is the query.
    pub fn open_link(&mut self, link: &str) -> Option<LookupRequest> {
        let query = link::query_from_link(link);
        if query.is_empty() {
            return None;
        }
        debug!(%link, %query, "opening deep link");
        self.submit_query(&query)
    }

    /// Settle the lookup `id`. Only the current in-flight request is
    /// accepted; anything else is stale and dropped. Returns whether the
    /// outcome was applied.
    pub fn resolve(&mut self, id: u64, outcome: Result<LookupResult, LookupError>) -> bool {
        let request = match self.in_flight.take() {
            Some(request) if request.id == id => request,
            other => {
                warn!(id, current = ?other.as_ref().map(|r| r.id), "dropping stale lookup result");
                self.in_flight = other;
                return false;
            }
        };

        match outcome {
            Ok(result) => {
                info!(id, query = %request.query, "lookup resolved");
                self.history.push(Entry {
                    query: request.query,
                    result,
                    resolved_at: Some(Local::now()),
                });
                self.on_current_changed();
            }
            Err(e) => {
                warn!(id, query = %request.query, error = %e, "lookup failed");
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn back(&mut self) -> bool {
        if self.history.back() {
            debug!(query = %self.current().query, "restored previous result");
            self.on_current_changed();
            true
        } else {
            self.ui.status_message = Some("没有可返回的结果".to_string());
            false
        }
    }

    fn on_current_changed(&mut self) {
        let current = self.history.current();
        self.metadata = PageMetadata::describe(
            &current.query,
            &current.result,
            &self.config.share_base_url,
        );
        self.error = None;
        self.ui.reset_view();
    }

    /// Link for the displayed result, falling back to the typed text.
    pub fn share_url(&self) -> Option<String> {
        let query = match self.current().query.as_str() {
            "" => self.ui.input.trim(),
            q => q,
        };
        if query.is_empty() {
            return None;
        }
        Some(link::share_url(&self.config.share_base_url, query))
    }

    pub fn notify(&mut self, message: &str) {
        self.ui.notice = Some(message.to_string());
    }

    /// Called once the share link is on the clipboard.
    pub fn share_copied(&mut self) {
        self.notify(COPIED_NOTICE);
    }

    pub fn selected_suggestion(&self) -> Option<&str> {
        self.current()
            .result
            .suggestion_items()
            .get(self.ui.selection)
            .map(String::as_str)
    }

    pub fn select_suggestion(&mut self) -> Option<LookupRequest> {
        let dish = self.selected_suggestion()?.to_string();
        self.submit_query(&dish)
    }

    pub fn move_selection(&mut self, dir: Move) {
        let count = self.current().result.suggestion_items().len();
        if count == 0 {
            return;
        }
        let sel = self.ui.selection.min(count - 1);

        self.ui.selection = match dir {
            Move::Left if sel % GRID_COLUMNS > 0 => sel - 1,
            Move::Right if sel % GRID_COLUMNS + 1 < GRID_COLUMNS && sel + 1 < count => sel + 1,
            Move::Up if sel >= GRID_COLUMNS => sel - GRID_COLUMNS,
            Move::Down if sel + GRID_COLUMNS < count => sel + GRID_COLUMNS,
            _ => sel,
        };
    }

    pub fn scroll_up(&mut self) {
        self.ui.scroll_offset = self.ui.scroll_offset.saturating_sub(self.config.scroll_step);
    }

    /// Scroll towards the end, stopping where the last row is in view.
    pub fn scroll_down(&mut self) {
        self.ui.scroll_offset = (self.ui.scroll_offset + self.config.scroll_step).min(self.ui.max_scroll);
    }

    pub fn insert_text(&mut self, text: &str) {
        // Single-line input
        let filtered: String = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.ui.input.push_str(&filtered);
        self.ui.focus = Focus::Input;
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Submit => return self.submit_input().map(Effect::Dispatch),
            Action::Activate => return self.select_suggestion().map(Effect::Dispatch),
            Action::Back => {
                self.back();
            }
            Action::Share => match self.share_url() {
                Some(url) => {
                    info!(%url, "sharing");
                    return Some(Effect::CopyToClipboard(url));
                }
                None => self.ui.status_message = Some("没有可分享的内容".to_string()),
            },
            Action::TogglePreview => self.ui.show_preview = !self.ui.show_preview,
            Action::ToggleFocus => {
                self.ui.focus = match self.ui.focus {
                    Focus::Input => Focus::Results,
                    Focus::Results => Focus::Input,
                };
            }
            Action::Insert(c) => {
                self.ui.input.push(c);
                self.ui.focus = Focus::Input;
            }
            Action::DeleteBack => {
                self.ui.input.pop();
            }
            Action::Paste(text) => self.insert_text(&text),
            Action::PasteClipboard => return Some(Effect::PasteFromClipboard),
            Action::Move(dir) => self.move_selection(dir),
            Action::ScrollUp => self.scroll_up(),
            Action::ScrollDown => self.scroll_down(),
            Action::DismissNotice => self.ui.notice = None,
            Action::Escape => {
                if self.ui.show_preview {
                    self.ui.show_preview = false;
                } else if self.ui.input.is_empty() {
                    return Some(Effect::Quit);
                } else {
                    self.ui.input.clear();
                }
            }
            Action::Quit => return Some(Effect::Quit),
        }
        None
    }

    pub fn tick(&mut self) {
        self.animation_tick += 1;
        self.animation_frame = (self.animation_frame + 1) % 360;

        // Clear status message after ~3 seconds
        if self.animation_tick % self.config.status_timeout_ticks.max(1) == 0 {
            self.ui.status_message = None;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, Recipe, RecipeStep};

    fn recipe(name: &str) -> LookupResult {
        LookupResult::Recipe(Recipe {
            name: name.to_string(),
            description: Some(format!("{}，家常做法", name)),
            ingredients: vec![Ingredient {
                name: "五花肉".to_string(),
                amount: "500克".to_string(),
            }],
            steps: vec![RecipeStep {
                title: "焯水".to_string(),
                description: "冷水下锅".to_string(),
                reason: "去腥".to_string(),
            }],
            tips: vec!["小火慢炖".to_string()],
            suggestions: Some(vec!["东坡肉".to_string(), "梅菜扣肉".to_string()]),
        })
    }

    fn suggestions(items: &[&str]) -> LookupResult {
        LookupResult::Suggestions(MenuSuggestions {
            recommend: items.iter().map(|s| s.to_string()).collect(),
            reason: "试试这些".to_string(),
        })
    }

    fn lookup(app: &mut App, query: &str, result: LookupResult) {
        let request = app.submit_query(query).expect("submit accepted");
        assert!(app.resolve(request.id, Ok(result)));
    }

    #[test]
    fn test_initial_state_shows_seed() {
        let app = App::default();
        assert!(!app.is_loading());
        assert!(app.error().is_none());
        assert_eq!(app.current().query, "");
        assert_eq!(app.current().result, LookupResult::Suggestions(MenuSuggestions::seed()));
        assert!(app.history().previous().is_none());
        assert_eq!(app.metadata().title, "智能食谱助手");
    }

    #[test]
    fn test_submit_starts_exactly_one_lookup() {
        let mut app = App::default();
        let request = app.submit_query("宫保鸡丁").unwrap();

        assert_eq!(request.query, "宫保鸡丁");
        assert!(app.is_loading());
        assert_eq!(app.in_flight(), Some(&request));
        assert_eq!(app.ui.input, "宫保鸡丁");
    }

    #[test]
    fn test_blank_query_changes_nothing() {
        let mut app = App::default();
        app.ui.input = "   ".to_string();

        assert!(app.submit_input().is_none());
        assert!(app.submit_query("").is_none());
        assert!(app.submit_query("\t\n").is_none());
        assert!(!app.is_loading());
        assert_eq!(app.ui.input, "   ");
        assert_eq!(app.current().query, "");
    }

    #[test]
    fn test_no_second_lookup_while_loading() {
        let mut app = App::default();
        let first = app.submit_query("宫保鸡丁").unwrap();

        assert!(app.submit_query("鱼香肉丝").is_none());
        assert_eq!(app.in_flight(), Some(&first));
        assert_eq!(app.ui.input, "宫保鸡丁");
    }

    #[test]
    fn test_recipe_resolution_replaces_result() {
        let mut app = App::default();
        lookup(&mut app, "红烧肉", recipe("红烧肉"));

        assert!(!app.is_loading());
        assert_eq!(app.current().query, "红烧肉");
        assert_eq!(app.current().result, recipe("红烧肉"));
        assert!(app.current().resolved_at.is_some());
        assert_eq!(app.metadata().title, "红烧肉 - 智能食谱助手");
        assert_eq!(
            app.metadata().canonical_url,
            "https://cook.aries-happy.com/%E7%BA%A2%E7%83%A7%E8%82%89"
        );
    }

    #[test]
    fn test_failure_clears_loading_and_sets_error() {
        let mut app = App::default();
        let request = app.submit_query("红烧肉").unwrap();
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();

        assert!(app.resolve(request.id, Err(LookupError::Parse(err))));
        assert!(!app.is_loading());
        assert!(app.error().unwrap().contains("无法解析"));
        // Result is untouched
        assert_eq!(app.current().query, "");

        // The next submit clears the error
        app.submit_query("红烧肉").unwrap();
        assert!(app.error().is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut app = App::default();
        let first = app.submit_query("宫保鸡丁").unwrap();
        assert!(app.resolve(first.id, Ok(recipe("宫保鸡丁"))));

        let second = app.submit_query("鱼香肉丝").unwrap();
        // A late duplicate of the first completion
        assert!(!app.resolve(first.id, Ok(recipe("错的"))));
        assert!(app.is_loading());
        assert_eq!(app.in_flight(), Some(&second));
        assert_eq!(app.current().query, "宫保鸡丁");

        assert!(app.resolve(second.id, Ok(recipe("鱼香肉丝"))));
        assert_eq!(app.current().query, "鱼香肉丝");
    }

    #[test]
    fn test_resolve_without_request_is_ignored() {
        let mut app = App::default();
        assert!(!app.resolve(1, Ok(recipe("红烧肉"))));
        assert_eq!(app.current().query, "");
    }

    #[test]
    fn test_deep_link_submits_decoded_query() {
        let mut app = App::default();
        let request = app.open_link("/%E5%AE%AB%E4%BF%9D%E9%B8%A1%E4%B8%81").unwrap();
        assert_eq!(request.query, "宫保鸡丁");
        assert_eq!(app.ui.input, "宫保鸡丁");

        let mut app = App::default();
        let request = app.open_link("/宫保鸡丁").unwrap();
        assert_eq!(request.query, "宫保鸡丁");
    }

    #[test]
    fn test_empty_deep_link_does_nothing() {
        let mut app = App::default();
        assert!(app.open_link("/").is_none());
        assert!(app.open_link("https://cook.aries-happy.com/").is_none());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_back_restores_previous_without_lookup() {
        let mut app = App::default();
        lookup(&mut app, "宫保鸡丁", recipe("宫保鸡丁"));
        lookup(&mut app, "鱼香肉丝", recipe("鱼香肉丝"));

        assert_eq!(app.handle_action(Action::Back), None);
        assert!(!app.is_loading());
        assert_eq!(app.current().query, "宫保鸡丁");
        assert_eq!(app.current().result, recipe("宫保鸡丁"));
        assert_eq!(app.metadata().title, "宫保鸡丁 - 智能食谱助手");

        // Single slot: backing again keeps the same result
        assert!(app.back());
        assert_eq!(app.current().query, "宫保鸡丁");
    }

    #[test]
    fn test_back_after_first_lookup_returns_to_seed() {
        let mut app = App::default();
        lookup(&mut app, "宫保鸡丁", recipe("宫保鸡丁"));

        assert!(app.back());
        assert_eq!(app.current().result, LookupResult::Suggestions(MenuSuggestions::seed()));
        assert_eq!(app.metadata().title, "智能食谱助手");
    }

    #[test]
    fn test_back_without_history() {
        let mut app = App::default();
        assert!(!app.back());
        assert!(app.ui.status_message.is_some());
    }

    #[test]
    fn test_failed_lookup_keeps_history() {
        let mut app = App::default();
        lookup(&mut app, "宫保鸡丁", recipe("宫保鸡丁"));

        let request = app.submit_query("鱼香肉丝").unwrap();
        app.resolve(request.id, Err(LookupError::EmptyQuery));

        assert!(app.back());
        assert_eq!(app.current().query, "");
    }

    #[test]
    fn test_share_copies_encoded_link() {
        let mut app = App::default();
        lookup(&mut app, "鱼香肉丝", recipe("鱼香肉丝"));

        assert_eq!(
            app.handle_action(Action::Share),
            Some(Effect::CopyToClipboard(
                "https://cook.aries-happy.com/%E9%B1%BC%E9%A6%99%E8%82%89%E4%B8%9D".to_string()
            ))
        );

        app.share_copied();
        assert_eq!(app.ui.notice.as_deref(), Some("已复制到剪贴板"));
        app.handle_action(Action::DismissNotice);
        assert!(app.ui.notice.is_none());
    }

    #[test]
    fn test_share_falls_back_to_input() {
        let mut app = App::default();
        assert_eq!(app.share_url(), None);
        assert_eq!(app.handle_action(Action::Share), None);

        app.ui.input = "鱼香肉丝".to_string();
        assert_eq!(
            app.share_url().as_deref(),
            Some("https://cook.aries-happy.com/%E9%B1%BC%E9%A6%99%E8%82%89%E4%B8%9D")
        );
    }

    #[test]
    fn test_activate_looks_up_selected_suggestion() {
        let mut app = App::default();
        app.ui.focus = Focus::Results;
        app.handle_action(Action::Move(Move::Right));

        match app.handle_action(Action::Activate) {
            Some(Effect::Dispatch(request)) => assert_eq!(request.query, "鱼香肉丝"),
            other => panic!("expected dispatch, got {:?}", other),
        }
        assert_eq!(app.ui.input, "鱼香肉丝");
    }

    #[test]
    fn test_related_suggestions_are_selectable() {
        let mut app = App::default();
        lookup(&mut app, "红烧肉", recipe("红烧肉"));

        app.move_selection(Move::Right);
        assert_eq!(app.selected_suggestion(), Some("梅菜扣肉"));
    }

    #[test]
    fn test_grid_navigation() {
        let mut app = App::default();
        lookup(&mut app, "x", suggestions(&["a", "b", "c", "d", "e"]));
        assert_eq!(app.ui.selection, 0);

        app.move_selection(Move::Left);
        assert_eq!(app.ui.selection, 0);
        app.move_selection(Move::Down);
        assert_eq!(app.ui.selection, 2);
        app.move_selection(Move::Right);
        assert_eq!(app.ui.selection, 3);
        app.move_selection(Move::Right);
        assert_eq!(app.ui.selection, 3);
        app.move_selection(Move::Down);
        assert_eq!(app.ui.selection, 3);
        app.move_selection(Move::Left);
        app.move_selection(Move::Down);
        assert_eq!(app.selected_suggestion(), Some("e"));
        app.move_selection(Move::Right);
        assert_eq!(app.ui.selection, 4);
        app.move_selection(Move::Up);
        assert_eq!(app.ui.selection, 2);
    }

    #[test]
    fn test_new_result_resets_selection_and_scroll() {
        let mut app = App::default();
        app.move_selection(Move::Down);
        app.ui.max_scroll = 10;
        app.scroll_down();
        assert_eq!(app.ui.scroll_offset, 3);
        lookup(&mut app, "x", suggestions(&["a"]));

        assert_eq!(app.ui.selection, 0);
        assert_eq!(app.ui.scroll_offset, 0);
    }

    #[test]
    fn test_scroll_stops_at_last_row() {
        let mut app = App::default();
        app.ui.max_scroll = 7;

        for _ in 0..50 {
            app.scroll_down();
        }
        assert_eq!(app.ui.scroll_offset, 7);

        app.scroll_up();
        assert_eq!(app.ui.scroll_offset, 4);
    }

    #[test]
    fn test_back_clears_error_line() {
        let mut app = App::default();
        lookup(&mut app, "红烧肉", recipe("红烧肉"));
        lookup(&mut app, "东坡肉", recipe("东坡肉"));

        let request = app.submit_query("梅菜扣肉").unwrap();
        let err = LookupError::Parse(serde_json::from_str::<serde_json::Value>("<").unwrap_err());
        app.resolve(request.id, Err(err));
        assert!(app.error().is_some());

        assert!(app.back());
        assert_eq!(app.current().query, "红烧肉");
        assert!(app.error().is_none());
    }

    #[test]
    fn test_escape_clears_then_quits() {
        let mut app = App::default();
        app.ui.input = "辣".to_string();

        assert_eq!(app.handle_action(Action::Escape), None);
        assert!(app.ui.input.is_empty());
        assert_eq!(app.handle_action(Action::Escape), Some(Effect::Quit));
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut app = App::default();
        app.ui.focus = Focus::Results;
        app.handle_action(Action::Paste("想吃\r\n辣的".to_string()));

        assert_eq!(app.ui.input, "想吃 辣的");
        assert_eq!(app.ui.focus, Focus::Input);
    }

    #[test]
    fn test_submit_action_dispatches_input() {
        let mut app = App::default();
        for c in "宫保鸡丁".chars() {
            app.handle_action(Action::Insert(c));
        }

        match app.handle_action(Action::Submit) {
            Some(Effect::Dispatch(request)) => assert_eq!(request.query, "宫保鸡丁"),
            other => panic!("expected dispatch, got {:?}", other),
        }
        assert_eq!(app.handle_action(Action::Submit), None);
    }
}
