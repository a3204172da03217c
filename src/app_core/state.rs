//! Screen state and the transitions that mutate it.
//!
//! Nothing here performs I/O. Network work is requested through
//! `pending_action` and its outcome is fed back through `finish_load` /
//! `finish_create` by the runtime.

use crate::api::ApiError;
use crate::app_core::favorites::Favorites;
use crate::app_core::form::{CreateForm, FormField, VALIDATION_MESSAGE};
use crate::app_core::text_input::TextInput;
use crate::fit::FitMode;
use crate::matcher;
use crate::model::{self, BackendProduct, DisplayProduct, NewProduct};
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

pub const LOAD_ERROR_MESSAGE: &str =
    "Could not fetch products. Check the base URL, host, port and firewall.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    List,
    Filter,
}

/// Work the runtime must perform on behalf of the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    LoadProducts,
    CreateProduct(NewProduct),
}

/// Screen regions recorded during render, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct ScreenAreas {
    pub list: Option<Rect>,
    /// List rows, inside the borders.
    pub list_content: Option<Rect>,
    pub filter: Option<Rect>,
    pub filter_input: Option<Rect>,
    pub new_button: Option<Rect>,
    pub detail: Option<Rect>,
    pub detail_modes: Vec<(FitMode, Rect)>,
    pub detail_close: Option<Rect>,
    pub detail_favorite: Option<Rect>,
    pub form: Option<Rect>,
    pub form_fields: Vec<(FormField, Rect)>,
    pub form_save: Option<Rect>,
    pub form_cancel: Option<Rect>,
}

/// Application state for the gallery screen.
pub struct AppState {
    pub theme: ThemeConfig,
    /// Where products come from, shown in the status bar
    pub source_label: String,
    pub app_version: String,
    /// Records as received from the backend, newest creations first
    pub products: Vec<BackendProduct>,
    /// `products` adapted for display; rebuilt whenever `products` changes
    pub display: Vec<DisplayProduct>,
    /// Indices into `display` that match the current query
    pub filtered_indices: Vec<usize>,
    /// List cursor managed by ratatui
    pub list_state: ListState,
    pub query: TextInput,
    pub focused_pane: FocusPane,
    pub favorites: Favorites,
    /// Id of the product shown in the detail modal
    pub selected: Option<String>,
    pub fit_mode: FitMode,
    pub loading: bool,
    pub load_error: Option<String>,
    load_started: bool,
    /// Open "new product" modal, if any
    pub create_form: Option<CreateForm>,
    /// One-line feedback in the status bar
    pub notice: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    pub pending_action: Option<AppAction>,
    pub areas: ScreenAreas,
}

impl AppState {
    pub fn new(theme: ThemeConfig, source_label: String, app_version: String) -> Self {
        Self {
            theme,
            source_label,
            app_version,
            products: Vec::new(),
            display: Vec::new(),
            filtered_indices: Vec::new(),
            list_state: ListState::default(),
            query: TextInput::default(),
            focused_pane: FocusPane::List,
            favorites: Favorites::default(),
            selected: None,
            fit_mode: FitMode::default(),
            loading: false,
            load_error: None,
            load_started: false,
            create_form: None,
            notice: None,
            show_help: false,
            should_quit: false,
            pending_action: None,
            areas: ScreenAreas::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Requests the list load that runs when the screen first appears.
    /// Only the first call has any effect.
    pub fn begin_initial_load(&mut self) {
        if self.load_started {
            return;
        }
        self.load_started = true;
        self.start_load();
    }

    /// Manual retry of the list load. Ignored while a load is in flight.
    pub fn request_reload(&mut self) {
        if self.loading {
            return;
        }
        self.load_started = true;
        self.start_load();
    }

    fn start_load(&mut self) {
        self.loading = true;
        self.load_error = None;
        self.pending_action = Some(AppAction::LoadProducts);
    }

    pub fn finish_load(&mut self, result: Result<Vec<BackendProduct>, ApiError>) {
        self.loading = false;
        match result {
            Ok(products) => {
                log::info!("Loaded {} products", products.len());
                self.load_error = None;
                self.replace_products(products);
            }
            Err(err) => {
                log::error!("Loading products failed: {}", err);
                self.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Replaces the backend list and rebuilds everything derived from it.
    pub fn replace_products(&mut self, products: Vec<BackendProduct>) {
        self.products = products;
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        self.display = model::adapt_all(&self.products);
        // Drop a selection whose product no longer exists.
        if self.selected.is_some() && self.selected_product().is_none() {
            self.selected = None;
        }
        self.update_filter();
    }

    // ---------------------------------------------------------------------
    // Filtering and list cursor
    // ---------------------------------------------------------------------

    pub fn update_filter(&mut self) {
        self.filtered_indices = matcher::matching_indices(&self.display, self.query.text());
        if self.filtered_indices.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = TextInput::with_text(text);
        self.update_filter();
    }

    /// Applies an edit to the query input, then re-filters.
    pub fn edit_query(&mut self, edit: impl FnOnce(&mut TextInput)) {
        let before = self.query.text().to_string();
        edit(&mut self.query);
        if self.query.text() != before {
            self.update_filter();
        }
    }

    /// The products currently visible in the list, in display order.
    pub fn visible_products(&self) -> impl Iterator<Item = &DisplayProduct> {
        self.filtered_indices.iter().map(|&idx| &self.display[idx])
    }

    pub fn cursor_product(&self) -> Option<&DisplayProduct> {
        self.list_state
            .selected()
            .and_then(|sel| self.filtered_indices.get(sel))
            .and_then(|&idx| self.display.get(idx))
    }

    /// Moves the cursor by `delta` rows, stopping at either end.
    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.filtered_indices.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let target = (current + delta as i64).clamp(0, len as i64 - 1);
        self.list_state.select(Some(target as usize));
    }

    pub fn cursor_to_start(&mut self) {
        let len = self.filtered_indices.len();
        self.list_state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn cursor_to_end(&mut self) {
        let len = self.filtered_indices.len();
        self.list_state
            .select(if len == 0 { None } else { Some(len - 1) });
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
    }

    // ---------------------------------------------------------------------
    // Selection, favorites, fit mode
    // ---------------------------------------------------------------------

    /// Opens the detail modal for `id`. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) {
        if self.display.iter().any(|p| p.id == id) {
            self.selected = Some(id.to_string());
        }
    }

    pub fn select_at_cursor(&mut self) {
        if let Some(id) = self.cursor_product().map(|p| p.id.clone()) {
            self.select(&id);
        }
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected_product(&self) -> Option<&DisplayProduct> {
        let id = self.selected.as_deref()?;
        self.display.iter().find(|p| p.id == id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Returns the new membership of `id`.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        self.favorites.toggle(id)
    }

    pub fn toggle_favorite_at_cursor(&mut self) {
        if let Some(id) = self.cursor_product().map(|p| p.id.clone()) {
            self.toggle_favorite(&id);
        }
    }

    pub fn toggle_selected_favorite(&mut self) {
        if let Some(id) = self.selected.clone() {
            self.toggle_favorite(&id);
        }
    }

    pub fn set_fit_mode(&mut self, mode: FitMode) {
        self.fit_mode = mode;
    }

    // ---------------------------------------------------------------------
    // Creation flow
    // ---------------------------------------------------------------------

    pub fn open_create_form(&mut self) {
        if self.create_form.is_none() {
            self.create_form = Some(CreateForm::default());
        }
    }

    /// Discards the draft. Ignored while a create request is in flight.
    pub fn cancel_create_form(&mut self) {
        if self.create_form.as_ref().is_some_and(|form| form.saving) {
            return;
        }
        self.create_form = None;
    }

    pub fn is_saving(&self) -> bool {
        self.create_form.as_ref().is_some_and(|form| form.saving)
    }

    /// Validates the draft and, if it is complete, queues the create request.
    pub fn submit_create_form(&mut self) {
        let Some(form) = self.create_form.as_mut() else {
            return;
        };
        if form.saving {
            return;
        }
        match form.draft.validate() {
            Ok(product) => {
                form.saving = true;
                form.error = None;
                self.pending_action = Some(AppAction::CreateProduct(product));
            }
            Err(err) => {
                log::debug!("Rejected product draft: {}", err);
                form.error = Some(format!("{} ({})", VALIDATION_MESSAGE, err));
            }
        }
    }

    pub fn finish_create(&mut self, result: Result<BackendProduct, ApiError>) {
        match result {
            Ok(created) => {
                log::info!("Created product {} ({})", created.id, created.title);
                self.notice = Some(format!("Created \"{}\"", created.title));
                self.products.insert(0, created);
                self.refresh_display();
                self.create_form = None;
            }
            Err(err) => {
                log::warn!("Creating product failed: {}", err);
                if let Some(form) = self.create_form.as_mut() {
                    form.saving = false;
                    form.error = Some(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use reqwest::StatusCode;

    fn product(id: &str, title: &str) -> BackendProduct {
        BackendProduct {
            id: id.to_string(),
            title: title.to_string(),
            price: 1000.0,
            description: format!("{} description", title),
            image_url: format!("https://img/{}.jpg", id),
        }
    }

    fn make_test_app(products: Vec<BackendProduct>) -> AppState {
        let mut app = AppState::new(
            Theme::Dracula.config(),
            "test".to_string(),
            "v0".to_string(),
        );
        app.begin_initial_load();
        app.pending_action = None;
        app.finish_load(Ok(products));
        app
    }

    fn status_error(method: &'static str) -> ApiError {
        ApiError::Status {
            method,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn fill_form(app: &mut AppState, title: &str, price: &str, description: &str, url: &str) {
        let form = app.create_form.as_mut().unwrap();
        form.draft.title = TextInput::with_text(title);
        form.draft.price = TextInput::with_text(price);
        form.draft.description = TextInput::with_text(description);
        form.draft.image_url = TextInput::with_text(url);
    }

    #[test]
    fn test_initial_load_requested_once() {
        let mut app = AppState::new(Theme::Dracula.config(), "t".into(), "v0".into());
        app.begin_initial_load();
        assert!(app.loading);
        assert_eq!(app.pending_action.take(), Some(AppAction::LoadProducts));

        app.begin_initial_load();
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_load_failure_sets_message_and_clears_loading() {
        let mut app = AppState::new(Theme::Dracula.config(), "t".into(), "v0".into());
        app.begin_initial_load();
        app.finish_load(Err(status_error("GET")));
        assert!(!app.loading);
        assert_eq!(app.load_error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert!(app.products.is_empty());
        assert_eq!(app.visible_products().count(), 0);
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_reload_ignored_while_loading() {
        let mut app = AppState::new(Theme::Dracula.config(), "t".into(), "v0".into());
        app.begin_initial_load();
        app.pending_action = None;
        app.request_reload();
        assert!(app.pending_action.is_none());

        app.finish_load(Err(status_error("GET")));
        app.request_reload();
        assert_eq!(app.pending_action, Some(AppAction::LoadProducts));
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_query_filters_display_list() {
        let mut app = make_test_app(vec![
            product("1", "Zapatillas Runner"),
            product("2", "Auriculares BT"),
        ]);
        app.set_query("zapa");
        let ids: Vec<&str> = app.visible_products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        app.set_query("xyz");
        assert_eq!(app.visible_products().count(), 0);
        assert_eq!(app.list_state.selected(), None);

        app.set_query("");
        assert_eq!(app.visible_products().count(), 2);
    }

    #[test]
    fn test_cursor_moves_within_bounds() {
        let mut app = make_test_app(vec![product("1", "a"), product("2", "b"), product("3", "c")]);
        assert_eq!(app.list_state.selected(), Some(0));
        app.move_cursor(-1);
        assert_eq!(app.list_state.selected(), Some(0));
        app.move_cursor(10);
        assert_eq!(app.list_state.selected(), Some(2));
        assert_eq!(app.cursor_product().unwrap().id, "3");
    }

    #[test]
    fn test_select_and_close_detail() {
        let mut app = make_test_app(vec![product("1", "a"), product("2", "b")]);
        app.move_cursor(1);
        app.select_at_cursor();
        assert_eq!(app.selected_product().unwrap().id, "2");

        app.select("missing");
        assert_eq!(app.selected.as_deref(), Some("2"));

        app.close_detail();
        assert!(app.selected_product().is_none());
    }

    #[test]
    fn test_favorite_toggles_from_list_and_detail() {
        let mut app = make_test_app(vec![product("1", "a")]);
        app.toggle_favorite_at_cursor();
        assert!(app.is_favorite("1"));

        app.select("1");
        app.toggle_selected_favorite();
        assert!(!app.is_favorite("1"));
    }

    #[test]
    fn test_invalid_draft_sets_error_without_action() {
        let mut app = make_test_app(vec![]);
        app.open_create_form();
        fill_form(&mut app, "", "9999", "d", "https://x/y.jpg");
        app.submit_create_form();
        let form = app.create_form.as_ref().unwrap();
        assert!(form.error.as_deref().unwrap().starts_with(VALIDATION_MESSAGE));
        assert!(!form.saving);
        assert!(app.pending_action.is_none());

        fill_form(&mut app, "Gorra", "abc", "d", "https://x/y.jpg");
        app.submit_create_form();
        assert!(app.create_form.as_ref().unwrap().error.is_some());
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_valid_draft_queues_create_and_blocks_resubmit() {
        let mut app = make_test_app(vec![]);
        app.open_create_form();
        fill_form(&mut app, "Gorra", "9999", "d", "https://x/y.jpg");
        app.submit_create_form();
        assert!(app.is_saving());
        let expected = AppAction::CreateProduct(NewProduct {
            title: "Gorra".to_string(),
            price: 9999.0,
            description: "d".to_string(),
            image_url: "https://x/y.jpg".to_string(),
        });
        assert_eq!(app.pending_action.take(), Some(expected));

        app.submit_create_form();
        assert!(app.pending_action.is_none());

        app.cancel_create_form();
        assert!(app.create_form.is_some());
    }

    #[test]
    fn test_create_success_prepends_and_closes() {
        let mut app = make_test_app(vec![product("1", "Zapatillas Runner")]);
        app.open_create_form();
        fill_form(&mut app, "Gorra", "9999", "d", "https://x/y.jpg");
        app.submit_create_form();
        app.pending_action = None;

        app.finish_create(Ok(product("9", "Gorra")));
        assert!(app.create_form.is_none());
        assert_eq!(app.products[0].id, "9");
        assert_eq!(app.display[0].title, "Gorra");
        assert_eq!(app.products.len(), 2);

        app.open_create_form();
        assert_eq!(app.create_form.as_ref().unwrap().draft.title.text(), "");
    }

    #[test]
    fn test_create_failure_keeps_modal_open() {
        let mut app = make_test_app(vec![]);
        app.open_create_form();
        fill_form(&mut app, "Gorra", "9999", "d", "https://x/y.jpg");
        app.submit_create_form();
        app.finish_create(Err(status_error("POST")));

        let form = app.create_form.as_ref().unwrap();
        assert!(!form.saving);
        assert_eq!(
            form.error.as_deref(),
            Some("POST /products -> 500 Internal Server Error")
        );
        assert_eq!(form.draft.title.text(), "Gorra");
        assert!(app.products.is_empty());
    }

    #[test]
    fn test_fit_mode_persists_across_openings() {
        let mut app = make_test_app(vec![product("1", "a")]);
        app.select("1");
        app.set_fit_mode(FitMode::Stretch);
        app.close_detail();
        app.select("1");
        assert_eq!(app.fit_mode, FitMode::Stretch);
    }

    #[test]
    fn test_reload_dropping_selected_product_clears_selection() {
        let mut app = make_test_app(vec![product("1", "a"), product("2", "b")]);
        app.select("1");
        app.request_reload();
        app.finish_load(Ok(vec![product("2", "b")]));
        assert!(app.selected.is_none());
        assert!(app.selected_product().is_none());

        app.select("2");
        app.request_reload();
        app.finish_load(Ok(vec![product("2", "b"), product("3", "c")]));
        assert_eq!(app.selected.as_deref(), Some("2"));
    }
}
