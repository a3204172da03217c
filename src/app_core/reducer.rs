//! Shared event reducer: maps key and mouse events onto state transitions.
//!
//! The runtime converts platform events to [`AppKeyEvent`] / [`AppMouseEvent`]
//! and calls these functions; any requested network work is left in
//! `app.pending_action`.

use crate::app_core::form::FormField;
use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FocusPane};
use crate::app_core::text_input::TextInput;
use crate::fit::FitMode;
use crate::ui::ITEM_HEIGHT;
use ratatui::layout::Rect;

pub const SCROLL_LINES: i32 = 1;
const DEFAULT_PAGE: i32 = 5;

fn contains(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|area| area.contains((column, row).into()))
}

/// Returns the pane that contains the given cell coordinates, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<FocusPane> {
    if contains(app.areas.filter, column, row) {
        return Some(FocusPane::Filter);
    }
    if contains(app.areas.list, column, row) {
        return Some(FocusPane::List);
    }
    None
}

/// Handle a key event, mutating `app` in place.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.is_release {
        return;
    }

    if app.show_help {
        if matches!(event.code, AppKeyCode::Char('?') | AppKeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if app.create_form.is_some() {
        handle_form_key(app, event);
        return;
    }

    if app.selected.is_some() {
        handle_detail_key(app, event);
        return;
    }

    let code = event.code;
    let ctrl = event.ctrl;

    if ctrl && code == AppKeyCode::Char('r') {
        app.request_reload();
        return;
    }

    if code == AppKeyCode::Tab || code == AppKeyCode::BackTab {
        let next = match app.focused_pane {
            FocusPane::List => FocusPane::Filter,
            FocusPane::Filter => FocusPane::List,
        };
        app.focus_pane(next);
        return;
    }

    match app.focused_pane {
        FocusPane::List => handle_list_key(app, event),
        FocusPane::Filter => handle_filter_key(app, event),
    }
}

fn handle_list_key(app: &mut AppState, event: AppKeyEvent) {
    let page = app
        .areas
        .list_content
        .map(|a| (a.height / ITEM_HEIGHT).max(1) as i32)
        .unwrap_or(DEFAULT_PAGE);

    match event.code {
        AppKeyCode::Char('q') => app.should_quit = true,
        AppKeyCode::Char('/') => app.focus_pane(FocusPane::Filter),
        AppKeyCode::Char('?') => app.show_help = true,
        AppKeyCode::Char('n') if !event.ctrl => app.open_create_form(),
        AppKeyCode::Char(' ') | AppKeyCode::Char('f') if !event.ctrl => {
            app.toggle_favorite_at_cursor()
        }
        AppKeyCode::Enter => app.select_at_cursor(),
        AppKeyCode::Up => app.move_cursor(-1),
        AppKeyCode::Down => app.move_cursor(1),
        AppKeyCode::Home => app.cursor_to_start(),
        AppKeyCode::End => app.cursor_to_end(),
        AppKeyCode::PageUp => app.move_cursor(-page),
        AppKeyCode::PageDown => app.move_cursor(page),
        AppKeyCode::Char(c) if c.is_alphanumeric() && !event.ctrl && !event.alt => {
            app.focus_pane(FocusPane::Filter);
            app.edit_query(|input| {
                input.move_to_end();
                input.insert_char(c);
            });
        }
        _ => {}
    }
}

/// Editing keys shared by the filter box and the form fields.
fn apply_text_edit(input: &mut TextInput, event: AppKeyEvent) {
    match event.code {
        AppKeyCode::Char('u') if event.ctrl => input.clear(),
        AppKeyCode::Char('w') if event.ctrl => input.delete_word(),
        AppKeyCode::Char('a') if event.ctrl => input.move_to_start(),
        AppKeyCode::Char('e') if event.ctrl => input.move_to_end(),
        AppKeyCode::Char(c) if !event.ctrl => input.insert_char(c),
        AppKeyCode::Backspace => input.backspace(),
        AppKeyCode::Delete => input.delete(),
        AppKeyCode::Left => input.move_left(),
        AppKeyCode::Right => input.move_right(),
        AppKeyCode::Home => input.move_to_start(),
        AppKeyCode::End => input.move_to_end(),
        _ => {}
    }
}

fn handle_filter_key(app: &mut AppState, event: AppKeyEvent) {
    match event.code {
        AppKeyCode::Enter | AppKeyCode::Esc => app.focus_pane(FocusPane::List),
        AppKeyCode::Up => app.move_cursor(-1),
        AppKeyCode::Down => app.move_cursor(1),
        _ => {
            app.edit_query(|input| apply_text_edit(input, event));
        }
    }
}

fn handle_detail_key(app: &mut AppState, event: AppKeyEvent) {
    match event.code {
        AppKeyCode::Esc | AppKeyCode::Enter | AppKeyCode::Char('q') => app.close_detail(),
        AppKeyCode::Left => app.set_fit_mode(app.fit_mode.prev()),
        AppKeyCode::Right => app.set_fit_mode(app.fit_mode.next()),
        AppKeyCode::Char(c @ '1'..='3') => {
            let idx = (c as u8 - b'1') as usize;
            app.set_fit_mode(FitMode::ALL[idx]);
        }
        AppKeyCode::Char(' ') | AppKeyCode::Char('f') => app.toggle_selected_favorite(),
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, event: AppKeyEvent) {
    let Some(form) = app.create_form.as_mut() else {
        return;
    };

    match event.code {
        AppKeyCode::Esc => app.cancel_create_form(),
        AppKeyCode::Char('s') if event.ctrl => app.submit_create_form(),
        AppKeyCode::Tab if event.shift => form.focus = form.focus.prev(),
        AppKeyCode::Tab | AppKeyCode::Down => form.focus = form.focus.next(),
        AppKeyCode::BackTab | AppKeyCode::Up => form.focus = form.focus.prev(),
        AppKeyCode::Enter => {
            if form.focus == FormField::ImageUrl {
                app.submit_create_form();
            } else {
                form.focus = form.focus.next();
            }
        }
        _ => {
            if !form.saving {
                apply_text_edit(form.focused_input(), event);
            }
        }
    }
}

/// Handle a pointer gesture.
///
/// `event.column` and `event.row` must already be in terminal cell coordinates.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let (column, row) = (event.column, event.row);

    if app.show_help {
        if event.kind == AppMouseKind::Tap {
            app.show_help = false;
            return true;
        }
        return false;
    }

    if app.create_form.is_some() {
        return handle_form_mouse(app, event);
    }

    if app.selected.is_some() {
        return handle_detail_mouse(app, event);
    }

    match event.kind {
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
            if pane_at(app, column, row) != Some(FocusPane::List) || app.filtered_indices.is_empty()
            {
                return false;
            }
            let delta = if event.kind == AppMouseKind::ScrollDown {
                SCROLL_LINES
            } else {
                -SCROLL_LINES
            };
            app.move_cursor(delta);
            true
        }
        AppMouseKind::Tap | AppMouseKind::LongPress => {
            if event.kind == AppMouseKind::Tap && contains(app.areas.new_button, column, row) {
                app.open_create_form();
                return true;
            }

            if let Some(index) = list_row_at(app, column, row) {
                app.focus_pane(FocusPane::List);
                app.list_state.select(Some(index));
                if event.kind == AppMouseKind::LongPress {
                    app.toggle_favorite_at_cursor();
                } else {
                    app.select_at_cursor();
                }
                return true;
            }

            if event.kind == AppMouseKind::Tap
                && let Some(input_area) = app.areas.filter_input
                && contains(app.areas.filter, column, row)
            {
                app.focus_pane(FocusPane::Filter);
                if input_area.contains((column, row).into()) {
                    let scroll = app.query.horizontal_scroll(input_area.width);
                    let target = scroll + column.saturating_sub(input_area.x);
                    app.query.set_cursor_at_column(target);
                }
                return true;
            }

            if pane_at(app, column, row) == Some(FocusPane::List)
                && app.focused_pane != FocusPane::List
            {
                app.focus_pane(FocusPane::List);
                return true;
            }
            false
        }
    }
}

/// Index into `filtered_indices` of the card under the pointer.
fn list_row_at(app: &AppState, column: u16, row: u16) -> Option<usize> {
    let content = app.areas.list_content?;
    if !content.contains((column, row).into()) {
        return None;
    }
    let card = ((row - content.y) / ITEM_HEIGHT) as usize;
    let index = app.list_state.offset() + card;
    (index < app.filtered_indices.len()).then_some(index)
}

fn handle_detail_mouse(app: &mut AppState, event: AppMouseEvent) -> bool {
    if event.kind != AppMouseKind::Tap {
        return false;
    }
    let (column, row) = (event.column, event.row);

    if let Some(mode) = app
        .areas
        .detail_modes
        .iter()
        .find(|(_, area)| area.contains((column, row).into()))
        .map(|(mode, _)| *mode)
    {
        app.set_fit_mode(mode);
        return true;
    }
    if contains(app.areas.detail_close, column, row) {
        app.close_detail();
        return true;
    }
    if contains(app.areas.detail_favorite, column, row) {
        app.toggle_selected_favorite();
        return true;
    }
    false
}

fn handle_form_mouse(app: &mut AppState, event: AppMouseEvent) -> bool {
    if event.kind != AppMouseKind::Tap {
        return false;
    }
    let (column, row) = (event.column, event.row);

    if contains(app.areas.form_save, column, row) {
        app.submit_create_form();
        return true;
    }
    if contains(app.areas.form_cancel, column, row) {
        app.cancel_create_form();
        return true;
    }

    let clicked = app
        .areas
        .form_fields
        .iter()
        .find(|(_, area)| area.contains((column, row).into()))
        .map(|(field, _)| *field);
    if let (Some(field), Some(form)) = (clicked, app.create_form.as_mut()) {
        form.focus = field;
        form.focused_input().move_to_end();
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::state::AppAction;
    use crate::model::BackendProduct;
    use crate::theme;

    fn make_key(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent::new(code)
    }

    fn make_key_ctrl(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent::ctrl(code)
    }

    fn make_mouse(kind: AppMouseKind, column: u16, row: u16) -> AppMouseEvent {
        AppMouseEvent { kind, column, row }
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key_event(app, make_key(AppKeyCode::Char(c)));
        }
    }

    fn make_app_with_titles(titles: &[&str]) -> AppState {
        let products = titles
            .iter()
            .enumerate()
            .map(|(i, title)| BackendProduct {
                id: (i + 1).to_string(),
                title: title.to_string(),
                price: 100.0,
                description: String::new(),
                image_url: format!("https://img/{}.jpg", i + 1),
            })
            .collect();
        let mut app = AppState::new(
            theme::Theme::Dracula.config(),
            "test".to_string(),
            "v0".to_string(),
        );
        app.finish_load(Ok(products));
        app
    }

    fn make_test_app(items: usize) -> AppState {
        let titles: Vec<String> = (0..items).map(|i| format!("item {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        make_app_with_titles(&refs)
    }

    fn with_list_layout(app: &mut AppState) {
        app.areas.list = Some(Rect::new(0, 3, 40, 12));
        app.areas.list_content = Some(Rect::new(1, 4, 38, 10));
        app.areas.filter = Some(Rect::new(0, 0, 40, 3));
        app.areas.filter_input = Some(Rect::new(1, 1, 38, 1));
        app.areas.new_button = Some(Rect::new(30, 16, 8, 1));
    }

    #[test]
    fn test_handle_key_event_navigation() {
        let mut app = make_test_app(3);
        assert_eq!(app.list_state.selected(), Some(0));
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.list_state.selected(), Some(1));
        handle_key_event(&mut app, make_key(AppKeyCode::End));
        assert_eq!(app.list_state.selected(), Some(2));
        handle_key_event(&mut app, make_key(AppKeyCode::Home));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_handle_key_event_filtering() {
        let mut app = make_app_with_titles(&["Zapatillas Runner", "Auriculares BT"]);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('/')));
        assert_eq!(app.focused_pane, FocusPane::Filter);

        type_text(&mut app, "zapa");
        assert_eq!(app.query.text(), "zapa");
        assert_eq!(app.filtered_indices, vec![0]);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('u')));
        assert_eq!(app.filtered_indices, vec![0, 1]);

        type_text(&mut app, "xyz");
        assert!(app.filtered_indices.is_empty());
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_handle_key_event_autofocus_filter() {
        let mut app = make_test_app(1);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('t')));
        assert_eq!(app.focused_pane, FocusPane::Filter);
        assert_eq!(app.query.text(), "t");
    }

    #[test]
    fn test_enter_opens_detail_and_esc_closes() {
        let mut app = make_test_app(2);
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.selected.as_deref(), Some("2"));

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(app.selected.is_none());
    }

    #[test]
    fn test_detail_keys_change_fit_mode_and_favorite() {
        let mut app = make_test_app(1);
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        handle_key_event(&mut app, make_key(AppKeyCode::Right));
        assert_eq!(app.fit_mode, FitMode::Contain);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('3')));
        assert_eq!(app.fit_mode, FitMode::Stretch);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('f')));
        assert!(app.is_favorite("1"));
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(app.selected.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_space_toggles_favorite_in_list() {
        let mut app = make_test_app(2);
        handle_key_event(&mut app, make_key(AppKeyCode::Char(' ')));
        assert!(app.is_favorite("1"));
        handle_key_event(&mut app, make_key(AppKeyCode::Char(' ')));
        assert!(!app.is_favorite("1"));
    }

    #[test]
    fn test_form_typing_and_submit() {
        let mut app = make_test_app(0);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('n')));
        assert!(app.create_form.is_some());

        type_text(&mut app, "Gorra");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        type_text(&mut app, "9999");
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        type_text(&mut app, "d");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        type_text(&mut app, "https://x/y.jpg");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));

        match app.pending_action.take() {
            Some(AppAction::CreateProduct(product)) => {
                assert_eq!(product.title, "Gorra");
                assert_eq!(product.price, 9999.0);
                assert_eq!(product.description, "d");
                assert_eq!(product.image_url, "https://x/y.jpg");
            }
            other => panic!("expected create action, got {:?}", other),
        }
        assert!(app.is_saving());

        // Typing is ignored while the request is in flight.
        type_text(&mut app, "zzz");
        assert_eq!(
            app.create_form.as_ref().unwrap().draft.image_url.text(),
            "https://x/y.jpg"
        );
    }

    #[test]
    fn test_form_ctrl_s_with_invalid_price() {
        let mut app = make_test_app(0);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('n')));
        type_text(&mut app, "Gorra");
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        type_text(&mut app, "abc");
        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('s')));
        assert!(app.pending_action.is_none());
        assert!(app.create_form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn test_form_esc_discards_draft() {
        let mut app = make_test_app(0);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('n')));
        type_text(&mut app, "Gorra");
        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(app.create_form.is_none());
        handle_key_event(&mut app, make_key(AppKeyCode::Char('n')));
        assert!(app.create_form.as_ref().unwrap().draft.title.is_empty());
    }

    #[test]
    fn test_ctrl_r_requests_reload() {
        let mut app = make_test_app(1);
        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('r')));
        assert_eq!(app.pending_action, Some(AppAction::LoadProducts));
        assert!(app.loading);
    }

    #[test]
    fn test_list_keys_work_after_reload_drops_selected_product() {
        let mut app = make_test_app(2);
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.selected.as_deref(), Some("1"));

        app.request_reload();
        app.pending_action = None;
        app.finish_load(Ok(Vec::new()));
        assert!(app.selected.is_none());

        handle_key_event(&mut app, make_key(AppKeyCode::Char('n')));
        assert!(app.create_form.is_some());
        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_behavior() {
        let mut app = make_test_app(1);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = make_test_app(1);
        app.focus_pane(FocusPane::Filter);
        handle_key_event(&mut app, make_key(AppKeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.query.text(), "q");
    }

    #[test]
    fn test_handle_key_event_ignores_release() {
        let mut app = make_test_app(1);
        let release_event = AppKeyEvent {
            is_release: true,
            ..make_key(AppKeyCode::Char('a'))
        };
        handle_key_event(&mut app, release_event);
        assert_eq!(app.focused_pane, FocusPane::List);
        assert!(app.query.is_empty());
    }

    #[test]
    fn test_tap_on_card_opens_detail() {
        let mut app = make_test_app(5);
        with_list_layout(&mut app);
        // Rows 4-5 hold the first card, 6-7 the second.
        let redraw = handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 3, 6));
        assert!(redraw);
        assert_eq!(app.list_state.selected(), Some(1));
        assert_eq!(app.selected.as_deref(), Some("2"));
    }

    #[test]
    fn test_long_press_on_card_toggles_favorite() {
        let mut app = make_test_app(5);
        with_list_layout(&mut app);
        handle_mouse_event(&mut app, make_mouse(AppMouseKind::LongPress, 3, 9));
        assert!(app.is_favorite("3"));
        assert!(app.selected.is_none());
    }

    #[test]
    fn test_tap_below_last_card_is_ignored() {
        let mut app = make_test_app(1);
        with_list_layout(&mut app);
        let redraw = handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 3, 8));
        assert!(!redraw);
        assert!(app.selected.is_none());
    }

    #[test]
    fn test_tap_on_filter_sets_caret() {
        let mut app = make_test_app(1);
        with_list_layout(&mut app);
        app.set_query("abcdef");
        let redraw = handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 3, 1));
        assert!(redraw);
        assert_eq!(app.focused_pane, FocusPane::Filter);
        assert_eq!(app.query.cursor(), 2);
    }

    #[test]
    fn test_tap_new_button_opens_form() {
        let mut app = make_test_app(1);
        with_list_layout(&mut app);
        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 32, 16));
        assert!(app.create_form.is_some());
    }

    #[test]
    fn test_scroll_over_list_moves_cursor() {
        let mut app = make_test_app(4);
        with_list_layout(&mut app);
        let redraw = handle_mouse_event(&mut app, make_mouse(AppMouseKind::ScrollDown, 3, 5));
        assert!(redraw);
        assert_eq!(app.list_state.selected(), Some(SCROLL_LINES as usize));
    }

    #[test]
    fn test_detail_buttons() {
        let mut app = make_test_app(1);
        app.select("1");
        app.areas.detail_modes = vec![
            (FitMode::Cover, Rect::new(2, 10, 7, 1)),
            (FitMode::Contain, Rect::new(10, 10, 9, 1)),
            (FitMode::Stretch, Rect::new(20, 10, 9, 1)),
        ];
        app.areas.detail_favorite = Some(Rect::new(2, 12, 16, 1));
        app.areas.detail_close = Some(Rect::new(20, 12, 7, 1));

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 12, 10));
        assert_eq!(app.fit_mode, FitMode::Contain);
        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 5, 12));
        assert!(app.is_favorite("1"));
        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 22, 12));
        assert!(app.selected.is_none());
    }

    #[test]
    fn test_form_buttons() {
        let mut app = make_test_app(0);
        app.open_create_form();
        app.areas.form_fields = vec![
            (FormField::Title, Rect::new(2, 2, 30, 3)),
            (FormField::Price, Rect::new(2, 5, 30, 3)),
        ];
        app.areas.form_save = Some(Rect::new(20, 14, 6, 1));
        app.areas.form_cancel = Some(Rect::new(10, 14, 8, 1));

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 4, 6));
        assert_eq!(app.create_form.as_ref().unwrap().focus, FormField::Price);

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 21, 14));
        assert!(app.create_form.as_ref().unwrap().error.is_some());
        assert!(app.pending_action.is_none());

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::Tap, 12, 14));
        assert!(app.create_form.is_none());
    }
}
