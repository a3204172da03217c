use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::app_core::form::{CreateForm, FormField};
use crate::app_core::state::{AppState, FocusPane, ScreenAreas};
use crate::app_core::text_input::TextInput;
use crate::fit::FitMode;
use crate::model::{DisplayProduct, format_price};

/// Terminal lines taken by one product card in the list.
pub const ITEM_HEIGHT: u16 = 2;

/// Aspect ratio, in cells, assumed for product photos in the preview frame.
pub const PREVIEW_ASPECT: (u16, u16) = (8, 3);

const FILTER_PLACEHOLDER: &str = "Filter by title...";
const NEW_BUTTON_LABEL: &str = "[ + New ]";
const FAVORITE_MARK: &str = "★ ";

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    // Hit areas are only valid for the frame that recorded them.
    app.areas = ScreenAreas::default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Filter input
            Constraint::Min(0),    // Product list
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    app.areas.filter = Some(chunks[1]);
    app.areas.list = Some(chunks[2]);

    render_header(f, app, chunks[0]);
    render_filter(f, app, chunks[1]);
    render_product_list(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if app.show_help {
        render_help_overlay(f, app);
    } else if app.create_form.is_some() {
        render_create_modal(f, app);
    } else if app.selected.is_some() {
        render_detail_modal(f, app);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Places one-line buttons left to right with a single column gap.
/// Buttons that run past the right edge are clipped to zero width.
fn layout_buttons(area: Rect, labels: &[String]) -> Vec<Rect> {
    let right = area.x + area.width;
    let mut x = area.x;
    labels
        .iter()
        .map(|label| {
            let width = (label.width() as u16).min(right.saturating_sub(x));
            let rect = Rect::new(x, area.y, width, area.height.min(1));
            x = (x + width + 1).min(right);
            rect
        })
        .collect()
}

fn render_button(f: &mut Frame, label: &str, style: Style, area: Rect) {
    if area.width > 0 {
        f.render_widget(Paragraph::new(label.to_string()).style(style), area);
    }
}

fn render_header(f: &mut Frame, app: &mut AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(" Gallery ", app.theme.title),
        Span::raw(format!(" Items: {}  ", app.products.len())),
    ];

    if app.loading {
        spans.push(Span::styled(
            "Loading products...",
            app.theme.text.add_modifier(Modifier::DIM | Modifier::ITALIC),
        ));
    } else if let Some(error) = &app.load_error {
        spans.push(Span::styled(
            error.clone(),
            Style::default()
                .fg(app.theme.accent.error)
                .add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(app.theme.text), area);
}

/// Renders the title filter box.
fn render_filter(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Filter;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(" Filter (/) ")
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" Enter/Esc back • Ctrl+U clear ").right_aligned()
        } else {
            Line::from("")
        });

    let inner = block.inner(area);
    app.areas.filter_input = Some(inner);
    let horizontal_scroll = app.query.horizontal_scroll(inner.width);

    let content = if app.query.is_empty() && !is_focused {
        Text::from(Line::from(Span::styled(
            FILTER_PLACEHOLDER,
            app.theme.text.add_modifier(Modifier::DIM | Modifier::ITALIC),
        )))
    } else {
        Text::from(app.query.text().to_string())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(app.theme.text)
        .scroll((0, horizontal_scroll));

    f.render_widget(paragraph, area);

    let modal_open = app.show_help || app.create_form.is_some() || app.selected.is_some();
    if is_focused && !modal_open {
        place_cursor(f, &app.query, inner);
    }
}

fn place_cursor(f: &mut Frame, input: &TextInput, inner: Rect) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let horizontal_scroll = input.horizontal_scroll(inner.width);
    let visible_offset = input.cursor_offset().saturating_sub(horizontal_scroll);
    let cursor_x = inner.x + visible_offset.min(inner.width.saturating_sub(1));
    f.set_cursor_position((cursor_x, inner.y));
}

/// Two lines per card: the title (starred when favorite), then price and description.
fn product_card(app: &AppState, product: &DisplayProduct) -> ListItem<'static> {
    let favorite = app.favorites.contains(&product.id);
    let mut title = Vec::with_capacity(2);
    if favorite {
        title.push(Span::styled(
            FAVORITE_MARK,
            Style::default().fg(app.theme.accent.favorite),
        ));
    }
    title.push(Span::styled(
        product.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let detail = Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format_price(product.price),
            Style::default().fg(app.theme.accent.price),
        ),
        Span::raw("  "),
        Span::styled(
            product.description.clone(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    ListItem::new(vec![Line::from(title), detail])
}

/// Renders the scrollable list of product cards.
fn render_product_list(f: &mut Frame, app: &mut AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered_indices
        .iter()
        .filter_map(|&idx| app.display.get(idx))
        .map(|product| product_card(app, product))
        .collect();

    let is_focused = app.focused_pane == FocusPane::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title_style(app.theme.title)
        .title(" Products ")
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ move • Enter open • f favorite • n new ").right_aligned()
        } else {
            Line::from("").right_aligned()
        })
        .title_alignment(Alignment::Left)
        .style(app.theme.list_normal);

    let content = block.inner(area);
    app.areas.list_content = Some(content);

    if items.is_empty() {
        let message = if app.loading {
            ""
        } else if !app.query.is_empty() {
            "No products match the filter"
        } else {
            "No products"
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                message,
                app.theme.text.add_modifier(Modifier::DIM | Modifier::ITALIC),
            ))
            .block(block)
            .style(app.theme.list_normal),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .style(app.theme.list_normal)
        .scroll_padding(1)
        .highlight_style(app.theme.list_selected);

    f.render_stateful_widget(list, area, &mut app.list_state);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    let mut scrollbar_state = ScrollbarState::new(app.filtered_indices.len())
        .position(app.list_state.selected().unwrap_or(0));

    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Renders the status bar: shortcuts, feedback and the "New" button.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("Ctrl+R ", key_style),
        Span::raw("reload  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let middle = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(app.theme.accent.notice),
        )),
        None => Line::from(format!("{} • {}", app.source_label, app.app_version)),
    };
    f.render_widget(
        Paragraph::new(middle)
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    let right = chunks[2];
    let width = (NEW_BUTTON_LABEL.width() as u16).min(right.width);
    let button = Rect::new(right.x + right.width - width, right.y, width, right.height);
    app.areas.new_button = Some(button);
    render_button(f, NEW_BUTTON_LABEL, app.theme.title, button);
}

/// Renders the product detail modal with the image preview and fit mode selector.
fn render_detail_modal(f: &mut Frame, app: &mut AppState) {
    let Some(product) = app.selected_product().cloned() else {
        return;
    };
    let popup_rect = centered_rect(f.area(), 72, 24);
    if popup_rect.width < 4 || popup_rect.height < 4 {
        return;
    }
    app.areas.detail = Some(popup_rect);
    f.render_widget(Clear, popup_rect);

    let favorite = app.is_favorite(&product.id);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Product ")
        .title_style(app.theme.title)
        .title_bottom(Line::from(" ←/→ fit • f favorite • Esc close ").right_aligned());

    let inner = block.inner(popup_rect).inner(Margin::new(1, 0));
    f.render_widget(block, popup_rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Image preview
            Constraint::Length(1), // Title
            Constraint::Length(1), // Price
            Constraint::Length(3), // Description
            Constraint::Length(1), // Fit modes
            Constraint::Length(1), // Actions
        ])
        .split(inner);

    render_preview(f, app, &product, chunks[0]);

    let mut title = Vec::with_capacity(2);
    if favorite {
        title.push(Span::styled(
            FAVORITE_MARK,
            Style::default().fg(app.theme.accent.favorite),
        ));
    }
    title.push(Span::styled(product.title.clone(), app.theme.title));
    f.render_widget(Paragraph::new(Line::from(title)), chunks[1]);

    f.render_widget(
        Paragraph::new(Span::styled(
            format_price(product.price),
            Style::default()
                .fg(app.theme.accent.price)
                .add_modifier(Modifier::BOLD),
        )),
        chunks[2],
    );

    f.render_widget(
        Paragraph::new(product.description.clone()).wrap(Wrap { trim: true }),
        chunks[3],
    );

    let mode_labels: Vec<String> = FitMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| format!("[{} {}]", i + 1, mode.as_str()))
        .collect();
    let mode_rects = layout_buttons(chunks[4], &mode_labels);
    for ((mode, label), rect) in FitMode::ALL.iter().zip(&mode_labels).zip(&mode_rects) {
        let style = if *mode == app.fit_mode {
            app.theme.list_selected
        } else {
            app.theme.border
        };
        render_button(f, label, style, *rect);
        app.areas.detail_modes.push((*mode, *rect));
    }

    let favorite_label = if favorite {
        "[ ★ Remove favorite ]"
    } else {
        "[ ☆ Mark favorite ]"
    };
    let action_labels = vec![favorite_label.to_string(), "[ Close ]".to_string()];
    let action_rects = layout_buttons(chunks[5], &action_labels);
    render_button(
        f,
        &action_labels[0],
        Style::default().fg(app.theme.accent.favorite),
        action_rects[0],
    );
    render_button(f, &action_labels[1], app.theme.title, action_rects[1]);
    app.areas.detail_favorite = Some(action_rects[0]);
    app.areas.detail_close = Some(action_rects[1]);
}

/// Draws the image reference where the current fit mode would place the picture.
fn render_preview(f: &mut Frame, app: &AppState, product: &DisplayProduct, area: Rect) {
    let frame_inner = area.inner(Margin::new(1, 1));
    let placement = app.fit_mode.place(frame_inner, PREVIEW_ASPECT);

    let mut frame = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border)
        .title(format!(" Image · {} ", app.fit_mode.as_str()))
        .title_style(app.theme.title);
    if placement.cropped {
        frame = frame.title_bottom(Line::from(" cropped ").right_aligned());
    }
    f.render_widget(frame, area);

    if placement.rect.width == 0 || placement.rect.height == 0 {
        return;
    }
    f.render_widget(
        Paragraph::new(product.image.uri().to_string())
            .style(app.theme.list_selected)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        placement.rect,
    );
}

fn render_create_modal(f: &mut Frame, app: &mut AppState) {
    let Some(form) = app.create_form.as_ref() else {
        return;
    };
    let popup_rect = centered_rect(f.area(), 64, 21);
    if popup_rect.width < 4 || popup_rect.height < 4 {
        return;
    }
    app.areas.form = Some(popup_rect);
    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" New product ")
        .title_style(app.theme.title)
        .title_bottom(Line::from(" Tab next • Ctrl+S save • Esc cancel ").right_aligned());

    let inner = block.inner(popup_rect).inner(Margin::new(1, 0));
    f.render_widget(block, popup_rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2), // Error
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    let mut field_areas = Vec::with_capacity(FormField::ALL.len());
    for (field, area) in FormField::ALL.iter().zip(chunks.iter()) {
        render_form_field(f, app, form, *field, *area);
        field_areas.push((*field, *area));
    }

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(Span::styled(
                error.clone(),
                Style::default().fg(app.theme.accent.error),
            ))
            .wrap(Wrap { trim: true }),
            chunks[4],
        );
    }

    let save_label = if form.saving {
        "[ Saving... ]"
    } else {
        "[ Save ]"
    };
    let labels = vec!["[ Cancel ]".to_string(), save_label.to_string()];
    let rects = layout_buttons(chunks[5], &labels);
    let disabled = app.theme.border.add_modifier(Modifier::DIM);
    let (cancel_style, save_style) = if form.saving {
        (disabled, disabled)
    } else {
        (app.theme.border_selected, app.theme.title)
    };
    render_button(f, &labels[0], cancel_style, rects[0]);
    render_button(f, &labels[1], save_style, rects[1]);

    app.areas.form_fields = field_areas;
    app.areas.form_cancel = Some(rects[0]);
    app.areas.form_save = Some(rects[1]);
}

fn render_form_field(
    f: &mut Frame,
    app: &AppState,
    form: &CreateForm,
    field: FormField,
    area: Rect,
) {
    let is_focused = form.focus == field;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(format!(" {} ", field.label()))
        .title_style(if is_focused {
            app.theme.title
        } else {
            app.theme.text
        });

    let input = form.draft.field(field);
    let inner = block.inner(area);
    let style = if form.saving {
        app.theme.text.add_modifier(Modifier::DIM)
    } else {
        app.theme.text
    };

    f.render_widget(
        Paragraph::new(input.text().to_string())
            .block(block)
            .style(style)
            .scroll((0, input.horizontal_scroll(inner.width))),
        area,
    );

    if is_focused && !form.saving {
        place_cursor(f, input, inner);
    }
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(64).saturating_sub(4);
    let popup_height = 26.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = centered_rect(area, popup_width, popup_height);

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <18}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "List",
        vec![
            ("Enter | Click", "open details"),
            ("f | Space", "toggle favorite"),
            ("Long press", "toggle favorite"),
            ("n", "new product"),
            ("/", "filter by title"),
            ("Ctrl+R", "reload products"),
            ("q", "quit"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Details",
        vec![
            ("← | → | 1-3", "fit mode: cover, contain, stretch"),
            ("f | Space", "toggle favorite"),
            ("Esc | Enter", "close"),
        ],
    ));
    lines.push(Line::from(""));
    lines.extend(format_section(
        "New product",
        vec![
            ("Tab | ↑ | ↓", "next | previous field"),
            ("Enter", "next field, save on the last"),
            ("Ctrl+S", "save"),
            ("Esc", "cancel"),
        ],
    ));

    f.render_widget(
        Paragraph::new(lines),
        inner_area.inner(Margin::new(1, 1)),
    );
}
