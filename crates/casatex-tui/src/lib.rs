// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use casatex_app::{
    AppCommand, AppMode, AppState, Contact, ContactFormInput, ContactId, ContactStatus, FormKind,
    FormPayload, LeadFormInput, LeadId, LeadStatus, ListQuery, PageInfo, Product, ProductFormInput,
    ProductId, ProductLead, ProductSize, SuggestionIndex, TabKind,
};
use casatex_app::{CatalogPager, ImageUpload, sort_contacts, sort_leads};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Catalog knobs handed down from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub page_size: u32,
    pub suggestion_limit: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            page_size: casatex_app::DEFAULT_PAGE_SIZE,
            suggestion_limit: casatex_app::INDEX_FETCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductWriteTarget {
    Create,
    Edit(ProductId),
}

/// Everything the UI needs from the outside world. The binary wires this to
/// the HTTP client; tests plug in an in-memory fake.
pub trait AppRuntime {
    fn load_products(&mut self, query: &ListQuery) -> Result<(Vec<Product>, PageInfo)>;
    fn load_product(&mut self, id: &ProductId) -> Result<Product>;
    fn load_leads(&mut self) -> Result<Vec<ProductLead>>;
    fn load_contacts(&mut self) -> Result<Vec<Contact>>;
    fn save_product(&mut self, target: &ProductWriteTarget, form: &ProductFormInput) -> Result<()>;
    fn delete_product(&mut self, id: &ProductId) -> Result<()>;
    fn submit_inquiry(&mut self, form: &LeadFormInput) -> Result<()>;
    fn submit_contact(&mut self, form: &ContactFormInput) -> Result<()>;
    fn set_lead_status(&mut self, id: &LeadId, status: LeadStatus) -> Result<()>;
    fn delete_lead(&mut self, id: &LeadId) -> Result<()>;
    fn set_contact_status(&mut self, id: &ContactId, status: ContactStatus) -> Result<()>;
    fn delete_contact(&mut self, id: &ContactId) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Title,
    Category,
}

#[derive(Debug, Clone, PartialEq)]
struct FilterUiState {
    field: FilterField,
    title_input: String,
    category_input: String,
    suggestions: Vec<String>,
    cursor: Option<usize>,
}

impl Default for FilterUiState {
    fn default() -> Self {
        Self {
            field: FilterField::Title,
            title_input: String::new(),
            category_input: String::new(),
            suggestions: Vec::new(),
            cursor: None,
        }
    }
}

impl FilterUiState {
    fn active_input(&self) -> &str {
        match self.field {
            FilterField::Title => &self.title_input,
            FilterField::Category => &self.category_input,
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.field {
            FilterField::Title => &mut self.title_input,
            FilterField::Category => &mut self.category_input,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FormUiState {
    kind: FormKind,
    target: ProductWriteTarget,
    inquiry_product: Option<Product>,
    field_index: usize,
    inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum DetailView {
    Product(Box<Product>),
    Lead(Box<ProductLead>),
    Contact(Box<Contact>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone)]
struct ViewData {
    options: UiOptions,
    pager: CatalogPager,
    suggestions: SuggestionIndex,
    leads: Vec<ProductLead>,
    contacts: Vec<Contact>,
    catalog_cursor: usize,
    lead_cursor: usize,
    contact_cursor: usize,
    filter: FilterUiState,
    form: Option<FormUiState>,
    detail: Option<DetailView>,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            options,
            pager: CatalogPager::new(options.page_size),
            suggestions: SuggestionIndex::default(),
            leads: Vec::new(),
            contacts: Vec::new(),
            catalog_cursor: 0,
            lead_cursor: 0,
            contact_cursor: 0,
            filter: FilterUiState::default(),
            form: None,
            detail: None,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_active_tab(state, runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    state.dispatch(command);
    if let Err(error) = refresh_active_tab(state, runtime, view_data) {
        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
    }
}

fn refresh_active_tab<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    match state.active_tab {
        TabKind::Catalog => {
            refresh_catalog(runtime, view_data)?;
            if view_data.suggestions.is_empty() {
                refresh_suggestions(runtime, view_data)?;
            }
            Ok(())
        }
        TabKind::Leads => refresh_leads(runtime, view_data),
        TabKind::Contacts => refresh_contacts(runtime, view_data),
    }
}

fn refresh_catalog<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    match runtime.load_products(&view_data.pager.query()) {
        Ok((products, pagination)) => {
            view_data.pager.apply_page(products, pagination);
            view_data.catalog_cursor =
                clamp_cursor(view_data.pager.products().len(), view_data.catalog_cursor);
            Ok(())
        }
        Err(error) => {
            view_data.pager.apply_error(error.to_string());
            view_data.catalog_cursor = 0;
            Err(error)
        }
    }
}

fn refresh_suggestions<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let query = ListQuery::for_suggestions(view_data.options.suggestion_limit);
    let (products, _) = runtime.load_products(&query)?;
    view_data.suggestions = SuggestionIndex::from_products(&products);
    Ok(())
}

fn refresh_leads<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let mut leads = runtime.load_leads()?;
    sort_leads(&mut leads);
    view_data.leads = leads;
    view_data.lead_cursor = clamp_cursor(view_data.leads.len(), view_data.lead_cursor);
    Ok(())
}

fn refresh_contacts<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let mut contacts = runtime.load_contacts()?;
    sort_contacts(&mut contacts);
    view_data.contacts = contacts;
    view_data.contact_cursor = clamp_cursor(view_data.contacts.len(), view_data.contact_cursor);
    Ok(())
}

fn clamp_cursor(len: usize, cursor: usize) -> usize {
    if len == 0 { 0 } else { cursor.min(len - 1) }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.form.is_some() {
        handle_form_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data.detail.is_some() {
        handle_detail_key(state, view_data, internal_tx, key);
        return false;
    }

    if state.mode == AppMode::Filter {
        handle_filter_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.confirming_delete {
        handle_delete_confirmation(state, runtime, view_data, internal_tx, key);
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key);
    false
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextTab, internal_tx);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevTab, internal_tx);
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            move_cursor(state, view_data, 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            move_cursor(state, view_data, -1);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            if let Err(error) = refresh_active_tab(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
            } else {
                emit_status(state, view_data, internal_tx, "refreshed");
            }
        }
        (KeyCode::Enter, _) => {
            open_detail(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            if selected_target_exists(state, view_data) {
                state.dispatch(AppCommand::RequestDelete);
            } else {
                emit_status(state, view_data, internal_tx, "nothing selected");
            }
        }
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ClearStatus);
        }
        _ => handle_tab_specific_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_tab_specific_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match state.active_tab {
        TabKind::Catalog => match (key.code, key.modifiers) {
            (KeyCode::Char('/'), KeyModifiers::NONE) => {
                view_data.filter.title_input = view_data.pager.title_filter().to_owned();
                view_data.filter.category_input = view_data.pager.category_filter().to_owned();
                view_data.filter.field = FilterField::Title;
                view_data.filter.suggestions.clear();
                view_data.filter.cursor = None;
                state.dispatch(AppCommand::EnterFilterMode);
            }
            (KeyCode::Char('n'), KeyModifiers::NONE) => {
                if view_data.pager.next_page() {
                    if let Err(error) = refresh_catalog(runtime, view_data) {
                        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                    }
                } else {
                    emit_status(state, view_data, internal_tx, "last page");
                }
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) => {
                if view_data.pager.prev_page() {
                    if let Err(error) = refresh_catalog(runtime, view_data) {
                        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                    }
                } else {
                    emit_status(state, view_data, internal_tx, "first page");
                }
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                open_product_form(state, view_data, ProductWriteTarget::Create, None);
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                if let Some(product) = selected_product(view_data).cloned() {
                    open_product_form(
                        state,
                        view_data,
                        ProductWriteTarget::Edit(product.id.clone()),
                        Some(&product),
                    );
                } else {
                    emit_status(state, view_data, internal_tx, "nothing selected");
                }
            }
            (KeyCode::Char('i'), KeyModifiers::NONE) => {
                if let Some(product) = selected_product(view_data).cloned() {
                    open_inquiry_form(state, view_data, product);
                } else {
                    emit_status(state, view_data, internal_tx, "nothing selected");
                }
            }
            _ => {}
        },
        TabKind::Leads => {
            if let (KeyCode::Char('s'), KeyModifiers::NONE) = (key.code, key.modifiers) {
                advance_selected_lead_status(state, runtime, view_data, internal_tx);
            }
        }
        TabKind::Contacts => match (key.code, key.modifiers) {
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                open_contact_form(state, view_data);
            }
            (KeyCode::Char('s'), KeyModifiers::NONE) => {
                advance_selected_contact_status(state, runtime, view_data, internal_tx);
            }
            _ => {}
        },
    }
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let (len, cursor) = match state.active_tab {
        TabKind::Catalog => (
            view_data.pager.products().len(),
            &mut view_data.catalog_cursor,
        ),
        TabKind::Leads => (view_data.leads.len(), &mut view_data.lead_cursor),
        TabKind::Contacts => (view_data.contacts.len(), &mut view_data.contact_cursor),
    };
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

fn selected_product(view_data: &ViewData) -> Option<&Product> {
    view_data.pager.products().get(view_data.catalog_cursor)
}

fn selected_lead(view_data: &ViewData) -> Option<&ProductLead> {
    view_data.leads.get(view_data.lead_cursor)
}

fn selected_contact(view_data: &ViewData) -> Option<&Contact> {
    view_data.contacts.get(view_data.contact_cursor)
}

fn selected_target_exists(state: &AppState, view_data: &ViewData) -> bool {
    match state.active_tab {
        TabKind::Catalog => selected_product(view_data).is_some(),
        TabKind::Leads => selected_lead(view_data).is_some(),
        TabKind::Contacts => selected_contact(view_data).is_some(),
    }
}

fn handle_delete_confirmation<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') => {
            let events = state.dispatch(AppCommand::ConfirmDelete);
            if events.contains(&casatex_app::AppEvent::DeleteConfirmed) {
                delete_selected(state, runtime, view_data, internal_tx);
            }
        }
        _ => {
            state.dispatch(AppCommand::CancelDelete);
        }
    }
}

fn delete_selected<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let outcome = match state.active_tab {
        TabKind::Catalog => selected_product(view_data)
            .map(|product| product.id.clone())
            .map(|id| {
                runtime.delete_product(&id)?;
                refresh_catalog(runtime, view_data)?;
                refresh_suggestions(runtime, view_data)
            }),
        TabKind::Leads => selected_lead(view_data).map(|lead| lead.id.clone()).map(|id| {
            runtime.delete_lead(&id)?;
            refresh_leads(runtime, view_data)
        }),
        TabKind::Contacts => selected_contact(view_data)
            .map(|contact| contact.id.clone())
            .map(|id| {
                runtime.delete_contact(&id)?;
                refresh_contacts(runtime, view_data)
            }),
    };

    match outcome {
        Some(Ok(())) => emit_status(state, view_data, internal_tx, "deleted"),
        Some(Err(error)) => {
            emit_status(state, view_data, internal_tx, format!("delete failed: {error}"));
        }
        None => emit_status(state, view_data, internal_tx, "nothing selected"),
    }
}

fn advance_selected_lead_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(lead) = selected_lead(view_data) else {
        emit_status(state, view_data, internal_tx, "nothing selected");
        return;
    };
    let id = lead.id.clone();
    let next = next_lead_status(lead.status);

    let result = runtime
        .set_lead_status(&id, next)
        .and_then(|()| refresh_leads(runtime, view_data));
    match result {
        Ok(()) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("lead marked {}", next.as_str()),
        ),
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("status update failed: {error}"));
        }
    }
}

fn advance_selected_contact_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(contact) = selected_contact(view_data) else {
        emit_status(state, view_data, internal_tx, "nothing selected");
        return;
    };
    let id = contact.id.clone();
    let next = next_contact_status(contact.status);

    let result = runtime
        .set_contact_status(&id, next)
        .and_then(|()| refresh_contacts(runtime, view_data));
    match result {
        Ok(()) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("message marked {}", next.as_str()),
        ),
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("status update failed: {error}"));
        }
    }
}

const fn next_lead_status(status: LeadStatus) -> LeadStatus {
    match status {
        LeadStatus::New => LeadStatus::Contacted,
        LeadStatus::Contacted => LeadStatus::Completed,
        LeadStatus::Completed => LeadStatus::New,
    }
}

const fn next_contact_status(status: ContactStatus) -> ContactStatus {
    match status {
        ContactStatus::New => ContactStatus::Contacted,
        ContactStatus::Contacted => ContactStatus::New,
    }
}

fn open_detail<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.active_tab {
        TabKind::Catalog => {
            let Some(id) = selected_product(view_data).map(|product| product.id.clone()) else {
                emit_status(state, view_data, internal_tx, "nothing selected");
                return;
            };
            // Refetch so the detail shows the canonical row, not the page cache.
            match runtime.load_product(&id) {
                Ok(product) => view_data.detail = Some(DetailView::Product(Box::new(product))),
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                }
            }
        }
        TabKind::Leads => {
            if let Some(lead) = selected_lead(view_data).cloned() {
                view_data.detail = Some(DetailView::Lead(Box::new(lead)));
            }
        }
        TabKind::Contacts => {
            if let Some(contact) = selected_contact(view_data).cloned() {
                view_data.detail = Some(DetailView::Contact(Box::new(contact)));
            }
        }
    }
}

fn handle_detail_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            view_data.detail = None;
        }
        KeyCode::Char('i') => {
            let product = match &view_data.detail {
                Some(DetailView::Product(product)) => Some(product.as_ref().clone()),
                _ => None,
            };
            if let Some(product) = product {
                view_data.detail = None;
                open_inquiry_form(state, view_data, product);
            } else {
                emit_status(state, view_data, internal_tx, "inquiries start from a product");
            }
        }
        _ => {}
    }
}

fn handle_filter_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Tab, _) => {
            view_data.filter.field = match view_data.filter.field {
                FilterField::Title => FilterField::Category,
                FilterField::Category => FilterField::Title,
            };
            recompute_filter_suggestions(view_data);
        }
        (KeyCode::Down, _) => {
            cycle_filter_suggestion(view_data, 1);
        }
        (KeyCode::Up, _) => {
            cycle_filter_suggestion(view_data, -1);
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            view_data.filter = FilterUiState::default();
            view_data.pager.clear_filters();
            state.dispatch(AppCommand::ExitToNav);
            if let Err(error) = refresh_catalog(runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
            } else {
                emit_status(state, view_data, internal_tx, "filters cleared");
            }
        }
        (KeyCode::Enter, _) => {
            let title = view_data.filter.title_input.trim().to_owned();
            let category = view_data.filter.category_input.trim().to_owned();
            view_data.pager.set_filters(title, category);
            state.dispatch(AppCommand::ExitToNav);
            if let Err(error) = refresh_catalog(runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
            } else if view_data.pager.is_filtered() {
                emit_status(state, view_data, internal_tx, "filter applied");
            } else {
                emit_status(state, view_data, internal_tx, "filters cleared");
            }
        }
        (KeyCode::Backspace, _) => {
            view_data.filter.active_input_mut().pop();
            recompute_filter_suggestions(view_data);
        }
        (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            view_data.filter.active_input_mut().push(ch);
            recompute_filter_suggestions(view_data);
        }
        _ => {}
    }
}

fn recompute_filter_suggestions(view_data: &mut ViewData) {
    let input = view_data.filter.active_input();
    let matches = match view_data.filter.field {
        FilterField::Title => view_data.suggestions.titles_matching(input),
        FilterField::Category => view_data.suggestions.categories_matching(input),
    };
    view_data.filter.suggestions = matches.into_iter().map(str::to_owned).collect();
    view_data.filter.cursor = None;
}

fn cycle_filter_suggestion(view_data: &mut ViewData, delta: isize) {
    if view_data.filter.suggestions.is_empty() {
        return;
    }
    let len = view_data.filter.suggestions.len() as isize;
    let next = match view_data.filter.cursor {
        None if delta > 0 => 0,
        None => len - 1,
        Some(current) => (current as isize + delta).rem_euclid(len),
    };
    let next = next.rem_euclid(len) as usize;
    view_data.filter.cursor = Some(next);
    let suggestion = view_data.filter.suggestions[next].clone();
    *view_data.filter.active_input_mut() = suggestion;
}

const PRODUCT_FIELDS: [&str; 9] = [
    "title",
    "category",
    "price",
    "short description",
    "long description",
    "features (separate with ;)",
    "length (in)",
    "width (in)",
    "image path (optional)",
];

const INQUIRY_FIELDS: [&str; 8] = [
    "name",
    "email",
    "phone",
    "message",
    "quantity",
    "height (in)",
    "width (in)",
    "dimension note",
];

const CONTACT_FIELDS: [&str; 4] = ["name", "email", "phone", "message"];

const fn form_fields(kind: FormKind) -> &'static [&'static str] {
    match kind {
        FormKind::Product => &PRODUCT_FIELDS,
        FormKind::Inquiry => &INQUIRY_FIELDS,
        FormKind::Contact => &CONTACT_FIELDS,
    }
}

fn product_form_inputs(product: Option<&Product>) -> Vec<String> {
    let Some(product) = product else {
        return vec![String::new(); PRODUCT_FIELDS.len()];
    };
    vec![
        product.title.clone(),
        product.category.clone(),
        product.price.to_string(),
        product.short_description.clone(),
        product.long_description.clone(),
        product.features.join("; "),
        dimension_input(product.size.length),
        dimension_input(product.size.width),
        String::new(),
    ]
}

fn dimension_input(value: f64) -> String {
    if value > 0.0 { value.to_string() } else { String::new() }
}

fn open_product_form(
    state: &mut AppState,
    view_data: &mut ViewData,
    target: ProductWriteTarget,
    template: Option<&Product>,
) {
    view_data.form = Some(FormUiState {
        kind: FormKind::Product,
        target,
        inquiry_product: None,
        field_index: 0,
        inputs: product_form_inputs(template),
    });
    state.dispatch(AppCommand::OpenForm(FormKind::Product));
}

fn open_inquiry_form(state: &mut AppState, view_data: &mut ViewData, product: Product) {
    let mut inputs = vec![String::new(); INQUIRY_FIELDS.len()];
    inputs[4] = "1".to_owned();
    view_data.form = Some(FormUiState {
        kind: FormKind::Inquiry,
        target: ProductWriteTarget::Create,
        inquiry_product: Some(product),
        field_index: 0,
        inputs,
    });
    state.dispatch(AppCommand::OpenForm(FormKind::Inquiry));
}

fn open_contact_form(state: &mut AppState, view_data: &mut ViewData) {
    view_data.form = Some(FormUiState {
        kind: FormKind::Contact,
        target: ProductWriteTarget::Create,
        inquiry_product: None,
        field_index: 0,
        inputs: vec![String::new(); CONTACT_FIELDS.len()],
    });
    state.dispatch(AppCommand::OpenForm(FormKind::Contact));
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(form) = view_data.form.as_mut() else {
        return;
    };
    let field_count = form_fields(form.kind).len();

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.form = None;
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            submit_form(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Down, _) | (KeyCode::Tab, _) => {
            form.field_index = (form.field_index + 1) % field_count;
        }
        (KeyCode::Up, _) | (KeyCode::BackTab, _) => {
            form.field_index = (form.field_index + field_count - 1) % field_count;
        }
        (KeyCode::Enter, _) => {
            if form.field_index + 1 < field_count {
                form.field_index += 1;
            } else {
                submit_form(state, runtime, view_data, internal_tx);
            }
        }
        (KeyCode::Backspace, _) => {
            form.inputs[form.field_index].pop();
        }
        (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            form.inputs[form.field_index].push(ch);
        }
        _ => {}
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.clone() else {
        return;
    };

    let submitted: Result<&'static str> = (|| {
        match form.kind {
            FormKind::Product => {
                let input = build_product_input(&form.inputs)?;
                FormPayload::Product(input.clone()).validate()?;
                runtime.save_product(&form.target, &input)?;
                // A saved product re-sorts to the front of the unfiltered
                // browse; jump there and rebuild the completion index.
                view_data.pager.reset();
                refresh_catalog(runtime, view_data)?;
                refresh_suggestions(runtime, view_data)?;
                Ok("product saved")
            }
            FormKind::Inquiry => {
                let product = form
                    .inquiry_product
                    .as_ref()
                    .ok_or_else(|| anyhow!("inquiry form has no product"))?;
                let input = build_inquiry_input(product, &form.inputs)?;
                FormPayload::Inquiry(input.clone()).validate()?;
                runtime.submit_inquiry(&input)?;
                Ok("inquiry sent")
            }
            FormKind::Contact => {
                let input = build_contact_input(&form.inputs);
                FormPayload::Contact(input.clone()).validate()?;
                runtime.submit_contact(&input)?;
                refresh_contacts(runtime, view_data)?;
                Ok("message sent")
            }
        }
    })();

    match submitted {
        Ok(message) => {
            view_data.form = None;
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, message);
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("submit failed: {error}"));
        }
    }
}

fn build_product_input(inputs: &[String]) -> Result<ProductFormInput> {
    Ok(ProductFormInput {
        title: inputs[0].trim().to_owned(),
        category: inputs[1].trim().to_owned(),
        price: parse_price(&inputs[2])?,
        short_description: inputs[3].trim().to_owned(),
        long_description: inputs[4].trim().to_owned(),
        features: parse_features(&inputs[5]),
        size: ProductSize {
            length: parse_dimension(&inputs[6])?,
            width: parse_dimension(&inputs[7])?,
        },
        image: load_image(&inputs[8])?,
    })
}

fn build_inquiry_input(product: &Product, inputs: &[String]) -> Result<LeadFormInput> {
    let mut main_product = casatex_app::AddOnSelection::for_product(product);
    main_product.quantity = parse_quantity(&inputs[4])?;
    main_product.height = parse_dimension(&inputs[5])?;
    main_product.width = parse_dimension(&inputs[6])?;
    main_product.dimension = inputs[7].trim().to_owned();

    Ok(LeadFormInput {
        name: inputs[0].trim().to_owned(),
        email: inputs[1].trim().to_owned(),
        phone: inputs[2].trim().to_owned(),
        message: inputs[3].trim().to_owned(),
        main_product,
        add_ons: Vec::new(),
    })
}

fn build_contact_input(inputs: &[String]) -> ContactFormInput {
    ContactFormInput {
        name: inputs[0].trim().to_owned(),
        email: inputs[1].trim().to_owned(),
        phone: inputs[2].trim().to_owned(),
        message: inputs[3].trim().to_owned(),
    }
}

fn parse_price(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("price is required");
    }
    trimmed
        .parse()
        .map_err(|_| anyhow!("price must be a number, got {trimmed:?}"))
}

fn parse_dimension(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| anyhow!("dimension must be a number, got {trimmed:?}"))
}

fn parse_quantity(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    trimmed
        .parse()
        .map_err(|_| anyhow!("quantity must be a whole number, got {trimmed:?}"))
}

fn parse_features(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|feature| !feature.is_empty())
        .map(str::to_owned)
        .collect()
}

fn load_image(raw: &str) -> Result<Option<ImageUpload>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let path = Path::new(trimmed);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("image path has no file name: {trimmed}"))?
        .to_owned();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image file {trimmed}"))?;
    Ok(Some(ImageUpload { file_name, bytes }))
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("casatex").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Catalog => render_catalog(frame, layout[1], state, view_data),
        TabKind::Leads => render_leads(frame, layout[1], view_data),
        TabKind::Contacts => render_contacts(frame, layout[1], view_data),
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(form) = &view_data.form {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(form_overlay_text(form))
            .block(Block::default().title(form_title(form)).borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if let Some(detail) = &view_data.detail {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(detail_lines(detail).join("\n"))
            .block(Block::default().title("detail").borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }
}

fn render_catalog(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let (filter_area, table_area) = if state.mode == AppMode::Filter {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);
        (Some(split[0]), split[1])
    } else {
        (None, area)
    };

    if let Some(filter_area) = filter_area {
        let filter = Paragraph::new(filter_bar_text(&view_data.filter))
            .block(Block::default().title("filter").borders(Borders::ALL));
        frame.render_widget(filter, filter_area);
    }

    if let Some(error) = view_data.pager.error() {
        let body = Paragraph::new(error.to_owned())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("catalog"));
        frame.render_widget(body, table_area);
        return;
    }

    let header = Row::new(
        ["title", "category", "price", "updated"]
            .into_iter()
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let rows = view_data
        .pager
        .products()
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let style = if index == view_data.catalog_cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(product.title.clone()),
                Cell::from(product.category.clone()),
                Cell::from(format_price(product.price)),
                Cell::from(short_date(&product.updated_at)),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(catalog_title(&view_data.pager))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, table_area);
}

fn render_leads(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(
        ["name", "phone", "status", "received", "items"]
            .into_iter()
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let rows = view_data.leads.iter().enumerate().map(|(index, lead)| {
        let style = if index == view_data.lead_cursor {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(lead.lead_details.name.clone()),
            Cell::from(lead.lead_details.phone.clone()),
            Cell::from(lead.status.as_str()),
            Cell::from(short_date(&lead.timestamp)),
            Cell::from(lead.add_on_products.len().to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
        Constraint::Percentage(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("leads").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_contacts(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(
        ["name", "email", "status", "received"]
            .into_iter()
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let rows = view_data
        .contacts
        .iter()
        .enumerate()
        .map(|(index, contact)| {
            let style = if index == view_data.contact_cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(contact.name.clone()),
                Cell::from(contact.email.clone()),
                Cell::from(contact.status.as_str()),
                Cell::from(short_date(&contact.timestamp)),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(30),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("contacts").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn catalog_title(pager: &CatalogPager) -> String {
    let mut title = format!("catalog  page {}/{}", pager.page(), pager.total_pages());
    if pager.is_filtered() {
        title.push_str("  [filtered]");
    }
    title
}

fn filter_bar_text(filter: &FilterUiState) -> String {
    let title_mark = if filter.field == FilterField::Title { ">" } else { " " };
    let category_mark = if filter.field == FilterField::Category { ">" } else { " " };
    let mut out = format!(
        "{title_mark} title: {}\n{category_mark} category: {}",
        filter.title_input, filter.category_input
    );
    if !filter.suggestions.is_empty() {
        out.push_str("\nsuggestions: ");
        out.push_str(&filter.suggestions.join(" | "));
    }
    out
}

fn form_title(form: &FormUiState) -> &'static str {
    match (form.kind, &form.target) {
        (FormKind::Product, ProductWriteTarget::Create) => "new product",
        (FormKind::Product, ProductWriteTarget::Edit(_)) => "edit product",
        (FormKind::Inquiry, _) => "product inquiry",
        (FormKind::Contact, _) => "contact us",
    }
}

fn form_overlay_text(form: &FormUiState) -> String {
    let fields = form_fields(form.kind);
    let mut lines = Vec::with_capacity(fields.len() + 2);
    if let Some(product) = &form.inquiry_product {
        lines.push(format!("for: {} ({})", product.title, format_price(product.price)));
        lines.push(String::new());
    }
    for (index, label) in fields.iter().enumerate() {
        let mark = if index == form.field_index { ">" } else { " " };
        lines.push(format!("{mark} {label}: {}", form.inputs[index]));
    }
    lines.join("\n")
}

fn detail_lines(detail: &DetailView) -> Vec<String> {
    match detail {
        DetailView::Product(product) => product_detail_lines(product),
        DetailView::Lead(lead) => lead_detail_lines(lead),
        DetailView::Contact(contact) => contact_detail_lines(contact),
    }
}

fn product_detail_lines(product: &Product) -> Vec<String> {
    let mut lines = vec![
        product.title.clone(),
        format!("category: {}", product.category),
        format!("price: {}", format_price(product.price)),
        String::new(),
        product.short_description.clone(),
    ];
    if !product.long_description.is_empty() {
        lines.push(String::new());
        lines.push(product.long_description.clone());
    }
    if product.size.is_present() {
        lines.push(String::new());
        lines.push(format!(
            "dimensions: {} in (L) x {} in (W)",
            product.size.length, product.size.width
        ));
    }
    if !product.features.is_empty() {
        lines.push(String::new());
        lines.push("features:".to_owned());
        for feature in &product.features {
            lines.push(format!("  - {feature}"));
        }
    }
    lines.push(String::new());
    lines.push(format!("updated: {}", short_date(&product.updated_at)));
    lines
}

fn lead_detail_lines(lead: &ProductLead) -> Vec<String> {
    let mut lines = vec![
        format!("{} <{}>", lead.lead_details.name, lead.lead_details.email),
        format!("phone: {}", lead.lead_details.phone),
        format!("status: {}", lead.status.as_str()),
        format!("received: {}", short_date(&lead.timestamp)),
    ];
    if !lead.lead_details.message.is_empty() {
        lines.push(String::new());
        lines.push(lead.lead_details.message.clone());
    }
    if !lead.add_on_products.is_empty() {
        lines.push(String::new());
        lines.push("requested products:".to_owned());
        for item in &lead.add_on_products {
            let mut entry = format!("  - {} x{}", item.title, item.quantity);
            if item.height > 0.0 || item.width > 0.0 {
                entry.push_str(&format!(" ({} x {} in)", item.height, item.width));
            }
            if !item.dimension.is_empty() {
                entry.push_str(&format!(" [{}]", item.dimension));
            }
            lines.push(entry);
        }
    }
    lines
}

fn contact_detail_lines(contact: &Contact) -> Vec<String> {
    vec![
        format!("{} <{}>", contact.name, contact.email),
        format!("phone: {}", contact.phone),
        format!("status: {}", contact.status.as_str()),
        format!("received: {}", short_date(&contact.timestamp)),
        String::new(),
        contact.message.clone(),
    ]
}

fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// First ten characters of an ISO timestamp, i.e. the date part.
fn short_date(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view_data.form.is_some() {
        return "up/down fields  enter next  ctrl-s submit  esc cancel".to_owned();
    }
    if view_data.detail.is_some() {
        return "esc close  i inquire".to_owned();
    }
    if state.mode == AppMode::Filter {
        return "type to filter  tab field  up/down suggest  enter apply  ctrl-u clear  esc cancel"
            .to_owned();
    }
    match state.active_tab {
        TabKind::Catalog => {
            "f/b tabs  j/k move  enter detail  / filter  n/p page  a add  e edit  i inquire  d delete  r refresh  ctrl-q quit"
                .to_owned()
        }
        TabKind::Leads => {
            "f/b tabs  j/k move  enter detail  s status  d delete  r refresh  ctrl-q quit".to_owned()
        }
        TabKind::Contacts => {
            "f/b tabs  j/k move  enter detail  a message  s status  d delete  r refresh  ctrl-q quit"
                .to_owned()
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
