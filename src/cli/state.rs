// src/cli/state.rs
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::{ListState, TableState};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::cli::input::LineEdit;
use crate::model::{
    Category, CategoryFilter, FinancialRecord, Money, NetWorthData, NewRecord, RecordUpdate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Individuals,
    Records,
    AddRecord,
    NetWorth,
    Help,
}

/// Resolved scope for record and net-worth queries.
///
/// `SingleUser` means the service reported no individuals at all, so
/// every call uses the unscoped path variant. While individuals exist
/// but none is selected yet, there is no scope and dependent views
/// skip their fetch entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    SingleUser,
    Individual(String),
}

impl Scope {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::SingleUser => None,
            Self::Individual(name) => Some(name),
        }
    }
}

#[derive(Default)]
pub struct IndividualsPage {
    pub list: Vec<String>,
    pub sel: ListState,
    pub adding: bool,
    pub draft: LineEdit,
    pub error: Option<String>,
}

#[derive(Default)]
pub struct RecordsPage {
    pub table: Vec<FinancialRecord>,
    pub tsel: TableState,
    pub filter: Option<CategoryFilter>,
    pub loading: bool,
    /// Id of the record awaiting delete confirmation, if any.
    pub confirm_delete: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Description,
}

/// Add/edit form. `editing_id` selects the edit variant; `date` is
/// server-owned and only carried for read-only display while editing.
#[derive(Default, Clone)]
pub struct RecordForm {
    pub editing_id: Option<Uuid>,
    pub date: Option<chrono::NaiveDate>,
    pub amount: LineEdit,
    pub description: LineEdit,
    pub category: Category,
    pub editing: Option<FormField>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl RecordForm {
    pub fn edit_of(rec: &FinancialRecord) -> Self {
        let mut form = Self::default();
        form.editing_id = Some(rec.id);
        form.date = Some(rec.date);
        form.amount.set(rec.amount.0.to_string());
        form.description.set(rec.description.clone());
        form.category = rec.category;
        form
    }
}

#[derive(Default)]
pub struct NetWorthPage {
    pub data: Option<NetWorthData>,
    pub loading: bool,
}

pub struct App {
    pub api: ApiClient,
    pub tab: Tab,
    pub status: String,
    pub quit: bool,
    pub individuals: IndividualsPage,
    pub records: RecordsPage,
    pub form: RecordForm,
    pub net_worth: NetWorthPage,
    scope_epoch: u64,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tab: Tab::Individuals,
            status: "Press ? for help | q to quit".into(),
            quit: false,
            individuals: IndividualsPage::default(),
            records: RecordsPage::default(),
            form: RecordForm::default(),
            net_worth: NetWorthPage::default(),
            scope_epoch: 0,
        }
    }

    // ============= Scope =============

    pub fn current_scope(&self) -> Option<Scope> {
        if self.individuals.list.is_empty() {
            return Some(Scope::SingleUser);
        }
        let idx = self.individuals.sel.selected()?;
        self.individuals
            .list
            .get(idx)
            .map(|name| Scope::Individual(name.clone()))
    }

    pub fn scope_epoch(&self) -> u64 {
        self.scope_epoch
    }

    /// Invalidates every in-flight record/net-worth fetch. A response
    /// carrying an older epoch is dropped on application, so the last
    /// selection wins regardless of arrival order.
    fn bump_scope(&mut self) {
        self.scope_epoch += 1;
    }

    pub fn select_individual(&mut self, idx: usize) {
        if idx < self.individuals.list.len() {
            self.individuals.sel.select(Some(idx));
            self.bump_scope();
        }
    }

    fn move_individual(&mut self, delta: isize) {
        let n = self.individuals.list.len();
        if n == 0 {
            return;
        }
        let cur = self.individuals.sel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.select_individual(next);
    }

    // ============= Individuals =============

    pub async fn refresh_individuals(&mut self) -> anyhow::Result<()> {
        match self.api.list_individuals().await {
            Ok(list) => {
                self.individuals.list = list;
                self.individuals.error = None;
                if self.individuals.sel.selected().is_none() && !self.individuals.list.is_empty() {
                    // server order decides the default selection
                    self.select_individual(0);
                }
            }
            Err(e) => {
                self.individuals.error = Some(format!("Failed to load individuals: {e}"));
            }
        }
        Ok(())
    }

    pub fn begin_add_individual(&mut self) {
        self.individuals.adding = true;
        self.individuals.draft.clear();
        self.individuals.error = None;
    }

    pub fn cancel_add_individual(&mut self) {
        self.individuals.adding = false;
        self.individuals.draft.clear();
        self.individuals.error = None;
    }

    pub async fn submit_add_individual(&mut self) -> anyhow::Result<()> {
        if self.individuals.draft.value.trim().is_empty() {
            // local rejection, no network call
            self.individuals.error = Some("Name cannot be empty".into());
            return Ok(());
        }
        let name = self.individuals.draft.value.clone();
        match self.api.add_individual(&name).await {
            Ok(_) => {
                self.individuals.adding = false;
                self.individuals.draft.clear();
                self.individuals.error = None;
                self.refresh_individuals().await?;
            }
            Err(e) => {
                // keep the draft so a retry does not require retyping
                self.individuals.error = Some(format!("Failed to add individual: {e}"));
            }
        }
        Ok(())
    }

    // ============= Records =============

    pub async fn refresh_records(&mut self) -> anyhow::Result<()> {
        let Some(scope) = self.current_scope() else {
            // no scope resolved yet: neutral empty state, no fetch
            self.records.table.clear();
            self.records.tsel.select(None);
            return Ok(());
        };
        let epoch = self.scope_epoch;
        self.records.loading = true;
        let res = self.api.list_records(scope.key(), self.records.filter).await;
        self.records.loading = false;
        match res {
            Ok(rows) => {
                self.apply_records(epoch, rows);
            }
            Err(e) => self.status = format!("Load failed: {e}"),
        }
        Ok(())
    }

    /// Applies a fetched record set unless the scope has moved on since
    /// the fetch started. Returns whether the rows were accepted.
    pub fn apply_records(&mut self, epoch: u64, rows: Vec<FinancialRecord>) -> bool {
        if epoch != self.scope_epoch {
            return false;
        }
        self.records.table = rows;
        let len = self.records.table.len();
        match self.records.tsel.selected() {
            Some(i) if i >= len => {
                self.records
                    .tsel
                    .select(if len == 0 { None } else { Some(len - 1) });
            }
            None if len > 0 => self.records.tsel.select(Some(0)),
            _ => {}
        }
        true
    }

    pub fn current_record(&self) -> Option<&FinancialRecord> {
        let idx = self.records.tsel.selected()?;
        self.records.table.get(idx)
    }

    fn move_record(&mut self, delta: isize) {
        let n = self.records.table.len();
        if n == 0 {
            self.records.tsel.select(None);
            return;
        }
        let cur = self.records.tsel.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.records.tsel.select(Some(next));
    }

    pub fn cycle_filter(&mut self) {
        self.records.filter = match self.records.filter {
            None => Some(CategoryFilter::Income),
            Some(CategoryFilter::Income) => Some(CategoryFilter::Expense),
            Some(CategoryFilter::Expense) => None,
        };
    }

    pub fn request_delete(&mut self) {
        if let Some(rec) = self.current_record() {
            self.records.confirm_delete = Some(rec.id);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.records.confirm_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> anyhow::Result<()> {
        let Some(id) = self.records.confirm_delete else {
            return Ok(());
        };
        let key = self.current_scope().and_then(|s| s.key().map(str::to_owned));
        match self.api.delete_record(key.as_deref(), id).await {
            Ok(_) => {
                // refetch before dismissing the modal so the table
                // never shows the pre-delete rows underneath it
                self.refresh_records().await?;
                self.status = "Deleted.".into();
            }
            Err(e) => self.status = format!("Delete failed: {e}"),
        }
        self.records.confirm_delete = None;
        Ok(())
    }

    // ============= Record form =============

    pub fn open_add_form(&mut self) {
        self.form = RecordForm::default();
        self.tab = Tab::AddRecord;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(rec) = self.current_record().cloned() {
            self.form = RecordForm::edit_of(&rec);
            self.tab = Tab::AddRecord;
        }
    }

    /// Client-side validation; sets `form.error` and returns `None` on
    /// failure so nothing is submitted.
    fn validate_form(&mut self) -> Option<(Money, Category, String)> {
        let description = self.form.description.value.trim().to_string();
        if description.is_empty() {
            self.form.error = Some("Description is required".into());
            return None;
        }
        let raw = self.form.amount.value.trim();
        if raw.is_empty() {
            self.form.error = Some("Amount cannot be empty".into());
            return None;
        }
        let amount = match Decimal::from_str(raw) {
            Ok(d) => Money(d.abs()),
            Err(_) => {
                self.form.error = Some("Invalid amount format".into());
                return None;
            }
        };
        self.form.error = None;
        Some((amount, self.form.category, description))
    }

    pub async fn submit_record(&mut self) -> anyhow::Result<()> {
        let Some((amount, category, description)) = self.validate_form() else {
            return Ok(());
        };
        let key = self.current_scope().and_then(|s| s.key().map(str::to_owned));

        match self.form.editing_id {
            Some(id) => {
                let req = RecordUpdate {
                    amount,
                    category,
                    description,
                };
                match self.api.update_record(key.as_deref(), id, &req).await {
                    Ok(_) => {
                        // editor closes only after the refetch settles
                        self.refresh_records().await?;
                        self.form = RecordForm::default();
                        self.tab = Tab::Records;
                        self.status = "Updated.".into();
                    }
                    Err(e) => {
                        self.form.error = Some(format!("Failed to update record: {e}"));
                        self.form.success = None;
                    }
                }
            }
            None => {
                let req = NewRecord {
                    amount,
                    category,
                    description,
                };
                match self.api.create_record(key.as_deref(), &req).await {
                    Ok(_) => {
                        self.refresh_records().await?;
                        self.form = RecordForm::default();
                        self.tab = Tab::Records;
                        self.status = "Record added.".into();
                    }
                    Err(_) => {
                        // input is preserved for retry
                        self.form.error = Some("Failed to add record".into());
                        self.form.success = None;
                    }
                }
            }
        }
        Ok(())
    }

    // ============= Net worth =============

    pub async fn refresh_net_worth(&mut self) -> anyhow::Result<()> {
        let Some(scope) = self.current_scope() else {
            self.net_worth.data = None;
            return Ok(());
        };
        let epoch = self.scope_epoch;
        self.net_worth.loading = true;
        let res = self.api.net_worth(scope.key()).await;
        self.net_worth.loading = false;
        match res {
            Ok(data) => {
                self.apply_net_worth(epoch, data);
            }
            Err(e) => self.status = format!("Load failed: {e}"),
        }
        Ok(())
    }

    pub fn apply_net_worth(&mut self, epoch: u64, data: NetWorthData) -> bool {
        if epoch != self.scope_epoch {
            return false;
        }
        self.net_worth.data = Some(data);
        true
    }

    // ============= Input =============

    pub async fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.individuals.adding {
            self.handle_add_individual_input(k).await?;
            return Ok(());
        }
        if self.records.confirm_delete.is_some() {
            self.handle_confirm_input(k).await?;
            return Ok(());
        }
        if self.tab == Tab::AddRecord && self.form.editing.is_some() {
            self.handle_form_input(k);
            return Ok(());
        }

        if k.code == KeyCode::Char('q') {
            self.quit = true;
            return Ok(());
        }

        match self.tab {
            Tab::Individuals => match k.code {
                KeyCode::Up => {
                    self.move_individual(-1);
                    self.refresh_records().await.ok();
                }
                KeyCode::Down => {
                    self.move_individual(1);
                    self.refresh_records().await.ok();
                }
                KeyCode::Enter => {
                    self.tab = Tab::Records;
                    self.refresh_records().await.ok();
                }
                KeyCode::Char('n') => self.begin_add_individual(),
                KeyCode::Char('r') => {
                    self.refresh_individuals().await.ok();
                }
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::Records => match k.code {
                KeyCode::Up => self.move_record(-1),
                KeyCode::Down => self.move_record(1),
                KeyCode::Char('a') => self.open_add_form(),
                KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
                KeyCode::Char('x') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('f') => {
                    self.cycle_filter();
                    self.refresh_records().await.ok();
                }
                KeyCode::Char('w') => {
                    self.tab = Tab::NetWorth;
                    self.refresh_net_worth().await.ok();
                }
                KeyCode::Char('r') => {
                    self.refresh_records().await.ok();
                }
                KeyCode::Char('b') | KeyCode::Esc => self.tab = Tab::Individuals,
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::AddRecord => match k.code {
                KeyCode::Char('a') => self.form.editing = Some(FormField::Amount),
                KeyCode::Char('d') => self.form.editing = Some(FormField::Description),
                KeyCode::Char('t') => self.form.category = self.form.category.toggle(),
                KeyCode::Char('s') => {
                    self.submit_record().await.ok();
                }
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.form = RecordForm::default();
                    self.tab = Tab::Records;
                }
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::NetWorth => match k.code {
                KeyCode::Char('r') => {
                    self.refresh_net_worth().await.ok();
                }
                KeyCode::Char('b') | KeyCode::Esc => self.tab = Tab::Records,
                KeyCode::Char('?') => self.tab = Tab::Help,
                _ => {}
            },
            Tab::Help => match k.code {
                KeyCode::Esc | KeyCode::Char('b') => self.tab = Tab::Individuals,
                _ => {}
            },
        }
        Ok(())
    }

    async fn handle_add_individual_input(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        match k.code {
            KeyCode::Esc => self.cancel_add_individual(),
            KeyCode::Enter => {
                self.submit_add_individual().await?;
            }
            KeyCode::Char(c) => self.individuals.draft.push(c),
            KeyCode::Backspace => self.individuals.draft.backspace(),
            KeyCode::Left => self.individuals.draft.left(),
            KeyCode::Right => self.individuals.draft.right(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_confirm_input(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        match k.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.confirm_delete().await?;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.cancel_delete(),
            _ => {}
        }
        Ok(())
    }

    fn handle_form_input(&mut self, k: KeyEvent) {
        let Some(field) = self.form.editing else {
            return;
        };
        let edit = match field {
            FormField::Amount => &mut self.form.amount,
            FormField::Description => &mut self.form.description,
        };
        match k.code {
            KeyCode::Char(c) => edit.push(c),
            KeyCode::Backspace => edit.backspace(),
            KeyCode::Left => edit.left(),
            KeyCode::Right => edit.right(),
            KeyCode::Enter | KeyCode::Esc => self.form.editing = None,
            KeyCode::Tab | KeyCode::BackTab => {
                self.form.editing = Some(match field {
                    FormField::Amount => FormField::Description,
                    FormField::Description => FormField::Amount,
                });
            }
            _ => {}
        }
    }
}
