use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::cli::state::{self, App, FormField};
use crate::cli::util::{fmt_date_short, fmt_money};
use crate::model::{Category, CategoryFilter};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // top tabs | main content | bottom status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(size);

    let titles = ["Individuals", "Records", "Add/Edit", "NetWorth", "Help"]
        .into_iter()
        .map(|t| Line::from(Span::raw(t)))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(match app.tab {
            state::Tab::Individuals => 0,
            state::Tab::Records => 1,
            state::Tab::AddRecord => 2,
            state::Tab::NetWorth => 3,
            state::Tab::Help => 4,
        })
        .block(Block::default().borders(Borders::ALL).title("Finance Tracker"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(tabs, root[0]);

    match app.tab {
        state::Tab::Individuals => draw_individuals(f, root[1], app),
        state::Tab::Records => draw_records(f, root[1], app),
        state::Tab::AddRecord => draw_record_form(f, root[1], app),
        state::Tab::NetWorth => draw_net_worth(f, root[1], app),
        state::Tab::Help => draw_help(f, root[1]),
    }

    f.render_widget(Paragraph::new(app.status.clone()), root[2]);

    if app.individuals.adding {
        let area = center_rect(root[1], 50, 8);
        f.render_widget(Clear, area);
        draw_add_individual_modal(f, area, app);
    }
    if app.records.confirm_delete.is_some() {
        let area = center_rect(root[1], 44, 7);
        f.render_widget(Clear, area);
        draw_confirm_delete_modal(f, area, app);
    }
}

// Individuals page

fn draw_individuals(f: &mut Frame, area: Rect, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let items: Vec<ListItem> = app
        .individuals
        .list
        .iter()
        .map(|name| ListItem::new(Line::from(Span::raw(name.clone()))))
        .collect();

    let len = app.individuals.list.len();
    if let Some(i) = app.individuals.sel.selected() {
        if i >= len {
            app.individuals
                .sel
                .select(if len == 0 { None } else { Some(len - 1) });
        }
    }

    let title = if len == 0 {
        "Individuals (none yet — n=new)"
    } else {
        "Individuals  (Up/Down, Enter→Records, n=new, r=refresh)"
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, cols[0], &mut app.individuals.sel);

    let right_text = match (&app.individuals.error, app.current_scope()) {
        (Some(err), _) => format!("Error: {err}"),
        (None, Some(state::Scope::SingleUser)) => {
            "Single-user mode.\nAll records are unscoped.".to_string()
        }
        (None, Some(state::Scope::Individual(name))) => {
            format!("Selected: {name}\n\nRecords and net worth\nare scoped to this person.")
        }
        (None, None) => "No individual selected".to_string(),
    };
    let right = Paragraph::new(right_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Scope"));
    f.render_widget(right, cols[1]);
}

fn draw_add_individual_modal(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        format!("Name: {}", app.individuals.draft.value),
        "".into(),
        "Enter: save | Esc: cancel".into(),
        app.individuals.error.clone().unwrap_or_default(),
    ]
    .join("\n");

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New Individual"));
    f.render_widget(p, area);
}

// Records page

fn draw_records(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec!["Date", "Category", "Description", "Amount"]).height(1);

    let body: Vec<Row> = app
        .records
        .table
        .iter()
        .map(|r| {
            let amount_style = match r.category {
                Category::Income => Style::default().fg(Color::Green),
                Category::Expense => Style::default().fg(Color::Red),
            };
            Row::new(vec![
                Cell::from(fmt_date_short(&r.date)),
                Cell::from(r.category.as_str()),
                Cell::from(r.description.clone()),
                Cell::from(Span::styled(fmt_money(&r.amount.0), amount_style)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Percentage(60),
        Constraint::Length(14),
    ];

    let filter_label = match app.records.filter {
        None => "all",
        Some(CategoryFilter::Income) => "income",
        Some(CategoryFilter::Expense) => "expense",
    };
    let title = if app.records.loading {
        format!("Records (loading…) [filter: {filter_label}]")
    } else if app.records.table.is_empty() {
        format!("Records (empty) [filter: {filter_label}]  a=add, f=filter")
    } else {
        format!("Records [filter: {filter_label}]  (a=add, e=edit, x=delete, f=filter, w=net worth)")
    };

    let mut tsel = app.records.tsel.clone();
    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut tsel);
    app.records.tsel = tsel;
}

fn draw_confirm_delete_modal(f: &mut Frame, area: Rect, app: &App) {
    let desc = app
        .current_record()
        .map(|r| r.description.clone())
        .unwrap_or_default();
    let lines = vec![
        format!("Delete \"{desc}\"?"),
        "".into(),
        "y/Enter: delete | n/Esc: keep".into(),
    ]
    .join("\n");

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Confirm Delete"));
    f.render_widget(p, area);
}

// Add / edit record page

fn draw_record_form(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(8)])
        .split(area);

    let (m_amount, m_desc) = match app.form.editing {
        Some(FormField::Amount) => ("  <editing>", ""),
        Some(FormField::Description) => ("", "  <editing>"),
        None => ("", ""),
    };

    let mut lines = Vec::new();
    if let Some(date) = app.form.date {
        // server-owned, shown for context only
        lines.push(format!("Date    : {} (read-only)", fmt_date_short(&date)));
    }
    lines.push(format!("Amount  : {}{}", app.form.amount.value, m_amount));
    lines.push(format!("Desc    : {}{}", app.form.description.value, m_desc));
    lines.push(format!("Category: {}", app.form.category.as_str()));

    let title = if app.form.editing_id.is_some() {
        "Edit Record"
    } else {
        "Add Record"
    };
    let form_p = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(form_p, chunks[0]);

    let help_lines = vec![
        "Controls:".into(),
        "  a/d: Edit Amount / Description".into(),
        "  t  : Toggle Income/Expense".into(),
        "  s  : Submit | Esc: Back".into(),
        String::new(),
        if let Some(err) = &app.form.error {
            format!("Error: {err}")
        } else if let Some(succ) = &app.form.success {
            format!("Success: {succ}")
        } else {
            String::new()
        },
    ]
    .join("\n");

    let help_p = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help & Status"))
        .wrap(Wrap { trim: true });
    f.render_widget(help_p, chunks[1]);
}

// Net worth page

fn draw_net_worth(f: &mut Frame, area: Rect, app: &App) {
    let body = match (&app.net_worth.data, app.net_worth.loading) {
        (_, true) => "Loading…".to_string(),
        (Some(d), false) => vec![
            format!("Net worth      : {}", fmt_money(&d.net_worth)),
            format!("Total income   : {}", fmt_money(&d.total_income)),
            format!("Total expenses : {}", fmt_money(&d.total_expenses)),
            String::new(),
            "r: refresh | b: back to records".into(),
        ]
        .join("\n"),
        (None, false) => "No data. Press r to fetch.".to_string(),
    };

    let scope_label = match app.current_scope() {
        Some(state::Scope::Individual(name)) => format!("Net Worth — {name}"),
        _ => "Net Worth".to_string(),
    };
    let p = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(scope_label));
    f.render_widget(p, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        "Global Keys:",
        "  q        : Quit App",
        "  ?        : Open this Help tab",
        "",
        "Individuals Tab:",
        "  Up/Down  : Select individual (records rescope)",
        "  Enter    : View records for selected individual",
        "  n        : Add a new individual",
        "  r        : Refresh list",
        "",
        "Records Tab:",
        "  Up/Down  : Navigate rows",
        "  a        : Add record",
        "  e/Enter  : Edit selected record",
        "  x/Del    : Delete selected record (asks to confirm)",
        "  f        : Cycle filter (all → income → expense)",
        "  w        : Net worth view",
        "  r        : Refresh | b: Back to individuals",
        "",
        "Add/Edit Tab:",
        "  a/d      : Edit Amount / Description",
        "  t        : Toggle Income/Expense",
        "  s        : Submit | Esc: Back without saving",
    ]
    .join("\n");

    let p = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help & Keybindings"));
    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(rect.width),
        height: h.min(rect.height),
    }
}
