//! Screen rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::menu::{ItemKind, MenuItem};
use crate::nav::{Navigator, Screen};

const PANEL_HEIGHT: u16 = 2;

pub fn draw(frame: &mut Frame, nav: &Navigator, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PANEL_HEIGHT), // Title + battery
            Constraint::Min(3),               // Menu
            Constraint::Length(2),            // Footer
        ])
        .split(frame.area());

    draw_panel(frame, chunks[0], nav.menu().title(), status);
    draw_menu(frame, chunks[1], nav);

    let footer = Paragraph::new(footer_text(nav.screen()))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if let Some(notice) = nav.notice() {
        let area = centered(frame.area(), 40, 5);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(notice.message.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

fn draw_panel(frame: &mut Frame, area: Rect, title: &str, status: Option<&str>) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let status = status.map(|s| format!("{s} ")).unwrap_or_default();
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(status.chars().count() as u16),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format!(" {title}")).style(Style::default().fg(Color::Cyan).bold()),
        parts[0],
    );
    frame.render_widget(Paragraph::new(status), parts[1]);
}

fn draw_menu(frame: &mut Frame, area: Rect, nav: &Navigator) {
    let menu = nav.menu();
    if menu.is_empty() {
        frame.render_widget(
            Paragraph::new("  (empty)").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let rows: Vec<ListItem> = menu.items().iter().map(row).collect();
    let list = List::new(rows)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(menu.focused());
    frame.render_stateful_widget(list, area, &mut state);
}

fn row(item: &MenuItem) -> ListItem<'_> {
    let marker = match item.kind() {
        ItemKind::Directory => "[DIR] ",
        ItemKind::ScriptFile => "[SH]  ",
        ItemKind::Action(_) => "",
    };
    ListItem::new(format!("{marker}{}", item.label()))
}

fn footer_text(screen: &Screen) -> &'static str {
    match screen {
        Screen::MainMenu => "  [↑/↓] Move  [Enter] Select",
        Screen::RebootMenu | Screen::FileBrowse(_) => "  [↑/↓] Move  [Enter] Select  [Esc] Back",
        Screen::ScriptConfirm(_) => "  [Enter] Run  [Esc] Cancel",
        Screen::Halting(_) => "",
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
