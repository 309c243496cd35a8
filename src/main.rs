use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use sgl_terminal::display::{self, Avatar, MatchupOutcome};
use sgl_terminal::feed;
use sgl_terminal::state::{
    AppState, Delta, Matchup, ProviderCommand, Tab, apply_delta, tab_label,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        // A notice blocks everything until dismissed.
        if self.state.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.notice = None;
            }
            return;
        }
        if self.state.image_overlay.is_some() {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                _ => self.state.image_overlay = None,
            }
            return;
        }
        if self.state.search_active {
            match key.code {
                KeyCode::Esc => self.state.search_active = false,
                KeyCode::Enter => {
                    self.request_search();
                    self.state.search_active = false;
                }
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Char(c) => self.state.push_search_char(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.select_tab(Tab::Today),
            KeyCode::Char('2') => self.state.select_tab(Tab::Fighters),
            KeyCode::Char('3') => self.state.select_tab(Tab::Matchups),
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Char('s') => self.request_search(),
            KeyCode::Char('r') => {
                if self.state.tab == Tab::Today {
                    self.request_today();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('o') => self.open_selected_image(false),
            KeyCode::Char('p') => self.open_selected_image(true),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_search(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Portal consult unavailable");
            return;
        };
        let term = self.state.search_term.clone();
        if tx.send(ProviderCommand::Search { term }).is_err() {
            self.state.push_log("[WARN] Consult request failed");
        } else {
            self.state.push_log(format!(
                "[INFO] Consulting portal for '{}'",
                self.state.search_term
            ));
        }
    }

    fn request_today(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Portal fetch unavailable");
            return;
        };
        if tx.send(ProviderCommand::FetchToday).is_err() {
            self.state.push_log("[WARN] Today refresh request failed");
        } else {
            self.state.push_log("[INFO] Today refresh requested");
        }
    }

    // `second` picks the right-hand corner of a matchup; badges never open.
    fn open_selected_image(&mut self, second: bool) {
        let avatar = match self.state.tab {
            Tab::Fighters => {
                if second {
                    None
                } else {
                    self.state.selected_fighter().map(|fighter| {
                        display::resolve_avatar(
                            fighter.image_path.as_deref(),
                            fighter.name.as_deref(),
                        )
                    })
                }
            }
            Tab::Today | Tab::Matchups => self.state.selected_matchup().map(|matchup| {
                if second {
                    display::resolve_avatar(matchup.image_b.as_deref(), matchup.fighter_b.as_deref())
                } else {
                    display::resolve_avatar(matchup.image_a.as_deref(), matchup.fighter_a.as_deref())
                }
            }),
        };
        match avatar {
            Some(Avatar::Photo(url)) => self.state.image_overlay = Some(url),
            Some(Avatar::Badge(_)) => self.state.push_log("[INFO] No image for that fighter"),
            None => {}
        }
    }
}

fn main() -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_search(frame, chunks[1], &app.state);

    match app.state.tab {
        Tab::Today => render_today(frame, chunks[2], &app.state),
        Tab::Fighters => render_fighters(frame, chunks[2], &app.state),
        Tab::Matchups => render_matchups(frame, chunks[2], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if let Some(url) = &app.state.image_overlay {
        render_image_overlay(frame, frame.size(), url);
    }
    if let Some(message) = &app.state.notice {
        render_notice_overlay(frame, frame.size(), message);
    }
}

fn header_text(state: &AppState) -> String {
    let line1 = format!(
        "SGL TERMINAL | fight portal | {}",
        Local::now().format("%d/%m/%Y")
    );
    let line2 = format!(
        "[1] Today  [2] Fighters  [3] Matchups   (viewing: {})",
        tab_label(state.tab)
    );
    format!("{line1}\n{line2}")
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = if state.search_active {
        "Search (editing)"
    } else {
        "Search"
    };
    let content = if state.search_active {
        format!("{}_", state.search_term)
    } else {
        state.search_term.clone()
    };
    let style = if state.search_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(content)
        .style(style)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Enter Consult portal | Esc Leave search | typing narrows last results".to_string();
    }
    let base = "1/2/3 Tabs | / Search | s Consult | j/k/↑/↓ Move";
    match state.tab {
        Tab::Today => format!("{base} | r Reload | o/p Image | ? Help | q Quit"),
        Tab::Fighters => format!("{base} | o Image | ? Help | q Quit"),
        Tab::Matchups => format!("{base} | o/p Image | ? Help | q Quit"),
    }
}

fn render_today(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let heading = Paragraph::new(format!(
        "Today's card - {}",
        Local::now().format("%d/%m/%Y")
    ))
    .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(heading, sections[0]);

    render_matchup_rows(
        frame,
        sections[1],
        &state.today,
        state.selected,
        "No matchups scheduled for today",
    );
}

fn render_fighters(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(results) = &state.results else {
        render_consult_hint(frame, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = fighter_columns();
    render_fighter_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let fighters = &results.fighters;
    if fighters.is_empty() {
        let empty =
            Paragraph::new("No fighters found").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    const ROW_HEIGHT: u16 = 3;
    if list_area.height < ROW_HEIGHT {
        return;
    }
    let visible = (list_area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, fighters.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * ROW_HEIGHT,
            width: list_area.width,
            height: ROW_HEIGHT,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let fighter = &fighters[idx];
        let avatar = display::resolve_avatar(fighter.image_path.as_deref(), fighter.name.as_deref());
        let name = fighter.name.as_deref().unwrap_or("-");
        let team = fighter.team.as_deref().unwrap_or("");
        let discipline = fighter.discipline.as_deref().unwrap_or("");
        let weight = fighter.weight.as_deref().unwrap_or("");

        render_cell_text(frame, cols[0], &avatar_tag(&avatar), row_style);
        render_cell_lines(
            frame,
            cols[1],
            &[
                (name.to_string(), row_style.add_modifier(Modifier::BOLD)),
                (team.to_string(), row_style),
            ],
        );
        render_cell_text(frame, cols[2], &display::record_label(fighter), row_style);
        render_cell_lines(
            frame,
            cols[3],
            &[(discipline.to_string(), row_style), (weight.to_string(), row_style)],
        );
    }
}

fn render_matchups(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(results) = &state.results else {
        render_consult_hint(frame, area);
        return;
    };
    render_matchup_rows(
        frame,
        area,
        &results.matchups,
        state.selected,
        "No matchups found",
    );
}

fn render_matchup_rows(
    frame: &mut Frame,
    area: Rect,
    matchups: &[Matchup],
    selected_idx: usize,
    empty_message: &str,
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = matchup_columns();
    render_matchup_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if matchups.is_empty() {
        let empty = Paragraph::new(empty_message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    const ROW_HEIGHT: u16 = 3;
    if list_area.height < ROW_HEIGHT {
        return;
    }
    let visible = (list_area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(selected_idx, matchups.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * ROW_HEIGHT,
            width: list_area.width,
            height: ROW_HEIGHT,
        };

        let selected = idx == selected_idx;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let matchup = &matchups[idx];
        let outcome = display::outcome(matchup);

        let avatar_a =
            display::resolve_avatar(matchup.image_a.as_deref(), matchup.fighter_a.as_deref());
        let avatar_b =
            display::resolve_avatar(matchup.image_b.as_deref(), matchup.fighter_b.as_deref());
        let name_a = matchup.fighter_a.as_deref().unwrap_or("-");
        let name_b = matchup.fighter_b.as_deref().unwrap_or("-");

        let winner_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
        let style_a = if outcome == MatchupOutcome::FighterA {
            row_style.patch(winner_style)
        } else {
            row_style
        };
        let style_b = if outcome == MatchupOutcome::FighterB {
            row_style.patch(winner_style)
        } else {
            row_style
        };

        let result_suffix = match matchup.result.as_deref() {
            Some(result) if !result.is_empty() => format!(" ({result})"),
            _ => String::new(),
        };
        let corner_a = if outcome == MatchupOutcome::FighterA {
            format!("{} {name_a}{result_suffix}", avatar_tag(&avatar_a))
        } else {
            format!("{} {name_a}", avatar_tag(&avatar_a))
        };
        let corner_b = if outcome == MatchupOutcome::FighterB {
            format!("{} {name_b}{result_suffix}", avatar_tag(&avatar_b))
        } else {
            format!("{} {name_b}", avatar_tag(&avatar_b))
        };

        render_cell_text(frame, cols[0], &corner_a, style_a);

        let versus = match outcome {
            MatchupOutcome::Draw => "vs  (Empate)".to_string(),
            _ => "vs".to_string(),
        };
        let schedule = display::format_schedule(matchup.scheduled_at.as_deref());
        let venue = match matchup.venue.as_deref() {
            Some(venue) if !venue.is_empty() => format!("@ {venue}"),
            _ => String::new(),
        };
        render_cell_lines(
            frame,
            cols[1],
            &[(versus, row_style), (schedule, row_style), (venue, row_style)],
        );

        render_cell_text(frame, cols[2], &corner_b, style_b);
    }
}

fn render_consult_hint(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new("Press / to type a term, then Enter (or s) to consult the portal")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, area);
}

fn fighter_columns() -> [Constraint; 4] {
    [
        Constraint::Length(8),
        Constraint::Min(24),
        Constraint::Length(14),
        Constraint::Length(20),
    ]
}

fn matchup_columns() -> [Constraint; 3] {
    [
        Constraint::Min(24),
        Constraint::Length(22),
        Constraint::Min(24),
    ]
}

fn render_fighter_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "", style);
    render_cell_text(frame, cols[1], "Fighter / Team", style);
    render_cell_text(frame, cols[2], "Record", style);
    render_cell_text(frame, cols[3], "Discipline / Weight", style);
}

fn render_matchup_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Red corner", style);
    render_cell_text(frame, cols[1], "Schedule", style);
    render_cell_text(frame, cols[2], "Blue corner", style);
}

fn avatar_tag(avatar: &Avatar) -> String {
    match avatar {
        Avatar::Photo(_) => "[IMG]".to_string(),
        Avatar::Badge(initials) => format!("({initials})"),
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_cell_lines(frame: &mut Frame, area: Rect, lines: &[(String, Style)]) {
    for (i, (line, style)) in lines.iter().enumerate() {
        if (i as u16) >= area.height {
            break;
        }
        let line_area = Rect {
            x: area.x,
            y: area.y + i as u16,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(line.as_str()).style(*style), line_area);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SGL Terminal - Help",
        "",
        "Global:",
        "  1 / 2 / 3    Today / Fighters / Matchups",
        "  /            Edit the search term",
        "  s            Consult the portal with the current term",
        "  j/k or ↑/↓   Move selection",
        "  o / p        Open left / right fighter image",
        "  r            Reload today's card (Today tab)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Search:",
        "  Typing narrows the last consulted results by name.",
        "  Enter sends the term to the portal; Esc leaves the box.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn render_image_overlay(frame: &mut Frame, area: Rect, url: &str) {
    let popup_area = centered_rect(70, 40, area);
    frame.render_widget(Clear, popup_area);

    let text = format!("{url}\n\nAny key closes");
    let overlay = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Image (full size)").borders(Borders::ALL));
    frame.render_widget(overlay, popup_area);
}

fn render_notice_overlay(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let text = format!("{message}\n\nEnter/Esc  Dismiss");
    let overlay = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("Notice").borders(Borders::ALL));
    frame.render_widget(overlay, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
