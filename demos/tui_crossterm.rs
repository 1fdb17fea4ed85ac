//! Terminal UI example using crossterm and ratatui.
//!
//! Drives a [`MemorySurface`] through the modal interpreter and renders the
//! document, the selection, the minibuffer and the status line.
//! Run with: cargo run --example tui_crossterm [FILE]

use crossterm::{
    event::{self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use vim_modal::{
    Engine, Event, InputEvent, KeyCode, KeyEvent, MemorySurface, MessageKind,
    Modifiers, Range, TextSurface,
};

const WELCOME: &str = "Welcome to vim_modal!\n\nPress 'i' to enter insert mode.\nPress 'Esc' to return to command mode.\nPress ':q<Enter>' to quit.\n\nTry vi commands like:\n- hjkl for movement\n- dd to delete a line\n- yy to yank (copy) a line\n- p to paste\n- / to search\n- v, V or Ctrl-v to select\n";

struct App {
    engine: Engine<MemorySurface>,
    selection: Vec<Range>,
    message: String,
    message_kind: MessageKind,
    status: String,
    should_quit: bool,
}

impl App {
    fn new(surface: MemorySurface) -> Self {
        let mut app = Self {
            engine: Engine::attach(surface),
            selection: Vec::new(),
            message: String::new(),
            message_kind: MessageKind::Info,
            status: String::new(),
            should_quit: false,
        };
        app.drain_events();
        app
    }

    fn handle_crossterm_event(&mut self, event: CKeyEvent, rows: usize) {
        if let Some(input) = convert_crossterm_event(event) {
            self.engine.handle_event(input);
        }
        self.drain_events();
        self.scroll_to_cursor(rows);
    }

    /// Keeps the cursor line inside a viewport of `rows` lines.
    fn scroll_to_cursor(&mut self, rows: usize) {
        let surface = self.engine.surface_mut();
        let line = surface.pos_to_line(surface.cursor());
        let first = surface.first_visible_line();
        if line < first {
            surface.scroll_to_line(line);
        } else if rows > 0 && line >= first + rows {
            surface.scroll_to_line(line + 1 - rows);
        }
    }

    fn drain_events(&mut self) {
        for event in self.engine.take_events() {
            match event {
                Event::CommandBuffer { text, kind } => {
                    self.message = text;
                    self.message_kind = kind;
                }
                Event::StatusData(status) => self.status = status,
                Event::ExtraInformation(info) => {
                    self.message = info.lines().collect::<Vec<_>>().join("  ");
                    self.message_kind = MessageKind::Info;
                }
                Event::SelectionChanged(ranges) => self.selection = ranges,
                Event::QuitRequested => self.should_quit = true,
            }
        }
    }

    fn selected(&self, pos: usize) -> bool {
        self.selection.iter().any(|r| r.start <= pos && pos < r.end)
    }
}

fn convert_crossterm_event(event: CKeyEvent) -> Option<InputEvent> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(InputEvent::Key(KeyEvent::with_mods(code, mods)))
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    let surface = app.engine.surface();
    let first = surface.first_visible_line();
    let height = chunks[0].height.saturating_sub(2) as usize;
    let highlight = Style::default().bg(Color::Blue);

    let mut lines = Vec::new();
    for line in first..(first + height).min(surface.line_count()) {
        let start = surface.line_to_pos(line);
        let text = surface.line_text(line);
        let spans: Vec<Span> = text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if app.selected(start + i) {
                    Span::styled(c.to_string(), highlight)
                } else {
                    Span::raw(c.to_string())
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let title = format!(
        "vim_modal demo  {}",
        surface.file_name().unwrap_or_else(|| "[No Name]".to_string())
    );
    let text = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(text, chunks[0]);

    let style = match app.message_kind {
        MessageKind::Error => Style::default().fg(Color::Red),
        MessageKind::Info => Style::default().add_modifier(Modifier::BOLD),
    };
    let status_line = Line::from(vec![
        Span::styled(app.message.clone(), style),
        Span::raw("  "),
        Span::raw(app.status.clone()),
    ]);
    let status = Paragraph::new(status_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    let cursor = surface.cursor();
    let line = surface.pos_to_line(cursor);
    let col = cursor - surface.line_to_pos(line);
    if line >= first {
        f.set_cursor(
            chunks[0].x + 1 + col as u16,
            chunks[0].y + 1 + (line - first) as u16,
        );
    }
}

fn main() -> Result<(), io::Error> {
    let surface = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).unwrap_or_default();
            MemorySurface::new(&text).with_file_name(path)
        }
        None => MemorySurface::new(WELCOME),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(surface);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let CEvent::Key(key) = event::read()? {
            // Borders, margin and the status box take eight rows.
            let rows = terminal.size()?.height.saturating_sub(8) as usize;
            app.handle_crossterm_event(key, rows);

            if app.should_quit {
                break;
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
