pub mod app;
pub mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;

use crate::store::Store;
use app::{App, InputField, InputMode};
use ui::ui;

pub fn run_tui(store: Store) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "tui loop failed");
    }
    res.map_err(Into::into)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => {
                    app.message = None;
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Tab | KeyCode::Char('l') => app.next_view(),
                        KeyCode::BackTab | KeyCode::Char('h') => app.previous_view(),
                        KeyCode::Char(c @ '1'..='7') => app.jump_to_view(c as usize - '0' as usize),
                        KeyCode::Char('J') => app.move_selected(true),
                        KeyCode::Char('K') => app.move_selected(false),
                        KeyCode::Char(' ') => app.toggle_complete_selected(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('r') => app.restore_selected(),
                        KeyCode::Char('s') => app.cycle_status(),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('e') => app.start_edit(InputField::Title),
                        KeyCode::Char('n') => app.start_edit(InputField::Notes),
                        KeyCode::Char('w') => app.start_edit(InputField::When),
                        KeyCode::Char('D') => app.start_edit(InputField::Deadline),
                        KeyCode::Char('/') => app.start_search(),
                        KeyCode::Char('X') => app.empty_trash(),
                        KeyCode::Char('b') => app.toggle_sidebar(),
                        _ => {}
                    }
                }
                InputMode::Editing | InputMode::Adding | InputMode::Searching => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                },
            }
        }
    }
}
