use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::ChatReply;
use crate::constants::{EXCHANGE_CHANNEL_CAPACITY, UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES};
use crate::tui::render::render_ui;
use crate::tui::App;
use crate::utils::{CureLinkError, ExchangeError};

type ExchangeResult = Result<ChatReply, ExchangeError>;

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ CureLink chat requires an interactive terminal.");
        eprintln!("   Use --prompt for pipes and scripts.");
        return Err(CureLinkError::UIError("No interactive terminal available".to_string()).into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Exchange results come back to this loop, which owns the conversation
    let (tx, mut rx) = mpsc::channel::<ExchangeResult>(EXCHANGE_CHANNEL_CAPACITY);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<ExchangeResult>,
    rx: &mut mpsc::Receiver<ExchangeResult>,
) -> Result<()> {
    while app.running {
        app.follow_new_entries();
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code, key.modifiers, &tx);
                }
            }
        }

        // Apply any finished exchange
        while let Ok(result) = rx.try_recv() {
            app.controller.finish_turn(result);
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    tx: &mpsc::Sender<ExchangeResult>,
) {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => submit(app, tx),
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(UI_SCROLL_LINES * 5),
        KeyCode::PageDown => app.scroll_down(UI_SCROLL_LINES * 5),
        _ => {}
    }
}

/// Start a turn from the input buffer and hand the exchange to a task
fn submit(app: &mut App, tx: &mpsc::Sender<ExchangeResult>) {
    let Some(request) = app.controller.begin_turn(&app.input) else {
        return;
    };
    app.input.clear();

    let exchange = app.controller.spawn_exchange(request);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = exchange.await;
        if tx.send(result).await.is_err() {
            debug!("UI closed before the exchange finished");
        }
    });
}
