use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::markdown::parse_markdown;
use crate::constants::UI_INPUT_PLACEHOLDER;
use crate::session::{Message, MessageRole};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Chat
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_chat(frame, chunks[1], app);
    render_input(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let dot_color = if app.is_sending() {
        Color::Yellow
    } else {
        Color::Green
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(
            app.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Lines for one conversation entry.
///
/// Assistant text goes through the markdown renderer. User text is shown
/// literally so nothing a person types is read as formatting.
fn message_lines(message: &Message, show_timestamps: bool) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        MessageRole::User => ("[You]", Color::Green),
        MessageRole::Assistant => ("[CureLink]", Color::Cyan),
    };

    let mut heading = vec![Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if show_timestamps {
        heading.push(Span::styled(
            format!(" {}", message.timestamp.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(heading)];
    match message.role {
        MessageRole::Assistant => lines.extend(parse_markdown(&message.content)),
        MessageRole::User => lines.extend(
            message
                .content
                .lines()
                .map(|line| Line::from(Span::raw(line.to_string()))),
        ),
    }
    lines.push(Line::default());
    lines
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = app
        .controller
        .messages()
        .iter()
        .flat_map(|message| message_lines(message, app.show_timestamps))
        .collect();

    if app.is_sending() {
        lines.push(Line::from(Span::styled(
            "● ● ●",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let chat = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Keep the newest entry in view unless the user scrolled up. The bottom
    // is measured in wrapped rows, not logical lines.
    let total = u16::try_from(chat.line_count(inner.width)).unwrap_or(u16::MAX);
    let bottom = total.saturating_sub(inner.height);
    let scroll = bottom.saturating_sub(app.scroll_offset);

    let chat = chat.block(block).scroll((scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if app.is_sending() {
        ("Sending...".to_string(), Style::default().fg(Color::DarkGray))
    } else if app.input.is_empty() {
        (
            UI_INPUT_PLACEHOLDER.to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (app.input.clone(), Style::default())
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(input, area);

    if !app.is_sending() {
        let cursor_x = area.x + 1 + u16::try_from(app.input.chars().count()).unwrap_or(0);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let session = match app.controller.session_token() {
        Some(token) => format!("session {}", token),
        None => "new session".to_string(),
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", app.endpoint), Style::default().fg(Color::Gray)),
        Span::raw("| "),
        Span::styled(session, Style::default().fg(Color::Yellow)),
        Span::raw(" | Enter: send  PgUp/PgDn: scroll  Esc: quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UIConfig;
    use crate::client::{ChatReply, MockRequestCoordinator};
    use crate::session::ConversationController;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_user_text_is_literal() {
        let message = Message::user("**urgent** [click](http://x)");
        let lines = message_lines(&message, false);
        assert_eq!(text(&lines), vec!["[You]", "**urgent** [click](http://x)", ""]);
    }

    #[test]
    fn test_assistant_text_is_formatted() {
        let message = Message::assistant("**urgent** care");
        let lines = message_lines(&message, false);
        assert_eq!(text(&lines), vec!["[CureLink]", "urgent care", ""]);
        assert!(lines[1].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_timestamp_label() {
        let message = Message::user("hi");
        let lines = message_lines(&message, true);
        let heading: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(heading.starts_with("[You] "));
        assert_eq!(heading.len(), "[You] 00:00".len());
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render_ui(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_reply(reply: &str) -> App {
        let mut controller =
            ConversationController::new(Arc::new(MockRequestCoordinator::new()));
        controller.begin_turn("I have a headache").unwrap();
        controller.finish_turn(Ok(ChatReply {
            response_text: reply.to_string(),
            new_session_token: Some("abc123".to_string()),
        }));
        App::new(controller, &UIConfig::default(), "http://localhost:8000/api/chat")
    }

    #[test]
    fn test_wrapped_reply_tail_is_on_screen() {
        let reply = format!("{}ENDMARK", "word ".repeat(200));
        let mut app = app_with_reply(&reply);

        assert!(screen(&app, 40, 20).contains("ENDMARK"));

        // Scrolling back up moves the tail out of view, scrolling down returns it
        app.scroll_up(10);
        assert!(!screen(&app, 40, 20).contains("ENDMARK"));
        app.scroll_down(10);
        assert!(screen(&app, 40, 20).contains("ENDMARK"));
    }
}
