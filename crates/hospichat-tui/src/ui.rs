use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use hospichat_core::{Message, EXAMPLE_QUESTIONS};
use unicode_width::UnicodeWidthChar;
use crate::app::App;

const TITLE: &str = " Assistant Hospitalier ";
const PLACEHOLDER: &str = "Posez votre question...";
const EXAMPLES_HEADER: &str = " Exemples de questions : ";
const STAR: &str = "★ ";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let examples_height = if app.state.shows_examples() {
        EXAMPLE_QUESTIONS.len() as u16 + 2
    } else {
        0
    };

    // Main layout: header, chat, examples (first turn only), input, footer
    let [header_area, chat_area, examples_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(examples_height),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    if examples_height > 0 {
        render_examples(app, frame, examples_area);
    }
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::White).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Cyan));
    frame.render_widget(header, area);
}

/// Lines for one message. User turns sit on the right, replies on the left.
fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    if msg.is_user {
        lines.push(
            Line::from(Span::styled(
                "Vous",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right),
        );
        for line in msg.text.lines() {
            lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        if !msg.text.is_empty() {
            lines.push(Line::from(msg.text.clone()));
        }
        if msg.has_items() {
            for item in msg.items.iter().flatten() {
                lines.push(Line::from(vec![
                    Span::styled(STAR, Style::default().fg(Color::Yellow)),
                    Span::styled(item.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]));
            }
        }
    }

    lines.push(Line::default());
    lines
}

/// Rows `text` fills once word-wrapped to `width`, the same way the chat paragraph wraps
fn wrapped_rows(text: &Text, width: u16) -> usize {
    Paragraph::new(text.clone())
        .wrap(Wrap { trim: true })
        .line_count(width)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and paging
    app.chat_area = Some(area);
    let inner_width = area.width.saturating_sub(2);
    app.chat_height = area.height.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", app.client.endpoint()));

    let conversation = app.state.conversation();
    let chat_text = if conversation.is_empty() && !app.state.is_pending() {
        app.chat_scroll = 0;
        app.max_chat_scroll = 0;
        Text::from(Span::styled(
            "Bonjour, je suis votre assistant hospitalier.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = conversation.iter().flat_map(message_lines).collect();

        if app.state.is_pending() {
            lines.push(Line::from(Span::styled(
                "Assistant:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                dots,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        let text = Text::from(lines);

        // Paragraph adds the viewport height to the scroll offset, so keep the sum in u16
        let scroll_limit = u16::MAX - area.height;
        let rows = wrapped_rows(&text, inner_width);
        app.max_chat_scroll = rows
            .saturating_sub(app.chat_height as usize)
            .min(scroll_limit as usize) as u16;
        if app.follow_bottom {
            app.chat_scroll = app.max_chat_scroll;
        } else {
            app.chat_scroll = app.chat_scroll.min(app.max_chat_scroll);
        }

        text
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_examples(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(EXAMPLES_HEADER);

    let items: Vec<ListItem> = EXAMPLE_QUESTIONS
        .iter()
        .map(|question| {
            ListItem::new(Line::from(vec![
                Span::styled(STAR, Style::default().fg(Color::Yellow)),
                Span::styled(*question, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.example_state);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.state.is_pending() { Color::DarkGray } else { Color::Yellow };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    // Visible portion of the input, scrolled horizontally by display columns
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = visible_input(app.state.input(), app.state.cursor(), inner_width);

    let input = if app.state.input().is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(input_block), area);

    frame.set_cursor_position((area.x + cursor_x as u16 + 1, area.y + 1));
}

/// Slice of `input` that fits in `width` columns with the cursor (a char index)
/// kept in view. Returns the slice and the cursor's column within it.
fn visible_input(input: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let char_width = |c: char| c.width().unwrap_or(0);
    let cursor_col: usize = input.chars().take(cursor).map(char_width).sum();

    // Drop leading chars until the cursor column fits inside the box
    let mut skipped_cols = 0;
    let mut skipped_chars = 0;
    for c in input.chars() {
        if cursor_col - skipped_cols < width {
            break;
        }
        skipped_cols += char_width(c);
        skipped_chars += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for c in input.chars().skip(skipped_chars) {
        let w = char_width(c);
        if used + w > width {
            break;
        }
        visible.push(c);
        used += w;
    }

    (visible, cursor_col - skipped_cols)
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // A surfaced error takes the whole status line until dismissed
    if let Some(notice) = app.state.notice() {
        let line = Line::from(vec![
            Span::styled(" ! ", Style::default().bg(Color::Red).fg(Color::White).bold()),
            Span::styled(format!(" {} ", notice), Style::default().fg(Color::Red)),
            Span::styled(" Esc ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" dismiss "),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
    ];
    if app.state.shows_examples() {
        hints.extend(vec![
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" examples ", label_style),
        ]);
    } else {
        hints.extend(vec![
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
        ]);
    }
    hints.extend(vec![
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);
    if app.state.is_pending() {
        hints.push(Span::styled(" waiting for reply ", Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospichat_core::{Action, ChatClient, ErrorPolicy, ExchangeError};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                screen.push_str(cell.symbol());
            }
            screen.push('\n');
        }
        screen
    }

    fn app(policy: ErrorPolicy) -> App {
        App::new(ChatClient::new("http://localhost:8000"), policy)
    }

    #[test]
    fn test_empty_conversation_shows_examples() {
        let mut app = app(ErrorPolicy::Silent);
        let screen = draw(&mut app);
        assert!(screen.contains("Assistant Hospitalier"));
        assert!(screen.contains("Exemples de questions"));
        assert!(screen.contains("Quels médecins sont disponibles?"));
        assert!(screen.contains(PLACEHOLDER));
    }

    #[test]
    fn test_reply_items_render_as_starred_list() {
        let mut app = app(ErrorPolicy::Silent);
        app.dispatch(Action::SetInput("Hôpitaux?".to_string()));
        app.dispatch(Action::Submit);
        app.dispatch(Action::Settled(Ok("Voici:\n*Hôpital A\n*Hôpital B".to_string())));

        let screen = draw(&mut app);
        assert!(!screen.contains("Exemples de questions"));
        assert!(screen.contains("Voici:"));
        assert!(screen.contains("Hôpital A"));
        assert!(screen.contains("Hôpital B"));
        assert!(screen.contains('★'));
    }

    #[test]
    fn test_pending_shows_ellipsis() {
        let mut app = app(ErrorPolicy::Silent);
        app.dispatch(Action::SetInput("Bonjour".to_string()));
        app.dispatch(Action::Submit);

        let screen = draw(&mut app);
        assert!(screen.contains("waiting for reply"));
        assert!(screen.contains("Vous"));
    }

    #[test]
    fn test_surfaced_notice_in_footer() {
        let mut app = app(ErrorPolicy::Surfaced);
        app.dispatch(Action::SetInput("Bonjour".to_string()));
        app.dispatch(Action::Submit);
        app.dispatch(Action::Settled(Err(ExchangeError::Transport("refused".to_string()))));

        let screen = draw(&mut app);
        assert!(screen.contains("Failed to reach the assistant: refused"));
    }

    #[test]
    fn test_long_reply_scrolls_to_last_item() {
        let mut app = app(ErrorPolicy::Silent);
        app.dispatch(Action::SetInput("Bonjour".to_string()));
        app.dispatch(Action::Submit);
        let words = vec!["x".repeat(40); 30].join(" ");
        app.dispatch(Action::Settled(Ok(format!("{}\n*DERNIER", words))));

        let screen = draw(&mut app);
        assert!(app.follow_bottom);
        assert!(screen.contains("DERNIER"));
    }

    #[test]
    fn test_huge_reply_does_not_overflow_scroll() {
        let mut app = app(ErrorPolicy::Silent);
        app.dispatch(Action::SetInput("Bonjour".to_string()));
        app.dispatch(Action::Submit);
        app.dispatch(Action::Settled(Ok(vec!["*x"; 70_000].join("\n"))));

        draw(&mut app);
        assert!(app.max_chat_scroll > 60_000);
        assert_eq!(app.chat_scroll, app.max_chat_scroll);
    }

    #[test]
    fn test_wrapped_rows_counts_word_wrap() {
        // Two 6-char words don't share a 10-column row
        let text = Text::from("abcdef abcdef");
        assert_eq!(wrapped_rows(&text, 10), 2);
        assert_eq!(wrapped_rows(&Text::from(Line::default()), 10), 1);
    }

    #[test]
    fn test_visible_input_ascii() {
        assert_eq!(visible_input("bonjour", 7, 20), ("bonjour".to_string(), 7));
        // Cursor past the box: the head scrolls off
        assert_eq!(visible_input("abcdefgh", 8, 5), ("efgh".to_string(), 4));
    }

    #[test]
    fn test_visible_input_wide_chars() {
        // Each ideograph takes two columns
        assert_eq!(visible_input("医院", 2, 20), ("医院".to_string(), 4));
        assert_eq!(visible_input("医院医院", 4, 5), ("医院".to_string(), 4));
        assert_eq!(visible_input("a医院", 3, 4), ("院".to_string(), 2));
    }
}
