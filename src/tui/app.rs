//! Main application logic for the terminal chat interface.
//!
//! This module contains the `ChatApp` struct which owns the dialog engine for
//! the session, turns key presses into submissions, and renders the
//! conversation, the quick-action bar, the input box and the status bar.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::dialog::{engine::DialogEngine, flow::Intent};
use crate::message::{Message, Role};
use crate::tui::{
    colors::{intent_color, ASSISTANT, BUTTON_FOCUS, MUTED, USER},
    enums::{Focus, Overlay},
    input::InputField,
    utils::{centered_rect, display_width, wrap_text},
};

/// Lines moved per PageUp/PageDown.
const SCROLL_STEP: usize = 5;

/// Terminal front-end for one chat session.
pub struct ChatApp {
    engine: DialogEngine,
    input: InputField,
    focus: Focus,
    overlay: Overlay,
    selected_button: usize,
    scroll_back: usize,
    status_message: String,
}

impl ChatApp {
    pub fn new(engine: DialogEngine) -> Self {
        Self {
            engine,
            input: InputField::new(),
            focus: Focus::Input,
            overlay: Overlay::None,
            selected_button: 0,
            scroll_back: 0,
            status_message: String::new(),
        }
    }

    pub fn engine(&self) -> &DialogEngine {
        &self.engine
    }

    /// Send text to the engine and snap the view back to the newest message.
    fn submit(&mut self, text: &str) {
        self.engine.submit(text);
        self.scroll_back = 0;
        self.selected_button = 0;
        if self.engine.buttons().is_empty() {
            self.focus = Focus::Input;
        }
    }

    /// Tap the quick action at `index`, as if its value had been typed.
    fn press_button(&mut self, index: usize) {
        match self.engine.buttons().get(index) {
            Some(button) => {
                let value = button.value.clone();
                self.submit(&value);
            }
            None => self.set_status_message(format!("No quick action F{}", index + 1)),
        }
    }

    /// Set a status message
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Clear the status message
    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Handle keyboard input; returns true when the user asked to quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.overlay == Overlay::Help {
            self.overlay = Overlay::None;
            return false;
        }

        self.clear_status_message();

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => return true,
            KeyCode::F(n) if (1..=9).contains(&n) => self.press_button(usize::from(n - 1)),
            KeyCode::Tab | KeyCode::BackTab => {
                if self.engine.buttons().is_empty() {
                    self.focus = Focus::Input;
                    self.set_status_message("No quick actions right now".to_string());
                } else {
                    self.focus = self.focus.toggled();
                }
            }
            KeyCode::PageUp => self.scroll_back += SCROLL_STEP,
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP),
            _ => match self.focus {
                Focus::Input => self.handle_input_key(key),
                Focus::Buttons => self.handle_button_key(key),
            },
        }
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = self.input.take();
                self.submit(&text);
            }
            KeyCode::Char('?') if self.input.is_empty() => self.overlay = Overlay::Help,
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    fn handle_button_key(&mut self, key: KeyEvent) {
        let count = self.engine.buttons().len();
        match key.code {
            KeyCode::Left => self.selected_button = self.selected_button.saturating_sub(1),
            KeyCode::Right => {
                if self.selected_button + 1 < count {
                    self.selected_button += 1;
                }
            }
            KeyCode::Enter => self.press_button(self.selected_button),
            // Typing while the bar is focused goes back to the input box.
            KeyCode::Char(c) => {
                self.focus = Focus::Input;
                self.input.handle_char(c);
            }
            _ => {}
        }
    }

    /// Render the conversation, newest message at the bottom.
    fn render_messages(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().title(" taskchat ").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let width = inner.width.saturating_sub(1) as usize;
        let visible = inner.height as usize;

        // Wrap from the newest message back, only as far as the view reaches.
        let needed = visible + self.scroll_back;
        let mut blocks: Vec<Vec<Line>> = Vec::new();
        let mut total = 0;
        for message in self.engine.messages().iter().rev() {
            if total >= needed {
                break;
            }
            let block = message_lines(message, width);
            total += block.len();
            blocks.push(block);
        }
        let lines: Vec<Line> = blocks.into_iter().rev().flatten().collect();

        let max_scroll = lines.len().saturating_sub(visible);
        self.scroll_back = self.scroll_back.min(max_scroll);
        let top = max_scroll - self.scroll_back;

        let shown: Vec<Line> = lines.into_iter().skip(top).take(visible).collect();
        f.render_widget(Paragraph::new(shown), inner);
    }

    /// Render the quick actions as a row of labelled keys.
    fn render_buttons(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Buttons;
        let block = Block::default()
            .title("Quick actions")
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(BUTTON_FOCUS)
            } else {
                Style::default()
            });

        let buttons = self.engine.buttons();
        let line = if buttons.is_empty() {
            Line::from(Span::styled(
                "Type your answer below",
                Style::default().fg(MUTED),
            ))
        } else {
            let mut spans = Vec::new();
            for (i, button) in buttons.iter().enumerate() {
                let style = if focused && i == self.selected_button {
                    Style::default().bg(BUTTON_FOCUS).fg(Color::Black)
                } else {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                };
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(format!(" F{} {} ", i + 1, button.label), style));
            }
            Line::from(spans)
        };

        f.render_widget(Paragraph::new(line).block(block), area);
    }

    /// Render the input box and place the terminal cursor in it.
    fn render_input(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Input;
        let block = Block::default()
            .title("Message")
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(BUTTON_FOCUS)
            } else {
                Style::default()
            });
        let inner = block.inner(area);
        f.render_widget(block, area);

        let width = inner.width.max(1) as usize;
        let chars: Vec<char> = self.input.value.chars().collect();

        // Scroll so the text left of the cursor fits, counted in columns.
        let mut offset = self.input.cursor;
        let mut cursor_col = 0;
        while offset > 0 {
            let w = display_width(chars[offset - 1].encode_utf8(&mut [0; 4]));
            if cursor_col + w >= width {
                break;
            }
            cursor_col += w;
            offset -= 1;
        }

        let mut shown = String::new();
        let mut used = 0;
        for &c in &chars[offset..] {
            let w = display_width(c.encode_utf8(&mut [0; 4]));
            if used + w > width {
                break;
            }
            shown.push(c);
            used += w;
        }
        f.render_widget(Paragraph::new(shown), inner);

        if focused && self.overlay == Overlay::None {
            f.set_cursor_position((inner.x + cursor_col as u16, inner.y));
        }
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let intent = self.engine.intent();
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let state = match intent {
                Intent::Idle => "Ready".to_string(),
                other => format!("{} (step {})", other, self.engine.step()),
            };
            format!(
                "{} | Tasks: {} | Enter: send  Tab: buttons  F1-F9: quick action  ?: help  Esc: quit",
                state,
                self.engine.tasks().len()
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(intent_color(intent)).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Render the key reference popup.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(Span::styled(
                "Chatting with your task assistant",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Ask to add, update, delete, or view tasks, then answer its questions."),
            Line::from(""),
            Line::from("Enter        Send message / press focused action"),
            Line::from("Tab          Switch between input and quick actions"),
            Line::from("F1-F9        Press a quick action"),
            Line::from("Left/Right   Move cursor or action focus"),
            Line::from("PgUp/PgDn    Scroll the conversation"),
            Line::from("Esc, Ctrl+C  Quit"),
            Line::from(""),
            Line::from("Press any key to close"),
        ];

        let paragraph = Paragraph::new(text)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Main render function.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Min(3),
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(f.area());

        self.render_messages(f, chunks[0]);
        self.render_buttons(f, chunks[1]);
        self.render_input(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        if self.overlay == Overlay::Help {
            self.render_help(f, chunks[0]);
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Header line, wrapped content and a blank separator for one message.
fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let (color, alignment) = match message.role {
        Role::Assistant => (ASSISTANT, Alignment::Left),
        Role::User => (USER, Alignment::Right),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            message.role.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", message.time_label()),
            Style::default().fg(MUTED),
        ),
    ])
    .alignment(alignment)];
    for text in wrap_text(&message.content, width) {
        lines.push(Line::from(text).alignment(alignment));
    }
    lines.push(Line::from(""));
    lines
}
