//! Full-screen terminal menus: a list of options picked with the arrow keys, a number entry
//! field and a status screen.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use ratatui::{
    DefaultTerminal,
    prelude::*,
    widgets::{Block, Borders, List, ListState, Paragraph},
};
use siren_player::StopHandle;
use std::{ops::RangeInclusive, time::Duration};

/// How long to wait for a key before checking for a shutdown request.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Parse a number typed at a prompt. The error says why it was rejected.
pub fn parse_number(s: &str, range: &RangeInclusive<f64>) -> Result<f64, String> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{:?} is not a number", s.trim()))?;
    if !value.is_finite() {
        return Err(format!("{} is not a finite number", value));
    }
    if value < 0.0 {
        return Err("negative numbers are not allowed".to_string());
    }
    if value < *range.start() {
        return Err(format!("the minimum is {}", range.start()));
    }
    if value > *range.end() {
        return Err(format!("the maximum is {}", range.end()));
    }
    Ok(value)
}

/// What a key press did to a prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<T> {
    Continue,
    Done(T),
    Quit,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

/// Cursor over a list of options. Esc picks the first option, which is how every menu here
/// is left.
#[derive(Debug, Clone)]
pub struct OptionList {
    len: usize,
    state: ListState,
}

impl OptionList {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    fn select(&mut self, index: usize) {
        self.state.select(Some(index));
    }

    pub fn handle(&mut self, key: KeyEvent) -> Step<usize> {
        if is_interrupt(&key) {
            return Step::Quit;
        }
        if self.len == 0 {
            return Step::Continue;
        }
        let last = self.len - 1;
        match key.code {
            KeyCode::Up => self.select(self.selected().checked_sub(1).unwrap_or(last)),
            KeyCode::Down => {
                self.select(if self.selected() >= last { 0 } else { self.selected() + 1 })
            }
            KeyCode::Home | KeyCode::PageUp => self.select(0),
            KeyCode::End | KeyCode::PageDown => self.select(last),
            KeyCode::Enter => return Step::Done(self.selected()),
            KeyCode::Esc => return Step::Done(0),
            _ => (),
        }
        Step::Continue
    }
}

/// Text typed into a number prompt, with the reason the last entry was rejected.
#[derive(Debug, Clone)]
pub struct NumberField {
    range: RangeInclusive<f64>,
    text: String,
    error: Option<String>,
}

impl NumberField {
    pub fn new(range: RangeInclusive<f64>) -> Self {
        Self {
            range,
            text: String::new(),
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle(&mut self, key: KeyEvent) -> Step<f64> {
        if is_interrupt(&key) {
            return Step::Quit;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.text.push(c)
            }
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Enter => match parse_number(&self.text, &self.range) {
                Ok(value) => return Step::Done(value),
                Err(reason) => {
                    self.error = Some(format!("Invalid input: {}", reason));
                    self.text.clear();
                }
            },
            _ => (),
        }
        Step::Continue
    }
}

/// Owns the terminal for as long as it exists. Every prompt returns `None` if the user
/// presses Ctrl-C or the stop handle is triggered, so callers can unwind normally.
pub struct Menu {
    terminal: DefaultTerminal,
    stop: StopHandle,
}

impl Menu {
    pub fn new(stop: StopHandle) -> anyhow::Result<Self> {
        let terminal = ratatui::try_init()?;
        terminal::disable_raw_mode()?;
        Ok(Self { terminal, stop })
    }

    /// Block until a key is pressed, checking for shutdown in between.
    fn next_key(&mut self) -> anyhow::Result<Option<KeyEvent>> {
        loop {
            if self.stop.is_stopped() {
                return Ok(None);
            }
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(Some(key));
                    }
                }
            }
        }
    }

    /// Run a prompt until it finishes. Raw mode is only on while keys are being read, so
    /// Ctrl-C during playback still raises an interrupt.
    fn prompt<T>(
        &mut self,
        mut handle: impl FnMut(KeyEvent) -> Step<T>,
        mut draw: impl FnMut(&mut Frame),
    ) -> anyhow::Result<Option<T>> {
        terminal::enable_raw_mode()?;
        let result = loop {
            self.terminal.draw(&mut draw)?;
            let Some(key) = self.next_key()? else {
                break None;
            };
            match handle(key) {
                Step::Continue => (),
                Step::Done(value) => break Some(value),
                Step::Quit => {
                    log::info!("quit from menu");
                    break None;
                }
            }
        };
        terminal::disable_raw_mode()?;
        Ok(result)
    }

    /// Show a list of options and return the index of the chosen one.
    pub fn choose(
        &mut self,
        title: &str,
        options: &[&str],
    ) -> anyhow::Result<Option<usize>> {
        let list = std::cell::RefCell::new(OptionList::new(options.len()));
        self.prompt(
            |key| list.borrow_mut().handle(key),
            |frame| {
                let layout = Layout::vertical([Constraint::Min(3), Constraint::Length(3)])
                    .split(frame.area());
                let items = List::new(options.iter().copied())
                    .block(Block::default().borders(Borders::ALL).title(title))
                    .highlight_style(Style::default().reversed())
                    .highlight_symbol("> ");
                frame.render_stateful_widget(items, layout[0], &mut list.borrow_mut().state);
                let help = Paragraph::new("[↑/↓] Move  [Enter] Select  [Esc] Back")
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(help, layout[1]);
            },
        )
    }

    /// Ask for a non-negative number, possibly with decimals, within `range`.
    pub fn numeric_input(
        &mut self,
        message: &str,
        range: RangeInclusive<f64>,
    ) -> anyhow::Result<Option<f64>> {
        let field = std::cell::RefCell::new(NumberField::new(range));
        self.prompt(
            |key| field.borrow_mut().handle(key),
            |frame| {
                let field = field.borrow();
                let layout = Layout::vertical([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ])
                .split(frame.area());
                let input = Paragraph::new(format!("{}_", field.text()))
                    .block(Block::default().borders(Borders::ALL).title(message));
                frame.render_widget(input, layout[0]);
                if let Some(error) = field.error() {
                    let error = Paragraph::new(error)
                        .style(Style::default().red())
                        .block(Block::default().borders(Borders::ALL));
                    frame.render_widget(error, layout[1]);
                }
            },
        )
    }

    pub fn display(&mut self, message: &str) -> anyhow::Result<()> {
        self.terminal.draw(|frame| {
            let status = Paragraph::new(message)
                .bold()
                .block(Block::default().borders(Borders::ALL).title("siren"));
            frame.render_widget(status, frame.area());
        })?;
        Ok(())
    }
}

impl Drop for Menu {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    #[test]
    fn numbers() {
        let range = 0.1..=600.0;
        assert_eq!(parse_number("2.5\n", &range), Ok(2.5));
        assert_eq!(parse_number("0.1", &range), Ok(0.1));
        assert_eq!(parse_number("600", &range), Ok(600.0));
        assert!(parse_number("0.05", &range).is_err());
        assert!(parse_number("600.5", &range).is_err());
        assert!(parse_number("-3", &range).is_err());
        assert!(parse_number("ten", &range).is_err());
        assert!(parse_number("inf", &range).is_err());
    }

    #[test]
    fn option_list_wraps_around() {
        let mut list = OptionList::new(3);
        assert_eq!(list.handle(press(KeyCode::Up)), Step::Continue);
        assert_eq!(list.selected(), 2);
        list.handle(press(KeyCode::Down));
        assert_eq!(list.selected(), 0);
        list.handle(press(KeyCode::Down));
        assert_eq!(list.handle(press(KeyCode::Enter)), Step::Done(1));
    }

    #[test]
    fn option_list_escape_picks_first_option() {
        let mut list = OptionList::new(4);
        list.handle(press(KeyCode::End));
        assert_eq!(list.selected(), 3);
        assert_eq!(list.handle(press(KeyCode::Esc)), Step::Done(0));
    }

    #[test]
    fn ctrl_c_quits_every_prompt() {
        assert_eq!(OptionList::new(2).handle(ctrl_c()), Step::Quit);
        assert_eq!(NumberField::new(0.1..=600.0).handle(ctrl_c()), Step::Quit);
        // a plain 'c' is just a key
        assert_eq!(
            OptionList::new(2).handle(press(KeyCode::Char('c'))),
            Step::Continue
        );
    }

    #[test]
    fn number_field_reprompts_until_valid() {
        let mut field = NumberField::new(0.1..=600.0);
        for c in "0.05x".chars() {
            assert_eq!(field.handle(press(KeyCode::Char(c))), Step::Continue);
        }
        assert_eq!(field.text(), "0.05");
        assert_eq!(field.handle(press(KeyCode::Enter)), Step::Continue);
        assert_eq!(field.error(), Some("Invalid input: the minimum is 0.1"));
        assert_eq!(field.text(), "");
        for c in "1.255".chars() {
            field.handle(press(KeyCode::Char(c)));
        }
        field.handle(press(KeyCode::Backspace));
        assert_eq!(field.handle(press(KeyCode::Enter)), Step::Done(1.25));
    }
}
