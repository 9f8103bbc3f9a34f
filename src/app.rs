use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crate::widget::Calendar;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use hilal::calendar::{CalendarEngine, SelectionState, YearMonth};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration};

#[derive(Debug)]
pub(crate) struct App {
    engine: CalendarEngine,
    today: Date,
    cursor: Date,
    state: AppState,
}

impl App {
    /// The cursor starts on the first day of the displayed month if that
    /// month does not contain today
    pub(crate) fn new(engine: CalendarEngine, today: Date) -> App {
        let shown = engine.displayed_month();
        let cursor = if shown.contains(today) {
            today
        } else {
            shown.first_day()
        };
        App {
            engine,
            today,
            cursor,
            state: AppState::Calendar,
        }
    }

    /// Run the event loop until the user quits, returning the final selection
    pub(crate) fn run<B: Backend>(
        mut self,
        mut terminal: Terminal<B>,
    ) -> io::Result<SelectionState> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.engine.selection())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => {
                // Arabic calendars run right to left, so horizontal movement
                // is mirrored
                let rightwards = if self.engine.display_locale().is_rtl() {
                    -1
                } else {
                    1
                };
                match key {
                    KeyCode::Char('h') | KeyCode::Left => self.move_days(-rightwards),
                    KeyCode::Char('l') | KeyCode::Right => self.move_days(rightwards),
                    KeyCode::Char('k') | KeyCode::Up => self.move_days(-7),
                    KeyCode::Char('j') | KeyCode::Down => self.move_days(7),
                    KeyCode::Char('p') | KeyCode::PageUp => self.previous_month(),
                    KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
                    KeyCode::Char('0') | KeyCode::Home => {
                        self.reset();
                        true
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => self.engine.click(self.cursor).is_some(),
                    KeyCode::Char('c') => {
                        self.engine
                            .set_selection(SelectionState::idle(self.engine.mode()));
                        true
                    }
                    KeyCode::Char('g') => {
                        self.state = AppState::Jumping(JumpToState::new());
                        true
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.state = AppState::Quitting;
                        true
                    }
                    KeyCode::Char('?') => {
                        self.state = AppState::Helping;
                        true
                    }
                    _ => false,
                }
            }
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char(ch) => JumpToInput::from_char(ch)
                            .map_or(JumpToOutput::Invalid, |input| state.handle_input(input)),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.jump_to(date)
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_days(&mut self, days: i64) -> bool {
        self.cursor
            .checked_add(Duration::days(days))
            .is_some_and(|date| self.jump_to(date))
    }

    fn next_month(&mut self) -> bool {
        if self.engine.next_month().is_err() {
            return false;
        }
        self.follow_month();
        true
    }

    fn previous_month(&mut self) -> bool {
        if self.engine.previous_month().is_err() {
            return false;
        }
        self.follow_month();
        true
    }

    /// Keep the cursor on the same day of the month after the displayed
    /// month changes, clamped to the month's length
    fn follow_month(&mut self) {
        let shown = self.engine.displayed_month();
        let day = self.cursor.day().min(shown.length());
        self.cursor = shown
            .first_day()
            .replace_day(day)
            .unwrap_or_else(|_| shown.first_day());
    }

    fn reset(&mut self) {
        self.cursor = self.today;
        self.engine.go_to_today(self.today);
    }

    /// Put the cursor on `date`, showing its month.  Returns `false` for
    /// dates in months that cannot be displayed.
    fn jump_to(&mut self, date: Date) -> bool {
        if !YearMonth::from_date(date).contains(date) {
            return false;
        }
        self.cursor = date;
        self.engine.jump_to(date);
        true
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let view = self.engine.month_view(self.today);
        Calendar::new(
            &view,
            self.engine.selection(),
            self.cursor,
            self.engine.display_locale(),
        )
        .render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
