//! User prompting implementation
//!
//! On a terminal the prompts run in raw mode and react to single key presses.
//! When stdin is piped they fall back to reading whole lines, which keeps
//! workflows scriptable (`printf 'Ada\n' | cmdr run greet`).

use super::PromptOutcome;
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};

/// Trait for user prompting
#[async_trait]
pub trait UserPrompter: Send + Sync {
    /// Prompt for text input
    async fn prompt_text(
        &self,
        message: &str,
        help: Option<&str>,
    ) -> Result<PromptOutcome<String>>;

    /// Prompt for choice from list
    async fn prompt_choice(
        &self,
        message: &str,
        choices: &[String],
    ) -> Result<PromptOutcome<usize>>;

    /// Prompt for yes/no confirmation
    async fn prompt_yes_no(&self, message: &str) -> Result<PromptOutcome<bool>>;
}

/// Result of feeding one key press to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<T> {
    Continue,
    Submit(T),
    Cancel,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

/// Line being typed into an input prompt
#[derive(Debug, Default)]
pub struct LineInput {
    buffer: String,
}

impl LineInput {
    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<String> {
        if is_interrupt(&key) {
            return KeyOutcome::Cancel;
        }
        match key.code {
            KeyCode::Enter => KeyOutcome::Submit(std::mem::take(&mut self.buffer)),
            KeyCode::Esc => KeyOutcome::Cancel,
            KeyCode::Backspace => {
                self.buffer.pop();
                KeyOutcome::Continue
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.push(c);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }
}

/// Cursor over the options of a select prompt
#[derive(Debug)]
pub struct SelectCursor {
    position: usize,
    len: usize,
}

impl SelectCursor {
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<usize> {
        if is_interrupt(&key) {
            return KeyOutcome::Cancel;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.position = self.position.saturating_sub(1);
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.position + 1 < self.len {
                    self.position += 1;
                }
                KeyOutcome::Continue
            }
            KeyCode::Enter if self.len > 0 => KeyOutcome::Submit(self.position),
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Cancel,
            _ => KeyOutcome::Continue,
        }
    }
}

/// Map a key press of a yes/no prompt
pub fn confirm_key(key: KeyEvent) -> KeyOutcome<bool> {
    if is_interrupt(&key) {
        return KeyOutcome::Cancel;
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyOutcome::Submit(true),
        KeyCode::Char('n') | KeyCode::Char('N') => KeyOutcome::Submit(false),
        KeyCode::Esc => KeyOutcome::Cancel,
        _ => KeyOutcome::Continue,
    }
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Block until the next key press
fn next_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

/// Read up to and including the next `\n`, one byte at a time
///
/// Nothing past the newline is consumed, so whatever follows stays readable
/// by child processes that inherit the same stdin.
pub fn read_line_unbuffered(reader: &mut impl Read) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) if line.is_empty() => return Ok(None),
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Stdin without the process-wide `BufReader` that `io::stdin()` adds
#[cfg(unix)]
fn unbuffered_stdin() -> io::Result<File> {
    use std::os::fd::AsFd;
    Ok(File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

#[cfg(not(unix))]
fn unbuffered_stdin() -> io::Result<io::Stdin> {
    Ok(io::stdin())
}

/// Real implementation of user prompter
pub struct UserPrompterImpl;

impl Default for UserPrompterImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl UserPrompterImpl {
    pub fn new() -> Self {
        Self
    }

    fn is_interactive() -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }

    /// Read one line from stdin, `None` at end of input
    fn read_line() -> Result<Option<String>> {
        let mut stdin = unbuffered_stdin()?;
        Ok(read_line_unbuffered(&mut stdin)?)
    }

    /// Validate and parse a choice input
    /// Returns Some(index) if valid, None if invalid
    pub fn validate_choice_input(input: &str, num_choices: usize) -> Option<usize> {
        if num_choices == 0 {
            return None;
        }

        input.trim().parse::<usize>().ok().and_then(|num| {
            if num > 0 && num <= num_choices {
                Some(num - 1)
            } else {
                None
            }
        })
    }

    /// Parse a typed yes/no answer
    pub fn parse_yes_no(input: &str) -> Option<bool> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(true),
            "n" | "no" => Some(false),
            _ => None,
        }
    }

    /// Format choice prompt message
    pub fn format_choice_prompt(message: &str, choices: &[String]) -> String {
        let mut output = String::new();
        output.push_str(message);
        output.push('\n');
        for (i, choice) in choices.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, choice));
        }
        output
    }

    /// Format choice input prompt
    pub fn format_choice_input_prompt(num_choices: usize) -> String {
        format!("Enter choice (1-{num_choices}): ")
    }

    /// Format invalid choice message
    pub fn format_invalid_choice_message(num_choices: usize) -> String {
        format!("Invalid choice. Please enter a number between 1 and {num_choices}: ")
    }

    /// Render one option line of the select menu
    pub fn format_select_line(choice: &str, highlighted: bool) -> String {
        if highlighted {
            format!("  ▶ {choice}")
        } else {
            format!("    {choice}")
        }
    }

    fn text_raw(message: &str, help: Option<&str>) -> Result<PromptOutcome<String>> {
        let mut stdout = io::stdout();
        if let Some(help) = help {
            writeln!(stdout, "  {help}")?;
        }

        let _guard = RawModeGuard::enable()?;
        let mut input = LineInput::default();
        loop {
            queue!(
                stdout,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(format!("? {message}: {}", input.value()))
            )?;
            stdout.flush()?;

            match input.handle_key(next_key()?) {
                KeyOutcome::Continue => {}
                KeyOutcome::Submit(value) => {
                    queue!(stdout, Print("\r\n"))?;
                    stdout.flush()?;
                    return Ok(PromptOutcome::Answered(value));
                }
                KeyOutcome::Cancel => {
                    queue!(stdout, Print("\r\n"))?;
                    stdout.flush()?;
                    return Ok(PromptOutcome::Cancelled);
                }
            }
        }
    }

    fn text_lines(message: &str, help: Option<&str>) -> Result<PromptOutcome<String>> {
        if let Some(help) = help {
            println!("  {help}");
        }
        print!("? {message}: ");
        io::stdout().flush()?;

        Ok(match Self::read_line()? {
            Some(line) => PromptOutcome::Answered(line),
            None => PromptOutcome::Cancelled,
        })
    }

    fn choice_raw(message: &str, choices: &[String]) -> Result<PromptOutcome<usize>> {
        let mut stdout = io::stdout();
        writeln!(stdout, "? {message}:")?;

        let _guard = RawModeGuard::enable()?;
        let mut cursor = SelectCursor::new(choices.len());
        let mut drawn = false;
        loop {
            if drawn {
                queue!(stdout, MoveUp(choices.len() as u16))?;
            }
            for (i, choice) in choices.iter().enumerate() {
                queue!(
                    stdout,
                    MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    Print(Self::format_select_line(choice, i == cursor.position())),
                    Print("\r\n")
                )?;
            }
            stdout.flush()?;
            drawn = true;

            match cursor.handle_key(next_key()?) {
                KeyOutcome::Continue => {}
                KeyOutcome::Submit(index) => {
                    queue!(stdout, Print(format!("  ✔ {}\r\n", choices[index])))?;
                    stdout.flush()?;
                    return Ok(PromptOutcome::Answered(index));
                }
                KeyOutcome::Cancel => return Ok(PromptOutcome::Cancelled),
            }
        }
    }

    fn choice_lines(message: &str, choices: &[String]) -> Result<PromptOutcome<usize>> {
        print!("{}", Self::format_choice_prompt(message, choices));
        print!("{}", Self::format_choice_input_prompt(choices.len()));
        io::stdout().flush()?;

        loop {
            let Some(input) = Self::read_line()? else {
                return Ok(PromptOutcome::Cancelled);
            };
            if let Some(index) = Self::validate_choice_input(&input, choices.len()) {
                return Ok(PromptOutcome::Answered(index));
            }
            print!("{}", Self::format_invalid_choice_message(choices.len()));
            io::stdout().flush()?;
        }
    }

    fn yes_no_raw(message: &str) -> Result<PromptOutcome<bool>> {
        let mut stdout = io::stdout();
        let _guard = RawModeGuard::enable()?;
        queue!(stdout, Print(format!("? {message} (y/n): ")))?;
        stdout.flush()?;

        loop {
            match confirm_key(next_key()?) {
                KeyOutcome::Continue => {}
                KeyOutcome::Submit(answer) => {
                    let label = if answer { "Yes" } else { "No" };
                    queue!(stdout, Print(format!("{label}\r\n")))?;
                    stdout.flush()?;
                    return Ok(PromptOutcome::Answered(answer));
                }
                KeyOutcome::Cancel => {
                    queue!(stdout, Print("\r\n"))?;
                    stdout.flush()?;
                    return Ok(PromptOutcome::Cancelled);
                }
            }
        }
    }

    fn yes_no_lines(message: &str) -> Result<PromptOutcome<bool>> {
        print!("? {message} (y/n): ");
        io::stdout().flush()?;

        loop {
            let Some(input) = Self::read_line()? else {
                return Ok(PromptOutcome::Cancelled);
            };
            if let Some(answer) = Self::parse_yes_no(&input) {
                return Ok(PromptOutcome::Answered(answer));
            }
            print!("Please answer y or n: ");
            io::stdout().flush()?;
        }
    }
}

#[async_trait]
impl UserPrompter for UserPrompterImpl {
    async fn prompt_text(
        &self,
        message: &str,
        help: Option<&str>,
    ) -> Result<PromptOutcome<String>> {
        if Self::is_interactive() {
            Self::text_raw(message, help)
        } else {
            Self::text_lines(message, help)
        }
    }

    async fn prompt_choice(
        &self,
        message: &str,
        choices: &[String],
    ) -> Result<PromptOutcome<usize>> {
        if choices.is_empty() {
            anyhow::bail!("No choices provided");
        }

        if Self::is_interactive() {
            Self::choice_raw(message, choices)
        } else {
            Self::choice_lines(message, choices)
        }
    }

    async fn prompt_yes_no(&self, message: &str) -> Result<PromptOutcome<bool>> {
        if Self::is_interactive() {
            Self::yes_no_raw(message)
        } else {
            Self::yes_no_lines(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn next_line(input: &mut impl Read) -> Option<String> {
        read_line_unbuffered(input).unwrap()
    }

    #[test]
    fn test_line_input_typing_and_backspace() {
        let mut input = LineInput::default();
        for c in "Adx".chars() {
            assert_eq!(input.handle_key(press(c)), KeyOutcome::Continue);
        }
        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(press('a'));
        assert_eq!(input.value(), "Ada");
        assert_eq!(
            input.handle_key(key(KeyCode::Enter)),
            KeyOutcome::Submit("Ada".to_string())
        );
    }

    #[test]
    fn test_line_input_cancel() {
        let mut input = LineInput::default();
        assert_eq!(input.handle_key(key(KeyCode::Esc)), KeyOutcome::Cancel);
        assert_eq!(input.handle_key(ctrl('c')), KeyOutcome::Cancel);
    }

    #[test]
    fn test_line_input_backspace_on_empty() {
        let mut input = LineInput::default();
        let outcome = input.handle_key(key(KeyCode::Backspace));
        assert_eq!(outcome, KeyOutcome::Continue);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_select_cursor_moves_within_bounds() {
        let mut cursor = SelectCursor::new(3);
        cursor.handle_key(key(KeyCode::Up));
        assert_eq!(cursor.position(), 0);
        cursor.handle_key(key(KeyCode::Down));
        cursor.handle_key(press('j'));
        cursor.handle_key(key(KeyCode::Down));
        assert_eq!(cursor.position(), 2);
        cursor.handle_key(press('k'));
        let outcome = cursor.handle_key(key(KeyCode::Enter));
        assert_eq!(outcome, KeyOutcome::Submit(1));
    }

    #[test]
    fn test_select_cursor_cancel_keys() {
        let mut cursor = SelectCursor::new(2);
        assert_eq!(cursor.handle_key(press('q')), KeyOutcome::Cancel);
        assert_eq!(cursor.handle_key(key(KeyCode::Esc)), KeyOutcome::Cancel);
        assert_eq!(cursor.handle_key(ctrl('c')), KeyOutcome::Cancel);
    }

    #[test]
    fn test_select_cursor_empty_never_submits() {
        let mut cursor = SelectCursor::new(0);
        assert_eq!(cursor.handle_key(key(KeyCode::Enter)), KeyOutcome::Continue);
    }

    #[test]
    fn test_confirm_keys() {
        assert_eq!(confirm_key(press('y')), KeyOutcome::Submit(true));
        assert_eq!(confirm_key(press('N')), KeyOutcome::Submit(false));
        assert_eq!(confirm_key(key(KeyCode::Enter)), KeyOutcome::Continue);
        assert_eq!(confirm_key(key(KeyCode::Esc)), KeyOutcome::Cancel);
        assert_eq!(confirm_key(ctrl('c')), KeyOutcome::Cancel);
    }

    #[test]
    fn test_read_line_stops_at_newline() {
        let mut input = io::Cursor::new(b"Ada\r\nBob\nlast".to_vec());
        assert_eq!(next_line(&mut input), Some("Ada".to_string()));
        assert_eq!(input.position(), 5);
        assert_eq!(next_line(&mut input), Some("Bob".to_string()));
        assert_eq!(next_line(&mut input), Some("last".to_string()));
        assert_eq!(next_line(&mut input), None);
    }

    #[test]
    fn test_read_line_empty_line_is_not_eof() {
        let mut input = io::Cursor::new(b"\n".to_vec());
        assert_eq!(next_line(&mut input), Some(String::new()));
        assert_eq!(next_line(&mut input), None);
    }

    #[test]
    fn test_validate_choice_input() {
        assert_eq!(UserPrompterImpl::validate_choice_input("1", 3), Some(0));
        assert_eq!(UserPrompterImpl::validate_choice_input(" 3 ", 3), Some(2));
        assert_eq!(UserPrompterImpl::validate_choice_input("10", 10), Some(9));
        assert_eq!(UserPrompterImpl::validate_choice_input("0", 3), None);
        assert_eq!(UserPrompterImpl::validate_choice_input("4", 3), None);
        assert_eq!(UserPrompterImpl::validate_choice_input("-1", 3), None);
        assert_eq!(UserPrompterImpl::validate_choice_input("abc", 3), None);
        assert_eq!(UserPrompterImpl::validate_choice_input("", 3), None);
        assert_eq!(UserPrompterImpl::validate_choice_input("1", 0), None);
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(UserPrompterImpl::parse_yes_no("y"), Some(true));
        assert_eq!(UserPrompterImpl::parse_yes_no("YES"), Some(true));
        assert_eq!(UserPrompterImpl::parse_yes_no(" no "), Some(false));
        assert_eq!(UserPrompterImpl::parse_yes_no(""), None);
        assert_eq!(UserPrompterImpl::parse_yes_no("maybe"), None);
    }

    #[test]
    fn test_format_choice_prompt() {
        let choices = vec!["Option A".to_string(), "Option B".to_string()];
        let formatted = UserPrompterImpl::format_choice_prompt("Choose an option:", &choices);
        let expected = "Choose an option:\n  1. Option A\n  2. Option B\n";
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_format_choice_input_prompt() {
        assert_eq!(
            UserPrompterImpl::format_choice_input_prompt(3),
            "Enter choice (1-3): "
        );
        assert_eq!(
            UserPrompterImpl::format_invalid_choice_message(1),
            "Invalid choice. Please enter a number between 1 and 1: "
        );
    }

    #[test]
    fn test_format_select_line() {
        let highlighted = UserPrompterImpl::format_select_line("staging", true);
        assert_eq!(highlighted, "  ▶ staging");
        let plain = UserPrompterImpl::format_select_line("prod", false);
        assert_eq!(plain, "    prod");
    }

    #[tokio::test]
    async fn test_prompt_choice_empty_choices() {
        let prompter = UserPrompterImpl::new();
        let choices: Vec<String> = vec![];
        let result = prompter.prompt_choice("Choose", &choices).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "No choices provided");
    }
}
