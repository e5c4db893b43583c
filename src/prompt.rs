use std::io::{self, BufRead, Write};

use arena_views::Confirm;

/// Asks for confirmation on the terminal
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match ask(&format!("{} [y/N] ", prompt)) {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Prints the question and reads one line of input
pub fn ask(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
