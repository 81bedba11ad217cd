use std::io::{self, BufRead, Write};

/// Interactive questions asked by the commands.
pub trait Prompter {
    /// Free-text answer, trimmed. Empty input yields `default` (or "").
    fn input(&mut self, prompt: &str, default: Option<&str>) -> String;

    /// Yes/no question; empty input yields `default`.
    fn confirm(&mut self, prompt: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.input(&format!("{} {}", prompt, hint), None);
        match answer.to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        }
    }

    /// Numbered menu. Returns the zero-based index, or `None` for an invalid
    /// answer. Empty input picks `default`.
    fn choose(&mut self, prompt: &str, options: &[String], default: Option<usize>) -> Option<usize> {
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, option);
        }
        let default_label = default.map(|d| (d + 1).to_string());
        let answer = self.input(prompt, default_label.as_deref());
        parse_choice(&answer, options.len())
    }
}

/// One-based menu answer to a zero-based index.
pub fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

/// Prompts on stderr, answers from stdin.
pub struct Terminal;

impl Prompter for Terminal {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> String {
        match default {
            Some(d) if !d.is_empty() => eprint!("{} [{}]: ", prompt, d),
            _ => eprint!("{}: ", prompt),
        }
        let _ = io::stderr().flush();

        let mut line = String::new();
        // EOF reads as an empty answer
        if io::stdin().lock().read_line(&mut line).is_err() {
            line.clear();
        }
        let answer = line.trim();
        if answer.is_empty() {
            default.unwrap_or_default().to_string()
        } else {
            answer.to_string()
        }
    }
}
