//! Line-based stdin prompts.

use std::io::{self, Write};

/// Print `label`, read one line, return it trimmed.
///
/// A closed stdin is an `UnexpectedEof` error so prompt loops terminate.
pub fn ask(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(input.trim().to_string())
}

/// `[y/N]` question; only "y"/"yes" count.
pub fn confirm(label: &str) -> io::Result<bool> {
    let answer = ask(&format!("{} [y/N]: ", label))?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("Y"));
        assert!(is_yes(" yes "));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
        assert!(!is_yes("n"));
    }
}
