//! Shared utility functions.

/// Quote a word so a POSIX shell reads it back as a single argument.
///
/// Words made only of safe characters are returned unchanged so that
/// rendered command lines stay readable.
pub fn shell_quote(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }

    if word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | '=' | '@' | ','))
    {
        return word.to_string();
    }

    format!("'{}'", word.replace('\'', "'\"'\"'"))
}

/// Join words into a shell line, quoting each one as needed.
pub fn shell_join<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| shell_quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
