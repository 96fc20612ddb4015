use teloxide::types::User;

/// Best effort resolver label: the public @username when there is one,
/// otherwise the profile name.
pub fn display_name(user: &User) -> Option<String> {
    if let Some(username) = &user.username {
        if !username.is_empty() {
            return Some(format!("@{}", username));
        }
    }

    let full = user.full_name();
    if full.trim().is_empty() {
        None
    } else {
        Some(full)
    }
}

/// Escapes text for Telegram MarkdownV2 mode.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        match c {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.' | '!' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
