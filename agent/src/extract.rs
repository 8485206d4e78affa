//! # extract: pull the JSON object out of a model response
//!
//! Models wrap JSON in code fences or chatter despite instructions. Order:
//! 1. first fenced block (```` ```json ```` or bare ```` ``` ````)
//! 2. first balanced `{ ... }`, ignoring braces inside string literals
//! 3. the trimmed text as-is (so the JSON parser reports what is wrong)

const FENCE: &str = "```";

pub fn extract_json(text: &str) -> &str {
    let text = text.trim();
    fenced_block(text)
        .or_else(|| balanced_object(text))
        .unwrap_or(text)
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find(FENCE)?;
    Some(rest[..end].trim())
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
