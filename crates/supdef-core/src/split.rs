//! Argument splitter (C6): breaking an invocation's argument text on
//! top-level commas.

/// Split `args_text` (the text between an invocation's outer parentheses)
/// on commas that are not nested inside parentheses or a string/character
/// literal. Each argument is trimmed of leading/trailing whitespace. An
/// empty `args_text` (e.g. `GREET()`) yields zero arguments; an empty
/// segment between commas (e.g. `"a,,c"`) yields a preserved empty-string
/// argument.
pub fn split_arguments(args_text: &str) -> Vec<String> {
    if args_text.is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut in_char = false;
    let mut current_start = 0usize;
    let mut chars = args_text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if in_string || in_char {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' if !in_char => in_string = false,
                '\'' if !in_string => in_char = false,
                _ => {}
            }
            continue;
        }

        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '"' => in_string = true,
            '\'' => in_char = true,
            ',' if depth == 0 => {
                args.push(args_text[current_start..idx].trim().to_string());
                current_start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    args.push(args_text[current_start..].trim().to_string());
    args
}
