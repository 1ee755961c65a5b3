use regex::Regex;
use std::sync::LazyLock;

// CSI sequences (ESC [ ... final byte) and OSC sequences (ESC ] ... BEL/ST).
static ANSI: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]|\x1B\][^\x07\x1B]*(?:\x07|\x1B\\)").ok()
});

/// Make untrusted API text safe to print: drop escape sequences and control
/// characters, fold line breaks and tabs to spaces, trim, and cap at
/// `max_chars` characters.
pub fn sanitize_for_terminal(s: &str, max_chars: usize) -> String {
    let no_ansi = match ANSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    };

    let cleaned: String = no_ansi
        .chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    cleaned.trim().chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(
            sanitize_for_terminal("\x1b[31mRansomware\x1b[0m gang", 200),
            "Ransomware gang"
        );
    }

    #[test]
    fn strips_hyperlink_escape() {
        let s = "\x1b]8;;http://evil\x07click\x1b]8;;\x07";
        assert_eq!(sanitize_for_terminal(s, 200), "click");
    }

    #[test]
    fn folds_newlines_and_drops_controls() {
        assert_eq!(sanitize_for_terminal(" a\nb\tc\u{7}\u{7f} ", 200), "a b c");
    }

    #[test]
    fn caps_length() {
        assert_eq!(sanitize_for_terminal("abcdef", 3), "abc");
    }
}
