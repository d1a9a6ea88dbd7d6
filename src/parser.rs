use crate::ir::Word;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"(?P<text>(?:[^"\\]|\\.)*)"\s*[,:\t]?\s*(?P<score>\S+)$"#).unwrap()
});
static PLAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<text>.+?)(?:\s*[,:\t]\s*|\s+)(?P<score>[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)$",
    )
    .unwrap()
});

/// Reads a word list: either a JSON array of `{"text", "score"}` objects or
/// one `text score` pair per line.
pub fn parse_word_list(input: &str) -> Result<Vec<Word>> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("invalid JSON word list");
    }

    let mut words = Vec::new();
    for (idx, raw) in trimmed.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let word = parse_line(line).with_context(|| format!("line {}: '{}'", idx + 1, line))?;
        words.push(word);
    }
    Ok(words)
}

fn parse_line(line: &str) -> Result<Word> {
    if let Some(caps) = QUOTED_RE.captures(line) {
        let text = unescape(&caps["text"]);
        let score = caps["score"]
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("invalid score '{}'", &caps["score"]))?;
        return Ok(Word::new(text, score));
    }
    if let Some(caps) = PLAIN_RE.captures(line) {
        let score = caps["score"].parse::<f64>()?;
        return Ok(Word::new(caps["text"].trim(), score));
    }
    Err(anyhow::anyhow!("expected '<text> <score>'"))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_lines() {
        let words = parse_word_list(
            "# languages\nRust 10\nGo, 4.5\nZig:1e-1\n\nC\t2\nmulti word label 3\n",
        )
        .unwrap();
        assert_eq!(
            words,
            vec![
                Word::new("Rust", 10.0),
                Word::new("Go", 4.5),
                Word::new("Zig", 0.1),
                Word::new("C", 2.0),
                Word::new("multi word label", 3.0),
            ]
        );
    }

    #[test]
    fn parses_quoted_text() {
        let words = parse_word_list(r#""New York, NY" 7
"say \"hi\"": 2"#)
        .unwrap();
        assert_eq!(words[0], Word::new("New York, NY", 7.0));
        assert_eq!(words[1], Word::new("say \"hi\"", 2.0));
    }

    #[test]
    fn parses_json_array() {
        let words =
            parse_word_list(r#"[{"text": "Hello", "score": 1}, {"text": "World", "score": 0.5}]"#)
                .unwrap();
        assert_eq!(words, vec![Word::new("Hello", 1.0), Word::new("World", 0.5)]);
    }

    #[test]
    fn reports_line_number_of_bad_line() {
        let err = parse_word_list("ok 1\nnoscore\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }

    #[test]
    fn empty_input_is_empty_list() {
        assert!(parse_word_list("  \n# nothing\n").unwrap().is_empty());
    }
}
