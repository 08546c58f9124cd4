//! Parser for typelog dialogue scripts.
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`].

use crate::directive::Directive;
use crate::directives::{Ask, Choice, End, Say};
use crate::script::Script;
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;
use std::time::Duration;

/// Parse a dialogue script from a string slice.
///
/// Lines that are empty or start with `#` are ignored. Inline comments (` # …`)
/// are stripped while preserving `#` characters inside quoted strings.
///
/// # Errors
///
/// Returns an error if any line contains an unknown directive, a malformed
/// argument, or an unclosed quoted string, or if the script has no messages.
///
/// # Example
///
/// ```
/// use typelog::parse_str;
///
/// let script = parse_str("say \"hello\"\nend\nsay \"again\" 0ms auto\n").unwrap();
/// assert_eq!(script.blocks().len(), 2);
/// ```
pub fn parse_str(content: &str) -> Result<Script> {
    let mut script = Script::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(line);
        let directive = parse_line(line)
            .with_context(|| format!("Failed to parse line {}: {}", line_num + 1, line))?;
        directive
            .apply(&mut script)
            .with_context(|| format!("Failed to apply line {}: {}", line_num + 1, line))?;
    }
    script.finish()
}

/// Parse a dialogue script from a file.
///
/// Reads the entire file into memory and delegates to [`parse_str`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or if the script is malformed.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Script> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    parse_str(&content)
}

type ParseFn = fn(&str) -> Result<Box<dyn Directive>>;

static REGISTRY: &[(&str, ParseFn)] = &[
    (Say::NAME, Say::parse_boxed),
    (Ask::NAME, Ask::parse_boxed),
    (End::NAME, End::parse_boxed),
    (Choice::NAME, Choice::parse_boxed),
];

/// Dispatch a single non-empty, non-comment line to the matching directive's parser.
fn parse_line(line: &str) -> Result<Box<dyn Directive>> {
    let (name, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    REGISTRY
        .iter()
        .find(|(directive_name, _)| *directive_name == name)
        .map(|(_, parse)| parse(args))
        .unwrap_or_else(|| Err(anyhow!("Unknown directive: {}", line)))
}

/// Strip inline comments from a line, preserving `#` inside quoted strings.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if ch == '#' && !in_quotes {
            return line[..i].trim();
        }
    }
    line
}

/// Parse a duration string: `1s`, `500ms`, `1.5s`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if let Some(ms_str) = s.strip_suffix("ms") {
        let ms: u64 = ms_str
            .trim()
            .parse()
            .context("Invalid milliseconds value")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(s_str) = s.strip_suffix('s') {
        let secs: f64 = s_str.trim().parse().context("Invalid seconds value")?;
        Duration::try_from_secs_f64(secs).context("Invalid seconds value")
    } else {
        Err(anyhow!("Duration must end with 's' or 'ms', got: {}", s))
    }
}

/// Parse a double-quoted string, processing `\n`, `\t`, `\"`, and `\\`.
pub(crate) fn parse_quoted_string(s: &str) -> Result<String> {
    let s = s.trim();
    if !s.starts_with('"') {
        return Err(anyhow!("Expected string to start with '\"'"));
    }
    if s.len() < 2 || !s.ends_with('"') {
        return Err(anyhow!("Expected string to end with '\"'"));
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Ok(out)
}

/// Split a leading quoted string off `args`, returning it unescaped along
/// with the trimmed remainder.
pub(crate) fn split_quoted(args: &str) -> Result<(String, &str)> {
    let args = args.trim_start();
    if !args.starts_with('"') {
        return Err(anyhow!("Expected quoted string, got: {}", args));
    }

    // Locate the closing quote, respecting backslash escapes.
    let mut escaped = false;
    let mut end_idx = None;
    for (i, ch) in args.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            end_idx = Some(i);
            break;
        }
    }

    let end_idx = end_idx.ok_or_else(|| anyhow!("Unclosed quote"))?;
    let text = parse_quoted_string(&args[..=end_idx])?;
    Ok((text, args[end_idx + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Block;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::from_secs_f64(1.5)
        );
        assert_eq!(parse_duration("0ms").unwrap(), Duration::ZERO);
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("5minutes").is_err());
    }

    #[test]
    fn test_parse_quoted_string() {
        assert_eq!(parse_quoted_string("\"hello\"").unwrap(), "hello");
        assert_eq!(
            parse_quoted_string("\"hello\\nworld\"").unwrap(),
            "hello\nworld"
        );
        assert_eq!(
            parse_quoted_string(r#""a \"b\" \\n""#).unwrap(),
            "a \"b\" \\n"
        );
        assert!(parse_quoted_string("\"").is_err());
    }

    #[test]
    fn test_split_quoted() {
        let (text, rest) = split_quoted(r#""hi \"you\"" 10ms auto"#).unwrap();
        assert_eq!(text, "hi \"you\"");
        assert_eq!(rest, "10ms auto");
        assert!(split_quoted(r#""unclosed"#).is_err());
        assert!(split_quoted("bare").is_err());
    }

    #[test]
    fn test_parse_str() {
        let script = parse_str("say \"a\"\nsay \"b\"\nend\nask \"c\" name\n").unwrap();
        assert_eq!(script.blocks().len(), 2);
    }

    #[test]
    fn test_parse_demo_script() {
        let script = parse_str(crate::DEMO_SCRIPT).unwrap();
        let kinds: Vec<&str> = script
            .blocks()
            .iter()
            .map(|block| match block {
                Block::Text(_) => "text",
                Block::Choice { .. } => "choice",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "text", "choice", "text", "text"]);
    }

    #[test]
    fn test_parse_comments_only() {
        let err = parse_str("# c1\n# c2\n").unwrap_err().to_string();
        assert!(err.contains("no messages"), "got: {err}");
    }

    #[test]
    fn test_parse_invalid_directive() {
        let err = format!("{:#}", parse_str("unknown_directive \"test\"").unwrap_err());
        assert!(err.contains("Unknown directive"), "got: {err}");
        assert!(err.contains("line 1"), "got: {err}");
    }

    #[test]
    fn test_parse_tab_separated() {
        let script = parse_str("say\t\"a\"\nchoice\tpick\t\"x\"\n").unwrap();
        assert_eq!(script.blocks().len(), 2);
    }

    #[test]
    fn test_parse_unclosed_quote() {
        assert!(parse_str("say \"unclosed").is_err());
    }

    #[test]
    fn test_strip_inline_comments() {
        assert_eq!(strip_inline_comment("end # comment"), "end");
        assert_eq!(strip_inline_comment("say \"test\" # inline"), "say \"test\"");
        assert_eq!(strip_inline_comment("say \"#hashtag\""), "say \"#hashtag\"");
        assert_eq!(
            strip_inline_comment("say \"test#1\" # comment"),
            "say \"test#1\""
        );
    }
}
