// Xautocfg Config Parser
// Line-oriented INI-like format: `[section]`, `key = value` and `#` comments

use std::path::Path;

use super::{lookup_entry, Config, ConfigError, Section};

/// Classification of a single physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Empty or whitespace only
    Blank,
    /// Nothing left once the comment is stripped
    Comment,
    /// `[name]`
    Section(String),
    /// `key = value`, the value runs to the end of the line
    Entry { key: String, value: String },
    /// Anything else
    Invalid,
}

/// Transient state while walking the file
#[derive(Debug, Default)]
struct ParseState {
    section: Option<Section>,
    line: usize,
}

/// Remove everything from the first unescaped `#` on.
///
/// `\#` stands for a literal `#`. The stripping is purely syntactic, a `#`
/// inside a command value starts a comment just the same.
fn strip_comment(raw: &str) -> (String, bool) {
    let mut content = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                content.push('#');
                chars.next();
            }
            '#' => return (content, true),
            _ => content.push(c),
        }
    }

    (content, false)
}

/// Classify one raw line of the config file
pub fn classify_line(raw: &str) -> Line {
    let (content, had_comment) = strip_comment(raw);
    let line = content.trim();

    if line.is_empty() {
        return if had_comment { Line::Comment } else { Line::Blank };
    }

    if let Some(inner) = line.strip_prefix('[') {
        return match inner.strip_suffix(']') {
            Some(name) if !name.is_empty() && !name.contains(['[', ']']) => {
                Line::Section(name.to_string())
            }
            _ => Line::Invalid,
        };
    }

    if let Some((key, value)) = line.split_once('=') {
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Line::Invalid;
        }
        return Line::Entry {
            key: key.to_string(),
            value: value.trim().to_string(),
        };
    }

    Line::Invalid
}

/// Parse config text into a `Config`.
///
/// `home` is used to expand `~` at the start of hook commands. The first
/// malformed line aborts parsing; nothing outside the returned value is
/// touched.
pub fn parse_config(content: &str, home: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut state = ParseState::default();

    for raw in content.lines() {
        state.line += 1;

        match classify_line(raw) {
            Line::Blank | Line::Comment => {}
            Line::Section(name) => {
                let section = name
                    .parse::<Section>()
                    .map_err(|_| ConfigError::UnknownSection {
                        line: state.line,
                        text: raw.to_string(),
                    })?;
                log::trace!("config line {}: entering [{}]", state.line, section);
                state.section = Some(section);
            }
            Line::Entry { key, value } => {
                let section = state.section.ok_or_else(|| ConfigError::NoSection {
                    line: state.line,
                    text: raw.to_string(),
                })?;

                let setter =
                    lookup_entry(section, &key).ok_or_else(|| ConfigError::UnknownKey {
                        line: state.line,
                        section,
                        key: key.clone(),
                        text: raw.to_string(),
                    })?;

                setter(&mut config, &value, home).map_err(|source| {
                    ConfigError::InvalidValue {
                        line: state.line,
                        key: key.clone(),
                        text: raw.to_string(),
                        source,
                    }
                })?;
                log::trace!("config line {}: {} = {}", state.line, key, value);
            }
            Line::Invalid => {
                return Err(ConfigError::Syntax {
                    line: state.line,
                    text: raw.to_string(),
                });
            }
        }
    }

    Ok(config)
}
