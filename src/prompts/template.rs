//! `{placeholder}` substitution.
//!
//! `{name}` is replaced by the value bound to `name`; `{{` and `}}` produce
//! literal braces. Every placeholder is checked against the supplied values
//! before anything is substituted.

use std::collections::BTreeMap;

use super::error::{PromptError, PromptResult};

/// Named values available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptVars {
    values: BTreeMap<String, String>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PromptVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PromptVars {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn parse(template: &str) -> PromptResult<Vec<Piece<'_>>> {
    let bytes = template.as_bytes();
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    // Braces are ASCII, so every index sliced on below is a char boundary.
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                pieces.push(Piece::Literal(&template[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                pieces.push(Piece::Literal(&template[literal_start..i]));
                let close = template[i + 1..].find('}').ok_or(PromptError::Malformed {
                    position: i,
                    reason: "unclosed '{'",
                })?;
                let name = &template[i + 1..i + 1 + close];
                if name.is_empty() {
                    return Err(PromptError::Malformed {
                        position: i,
                        reason: "empty placeholder",
                    });
                }
                if name.contains('{') {
                    return Err(PromptError::Malformed {
                        position: i,
                        reason: "nested '{' in placeholder",
                    });
                }
                pieces.push(Piece::Placeholder(name));
                i += close + 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                pieces.push(Piece::Literal(&template[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'}' => {
                return Err(PromptError::Malformed {
                    position: i,
                    reason: "single '}' outside a placeholder",
                });
            }
            _ => i += 1,
        }
    }
    pieces.push(Piece::Literal(&template[literal_start..]));
    pieces.retain(|p| !matches!(p, Piece::Literal("")));
    Ok(pieces)
}

/// Supplied keys that no placeholder in `pieces` refers to.
fn unused_keys<'v>(pieces: &[Piece<'_>], vars: &'v PromptVars) -> Vec<&'v str> {
    vars.keys()
        .filter(|key| {
            !pieces
                .iter()
                .any(|p| matches!(p, Piece::Placeholder(name) if name == key))
        })
        .collect()
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> PromptResult<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for piece in parse(template)? {
        if let Piece::Placeholder(name) = piece {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Substitute `vars` into `template`.
///
/// Fails with [`PromptError::MissingKey`] naming the first placeholder that
/// has no value; unused values are ignored.
pub fn render_prompt(template: &str, vars: &PromptVars) -> PromptResult<String> {
    let pieces = parse(template)?;

    if let Some(missing) = pieces.iter().find_map(|p| match p {
        Piece::Placeholder(name) if !vars.contains(name) => Some(*name),
        _ => None,
    }) {
        return Err(PromptError::MissingKey(missing.to_string()));
    }

    let unused = unused_keys(&pieces, vars);
    if !unused.is_empty() {
        tracing::debug!(unused = ?unused, "template ignored supplied values");
    }

    let mut out = String::with_capacity(template.len());
    for piece in &pieces {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Placeholder(name) => out.push_str(vars.get(name).unwrap_or_default()),
        }
    }
    Ok(out)
}
