//! Relative path expressions over record trees
//!
//! Supports the subset used for required-field and identifier lookups:
//! child steps (`a/b`), descendant steps (`a//b`), `*` and `.`, and the
//! predicates `[@attr]`, `[@attr='v']`, `[child]`, `[child='text']`, `[n]`
//! and `[last()]`. Prefixes are resolved through a [`NamespaceTable`].

use crate::core::split::{NamespaceTable, XmlElement};
use crate::domain::{KioskError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    Name(String),
    Any,
    SelfNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
    HasChild(String),
    ChildTextEquals(String, String),
    Position(usize),
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    descendant: bool,
    test: NodeTest,
    predicates: Vec<Predicate>,
}

/// A compiled path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPath {
    raw: String,
    steps: Vec<Step>,
}

fn invalid(path: &str, reason: &str) -> KioskError {
    KioskError::Validation(format!("Invalid path '{path}': {reason}"))
}

/// Split on `/` outside brackets and quotes
fn segments(path: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid(path, "unbalanced ']'"))?;
            }
            (None, '/') if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(invalid(path, "unterminated predicate"));
    }
    parts.push(&path[start..]);
    Ok(parts)
}

fn unquote<'a>(path: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    for q in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return Ok(inner);
        }
    }
    Err(invalid(path, "predicate value must be quoted"))
}

fn parse_predicate(path: &str, body: &str) -> Result<Predicate> {
    let body = body.trim();
    if body.is_empty() {
        return Err(invalid(path, "empty predicate"));
    }
    if body == "last()" {
        return Ok(Predicate::Last);
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let position: usize = body.parse().map_err(|_| invalid(path, "bad position"))?;
        if position == 0 {
            return Err(invalid(path, "positions start at 1"));
        }
        return Ok(Predicate::Position(position));
    }
    if let Some(attribute) = body.strip_prefix('@') {
        return Ok(match attribute.split_once('=') {
            Some((name, value)) => {
                Predicate::AttributeEquals(name.trim().to_string(), unquote(path, value)?.to_string())
            }
            None => Predicate::HasAttribute(attribute.trim().to_string()),
        });
    }
    Ok(match body.split_once('=') {
        Some((name, value)) => {
            Predicate::ChildTextEquals(name.trim().to_string(), unquote(path, value)?.to_string())
        }
        None => Predicate::HasChild(body.to_string()),
    })
}

fn parse_step(path: &str, segment: &str, descendant: bool) -> Result<Step> {
    let (name, mut rest) = match segment.find('[') {
        Some(i) => (&segment[..i], &segment[i..]),
        None => (segment, ""),
    };

    let test = match name.trim() {
        "" => return Err(invalid(path, "missing element name")),
        "*" => NodeTest::Any,
        "." => NodeTest::SelfNode,
        ".." => return Err(invalid(path, "parent steps are not supported")),
        n => NodeTest::Name(n.to_string()),
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(invalid(path, "unexpected text after predicate"));
        }
        // segments() guarantees balance; find the matching ']' outside quotes
        let mut quote: Option<char> = None;
        let mut end = None;
        for (i, c) in rest.char_indices().skip(1) {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, ']') => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| invalid(path, "unterminated predicate"))?;
        predicates.push(parse_predicate(path, &rest[1..end])?);
        rest = &rest[end + 1..];
    }

    Ok(Step {
        descendant,
        test,
        predicates,
    })
}

impl XmlPath {
    /// Compile a relative path
    ///
    /// # Errors
    ///
    /// Returns a validation error for absolute paths, parent steps and
    /// malformed predicates
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(invalid(path, "empty path"));
        }
        if trimmed.starts_with('/') {
            return Err(invalid(path, "paths are relative to the record"));
        }

        let mut steps = Vec::new();
        let mut descendant = false;
        for segment in segments(trimmed)? {
            if segment.is_empty() {
                if descendant {
                    return Err(invalid(path, "'///' is not a valid step"));
                }
                descendant = true;
                continue;
            }
            steps.push(parse_step(path, segment, descendant)?);
            descendant = false;
        }
        if descendant {
            return Err(invalid(path, "path ends with '/'"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            steps,
        })
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Attribute named by the final step's last attribute predicate
    pub fn trailing_attribute(&self) -> Option<&str> {
        self.steps
            .last()?
            .predicates
            .iter()
            .rev()
            .find_map(|p| match p {
                Predicate::HasAttribute(name) | Predicate::AttributeEquals(name, _) => {
                    Some(name.as_str())
                }
                _ => None,
            })
    }

    /// All matches in document order
    pub fn select<'a>(
        &self,
        root: &'a XmlElement,
        namespaces: &NamespaceTable,
    ) -> Vec<&'a XmlElement> {
        let mut current = vec![root];
        for step in &self.steps {
            let mut next: Vec<&'a XmlElement> = Vec::new();
            for &context in &current {
                let candidates = candidates(context, step, namespaces);
                for element in apply_predicates(candidates, &step.predicates, namespaces) {
                    if !next.iter().any(|seen| std::ptr::eq(*seen, element)) {
                        next.push(element);
                    }
                }
            }
            current = next;
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// First non-empty value among the matches
    ///
    /// A match's value is its text, whitespace included; when the element
    /// has no text and the final step carries an attribute predicate, that
    /// attribute's value is used instead.
    pub fn first_value(&self, root: &XmlElement, namespaces: &NamespaceTable) -> Option<String> {
        let attribute = self.trailing_attribute();
        self.select(root, namespaces).into_iter().find_map(|element| {
            element.text().or_else(|| {
                attribute
                    .and_then(|name| element.attribute_resolved(name, namespaces))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
        })
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn candidates<'a>(
    context: &'a XmlElement,
    step: &Step,
    namespaces: &NamespaceTable,
) -> Vec<&'a XmlElement> {
    let pool: Vec<&'a XmlElement> = match (step.descendant, &step.test) {
        (false, NodeTest::SelfNode) => return vec![context],
        (true, _) => {
            let mut all = Vec::new();
            collect_descendants(context, &mut all);
            all
        }
        (false, _) => context.child_elements().collect(),
    };

    pool.into_iter()
        .filter(|element| match &step.test {
            NodeTest::Name(name) => element.matches(name, namespaces),
            NodeTest::Any | NodeTest::SelfNode => true,
        })
        .collect()
}

fn apply_predicates<'a>(
    mut elements: Vec<&'a XmlElement>,
    predicates: &[Predicate],
    namespaces: &NamespaceTable,
) -> Vec<&'a XmlElement> {
    for predicate in predicates {
        elements = match predicate {
            Predicate::Position(n) => elements.get(n - 1).copied().into_iter().collect(),
            Predicate::Last => elements.last().copied().into_iter().collect(),
            Predicate::HasAttribute(name) => elements
                .into_iter()
                .filter(|e| e.attribute_resolved(name, namespaces).is_some())
                .collect(),
            Predicate::AttributeEquals(name, value) => elements
                .into_iter()
                .filter(|e| e.attribute_resolved(name, namespaces) == Some(value.as_str()))
                .collect(),
            Predicate::HasChild(name) => elements
                .into_iter()
                .filter(|e| e.child_elements().any(|c| c.matches(name, namespaces)))
                .collect(),
            Predicate::ChildTextEquals(name, value) => elements
                .into_iter()
                .filter(|e| {
                    e.child_elements().any(|c| {
                        c.matches(name, namespaces)
                            && c.text().as_deref().map(str::trim) == Some(value.as_str())
                    })
                })
                .collect(),
        };
    }
    elements
}
