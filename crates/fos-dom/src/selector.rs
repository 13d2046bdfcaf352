//! Selector matching
//!
//! The subset of CSS selectors the component layer relies on:
//! type, universal, `#id`, `.class`, attribute selectors
//! (`[a]`, `[a=v]`, `[a*=v]`, `[a^=v]`, `[a$=v]`, `[a~=v]`),
//! the descendant combinator and comma-separated lists.

use crate::{DomTree, NodeId};

/// Selector syntax error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {input:?} at {position}: {reason}")]
pub struct SelectorError {
    pub input: String,
    pub position: usize,
    pub reason: &'static str,
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Compounds joined by descendant combinators, left to right
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// `None` is the universal selector
    tag: Option<String>,
    components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Id(String),
    Class(String),
    Attr { name: String, test: Option<(AttrOp, String)> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Contains,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            input,
            chars: input.chars().collect(),
            pos: 0,
        };
        Ok(Self {
            alternatives: parser.list()?,
        })
    }

    /// Check if an element matches any alternative
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(tree, node))
    }
}

impl Complex {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let mut rest = self.compounds.iter().rev();
        match rest.next() {
            Some(last) if last.matches(tree, node) => {}
            _ => return false,
        }
        let mut ancestors = tree.ancestors(node);
        'compounds: for compound in rest {
            for ancestor in ancestors.by_ref() {
                if compound.matches(tree, ancestor) {
                    continue 'compounds;
                }
            }
            return false;
        }
        true
    }
}

impl Compound {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.get(node).and_then(|n| n.as_element()) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|tag| *tag != element.tag) {
            return false;
        }
        self.components.iter().all(|component| match component {
            Component::Id(id) => element.attrs.get("id") == Some(id.as_str()),
            Component::Class(class) => element.attrs.tokens("class").any(|c| c == class),
            Component::Attr { name, test: None } => element.attrs.has(name),
            Component::Attr {
                name,
                test: Some((op, expected)),
            } => element
                .attrs
                .get(name)
                .is_some_and(|value| op.test(value, expected)),
        })
    }
}

impl AttrOp {
    fn test(self, value: &str, expected: &str) -> bool {
        match self {
            Self::Equals => value == expected,
            Self::Includes => value.split_whitespace().any(|t| t == expected),
            // Empty operands never match for substring operators
            Self::Prefix => !expected.is_empty() && value.starts_with(expected),
            Self::Suffix => !expected.is_empty() && value.ends_with(expected),
            Self::Contains => !expected.is_empty() && value.contains(expected),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> SelectorError {
        SelectorError {
            input: self.input.to_string(),
            position: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(alternatives),
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.compound()?];
        loop {
            let separated = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if separated => compounds.push(self.compound()?),
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
        Ok(Complex { compounds })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => self.pos += 1,
            Some(c) if is_ident_char(c) => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.components.push(Component::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.components.push(Component::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.components.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Component, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(Component::Attr { name, test: None }),
            Some('=') => AttrOp::Equals,
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.expect('=', "expected '=' in attribute selector")?;
                match c {
                    '~' => AttrOp::Includes,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Contains,
                }
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.string(quote)?
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        self.expect(']', "expected ']'")?;
        Ok(Component::Attr {
            name,
            test: Some((op, value)),
        })
    }

    fn string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                let escaped = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
                ident.push(escaped);
            } else if is_ident_char(c) {
                self.pos += 1;
                ident.push(c);
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(ident)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let form = tree.create_element("form");
        tree.set_attribute(form, "class", "stacked wide").unwrap();
        let input = tree.create_element("input");
        tree.set_attribute(input, "id", "email-12").unwrap();
        tree.set_attribute(input, "aria-describedby", "help err").unwrap();
        let help = tree.create_element("span");
        tree.set_attribute(help, "id", "help-3").unwrap();
        tree.append_child(tree.root(), form).unwrap();
        tree.append_child(form, input).unwrap();
        tree.append_child(tree.root(), help).unwrap();
        (tree, form, input, help)
    }

    #[test]
    fn test_compound_matching() {
        let (tree, form, input, _) = fixture();
        let sel = |s: &str| Selector::parse(s).unwrap();

        assert!(sel("form.stacked").matches(&tree, form));
        assert!(!sel("form.narrow").matches(&tree, form));
        assert!(sel("#email-12").matches(&tree, input));
        assert!(sel("INPUT[aria-describedby]").matches(&tree, input));
        assert!(sel("[aria-describedby~=err]").matches(&tree, input));
        assert!(sel("*").matches(&tree, input));
        assert!(!sel("[aria-describedby=help]").matches(&tree, input));
    }

    #[test]
    fn test_descendant_combinator() {
        let (tree, _, input, help) = fixture();
        let sel = Selector::parse("form  input").unwrap();
        assert!(sel.matches(&tree, input));
        assert!(!Selector::parse("form span").unwrap().matches(&tree, help));
    }

    #[test]
    fn test_substring_list() {
        let (tree, _, input, help) = fixture();
        let found = tree
            .query_selector_all(tree.root(), r#"[id*="help"], [id*='email']"#)
            .unwrap();
        assert_eq!(found, vec![input, help]);
        assert!(tree.query_selector_all(tree.root(), "[id*='']").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "a,", "[id*=\"a\"b\"]", "[id", "div > p", "[id*=\"open", ".#"] {
            assert!(Selector::parse(bad).is_err(), "{bad:?} should fail");
        }
        let err = Selector::parse("[id*=\"x\"y\"]").unwrap_err();
        assert_eq!(err.reason, "expected ']'");
    }
}
