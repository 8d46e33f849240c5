//! Inline tree specifiers.
//!
//! A checklist can be given on the command line (and in tests) as nested
//! parenthesized lists: `(Genus species1 species2 (Subgenus species3))`.
//! The first element of a list names the node when it is a bare name;
//! a list whose head is itself a list gets a synthesized name. Names
//! double as taxon ids, underscores read as spaces.

use crate::errors::{Error, ParseError};
use crate::properties::{self, PropertyId, PropertyRegistry};
use crate::readers::table::Rows;

pub fn parse(specifier: &str, registry: &mut PropertyRegistry) -> Result<(Vec<PropertyId>, Rows), Error> {
    let columns = vec![
        registry.resolve("taxonID"),
        registry.resolve("canonicalName"),
        registry.resolve("parentNameUsageID"),
    ];
    debug_assert_eq!(columns[0], properties::TAXON_ID);

    let tokens = tokenize(specifier);
    let mut parser = Parser {
        tokens,
        position: 0,
        rows: Vec::new(),
        synthesized: 0,
    };
    while !parser.at_end() {
        parser.tree(None)?;
    }
    if parser.rows.is_empty() {
        return Err(ParseError::BadSpecifier(specifier.to_string()).into());
    }
    Ok((columns, parser.rows))
}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Name(String),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut name = String::new();
    for ch in input.chars() {
        match ch {
            '(' | ')' | ' ' | '\t' | '\r' | '\n' => {
                if !name.is_empty() {
                    tokens.push(Token::Name(std::mem::take(&mut name)));
                }
                match ch {
                    '(' => tokens.push(Token::Open),
                    ')' => tokens.push(Token::Close),
                    _ => {}
                }
            }
            '_' => name.push(' '),
            other => name.push(other),
        }
    }
    if !name.is_empty() {
        tokens.push(Token::Name(name));
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    rows: Rows,
    synthesized: usize,
}

impl Parser {
    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn push_row(&mut self, name: &str, parent: Option<&str>) {
        self.rows.push(vec![
            Some(name.to_string()),
            Some(name.to_string()),
            parent.map(|p| p.to_string()),
        ]);
    }

    /// Parse one tree and return the name of its root node.
    fn tree(&mut self, parent: Option<&str>) -> Result<String, Error> {
        match self.tokens.get(self.position) {
            Some(Token::Name(name)) => {
                let name = name.clone();
                self.position += 1;
                self.push_row(&name, parent);
                Ok(name)
            }
            Some(Token::Open) => {
                self.position += 1;
                // a bare name heads the list; a nested list means the node
                // itself is anonymous
                let head = match self.tokens.get(self.position) {
                    Some(Token::Name(name)) => {
                        let name = name.clone();
                        self.position += 1;
                        name
                    }
                    Some(Token::Open) => {
                        self.synthesized += 1;
                        format!("node{}", self.synthesized)
                    }
                    _ => return Err(ParseError::BadSpecifier("empty list".to_string()).into()),
                };
                self.push_row(&head, parent);
                loop {
                    match self.tokens.get(self.position) {
                        Some(Token::Close) => {
                            self.position += 1;
                            break;
                        }
                        Some(_) => {
                            self.tree(Some(head.as_str()))?;
                        }
                        None => return Err(ParseError::BadSpecifier("unbalanced parentheses".to_string()).into()),
                    }
                }
                Ok(head)
            }
            _ => Err(ParseError::BadSpecifier("unexpected token".to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_and_parents(specifier: &str) -> Vec<(String, Option<String>)> {
        let mut registry = PropertyRegistry::new();
        let (_, rows) = parse(specifier, &mut registry).unwrap();
        rows.into_iter()
            .map(|row| (row[1].clone().unwrap(), row[2].clone()))
            .collect()
    }

    #[test]
    fn flat_tree() {
        let rows = names_and_parents("(Microcebus M_murinus M_rufus)");
        assert_eq!(rows, vec![
            ("Microcebus".to_string(), None),
            ("M murinus".to_string(), Some("Microcebus".to_string())),
            ("M rufus".to_string(), Some("Microcebus".to_string())),
        ]);
    }

    #[test]
    fn nested_tree_with_anonymous_root() {
        let rows = names_and_parents("((p x y) (q z))");
        assert_eq!(rows[0], ("node1".to_string(), None));
        assert_eq!(rows[1], ("p".to_string(), Some("node1".to_string())));
        assert_eq!(rows[4], ("q".to_string(), Some("node1".to_string())));
        assert_eq!(rows[5], ("z".to_string(), Some("q".to_string())));
    }

    #[test]
    fn unbalanced_specifier_is_rejected() {
        let mut registry = PropertyRegistry::new();
        assert!(parse("(a (b c)", &mut registry).is_err());
    }
}
