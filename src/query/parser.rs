//! Boolean query parser
//!
//! Turns normalized query text into a `QueryNode` tree. Clauses are combined
//! with `AND` / `OR` (exact, uppercase), adjacency means `AND`, `AND` binds
//! tighter than `OR`, and parentheses group. Anything that cannot be read as
//! a complete expression becomes `QueryNode::Invalid`, which matches nothing.
//! That includes misspelled operators such as `AN`, `O`, `ANDD` or `ORR`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::clause::ParsedQuery;

/// Parsed query tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryNode {
    /// A single clause understood by the key/value grammar
    String { value: String },
    And { values: Vec<QueryNode> },
    Or { values: Vec<QueryNode> },
    /// Malformed or unrecognized expression
    #[serde(other)]
    Invalid,
}

impl QueryNode {
    pub fn string(value: impl Into<String>) -> Self {
        QueryNode::String { value: value.into() }
    }
}

/// Tree plus the simple-query classification for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSearch {
    pub query: String,
    pub is_simple: bool,
    pub tree: QueryNode,
}

/// Bare or `::`-compressed IPv6 address
const IPV6_PATTERN: &str = r"^(?:[0-9A-Fa-f]{1,4}(?::[0-9A-Fa-f]{1,4}){7}|(?:[0-9A-Fa-f]{1,4}(?::[0-9A-Fa-f]{1,4}){0,6})?::(?:[0-9A-Fa-f]{1,4}(?::[0-9A-Fa-f]{1,4}){0,6})?)$";

static IPV6_REGEX: OnceLock<Regex> = OnceLock::new();

fn ipv6_regex() -> &'static Regex {
    IPV6_REGEX.get_or_init(|| Regex::new(IPV6_PATTERN).expect("IPv6 pattern is a valid regex"))
}

/// Queries that must never be read as `key:value` syntax
fn should_skip_field_search(query: &str) -> bool {
    ipv6_regex().is_match(query.trim())
}

/// A query is simple when it names no fields, or when it is an IPv6
/// address whose colons would otherwise look like field separators.
pub fn is_simple_query(query: &str, parsed: &ParsedQuery) -> bool {
    should_skip_field_search(query) || !parsed.has_field_conditions()
}

/// Parse normalized query text into a tree and classify it
pub fn parse_search(query: &str) -> ParsedSearch {
    let parsed = ParsedQuery::parse(query);
    let is_simple = is_simple_query(query, &parsed);

    let tree = if is_simple {
        QueryNode::string(query)
    } else {
        parse_tree(query)
    };

    log::debug!("Parsed query '{}': simple={}, tree={:?}", query, is_simple, tree);

    ParsedSearch {
        query: query.to_string(),
        is_simple,
        tree,
    }
}

/// Parse the boolean structure of `query`, ignoring the simple-query rule
pub fn parse_tree(query: &str) -> QueryNode {
    let tokens = tokenize(query);
    let mut parser = TreeParser { tokens: &tokens, pos: 0 };

    match parser.parse_expression() {
        Ok(node) if parser.pos == tokens.len() => node,
        Ok(_) => {
            log::debug!("Unexpected token at position {} in '{}'", parser.pos, query);
            QueryNode::Invalid
        }
        Err(reason) => {
            log::debug!("Malformed query '{}': {}", query, reason);
            QueryNode::Invalid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Clause(String),
    /// Uppercase word that looks like a truncated or overlong operator
    NearOperator(String),
    And,
    Or,
    Open,
    Close,
}

fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    fn flush(current: &mut String, tokens: &mut Vec<Token>) {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        tokens.push(match word.as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            _ if is_near_operator(&word) => Token::NearOperator(word),
            _ => Token::Clause(word),
        });
    }

    for ch in query.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            _ if in_quotes => current.push(ch),
            '(' if current.is_empty() => tokens.push(Token::Open),
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Close);
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

/// `A`, `AN`, `O` and `ANDD`, `ORR`, `ANDOR`: uppercase words built from
/// operator letters that start like `AND` / `OR` without being one.
fn is_near_operator(word: &str) -> bool {
    const OPERATOR_LETTERS: &[char] = &['A', 'N', 'D', 'O', 'R'];

    if word.is_empty() || !word.chars().all(|c| OPERATOR_LETTERS.contains(&c)) {
        return false;
    }

    ["AND", "OR"]
        .iter()
        .any(|op| op.starts_with(word) || word.starts_with(op))
}

struct TreeParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl TreeParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_expression(&mut self) -> Result<QueryNode, String> {
        let mut operands = vec![self.parse_conjunction()?];

        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            operands.push(self.parse_conjunction()?);
        }

        Ok(combine(Connective::Or, operands))
    }

    fn parse_conjunction(&mut self) -> Result<QueryNode, String> {
        let mut operands = vec![self.parse_primary()?];

        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                    operands.push(self.parse_primary()?);
                }
                Some(Token::Clause(_)) | Some(Token::Open) | Some(Token::NearOperator(_)) => {
                    operands.push(self.parse_primary()?);
                }
                _ => break,
            }
        }

        Ok(combine(Connective::And, operands))
    }

    fn parse_primary(&mut self) -> Result<QueryNode, String> {
        match self.peek().cloned() {
            Some(Token::Clause(clause)) => {
                self.pos += 1;
                Ok(QueryNode::string(clause))
            }
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.parse_expression()?;
                if self.peek() != Some(&Token::Close) {
                    return Err("unbalanced parenthesis".to_string());
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(Token::And) | Some(Token::Or) => {
                Err(format!("operator without left operand at position {}", self.pos))
            }
            Some(Token::NearOperator(word)) => {
                Err(format!("unrecognized operator '{}' at position {}", word, self.pos))
            }
            Some(Token::Close) => Err(format!("unexpected ')' at position {}", self.pos)),
            None => Err("expression ended where an operand was expected".to_string()),
        }
    }
}

#[derive(Clone, Copy)]
enum Connective {
    And,
    Or,
}

/// Build an n-ary node, absorbing children of the same connective.
/// A single operand is returned as-is.
fn combine(connective: Connective, operands: Vec<QueryNode>) -> QueryNode {
    if operands.len() == 1 {
        return operands.into_iter().next().unwrap_or(QueryNode::Invalid);
    }

    let mut values = Vec::with_capacity(operands.len());
    for operand in operands {
        match (connective, operand) {
            (Connective::And, QueryNode::And { values: inner })
            | (Connective::Or, QueryNode::Or { values: inner }) => values.extend(inner),
            (_, other) => values.push(other),
        }
    }

    match connective {
        Connective::And => QueryNode::And { values },
        Connective::Or => QueryNode::Or { values },
    }
}
