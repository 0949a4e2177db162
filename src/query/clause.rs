//! Key/value clause grammar
//!
//! Splits query text into field conditions (`tags:a,b`, `-label:web`) and
//! free text. Tokens are whitespace separated, double quotes group spaces
//! into a single value, a leading `-` excludes the token, and commas split a
//! field's values.

/// A `key:value[,value...]` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub keyword: String,
    pub values: Vec<String>,
    pub negated: bool,
}

/// A token that carries no field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub negated: bool,
}

/// Result of running the clause grammar over some query text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub conditions: Vec<Condition>,
    pub text_segments: Vec<TextSegment>,
}

/// What a single clause asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInfo {
    pub search_terms: Vec<String>,
    pub field_name: Option<String>,
    pub is_negated: bool,
}

impl ParsedQuery {
    pub fn parse(input: &str) -> Self {
        let mut parsed = ParsedQuery::default();

        for token in split_tokens(input) {
            let (negated, body) = match token.strip_prefix('-') {
                Some(rest) if !rest.is_empty() => (true, rest),
                _ => (false, token.as_str()),
            };

            match split_condition(body) {
                Some((keyword, values)) => parsed.add_condition(keyword, values, negated),
                None => parsed.text_segments.push(TextSegment {
                    text: strip_quotes(body).to_string(),
                    negated,
                }),
            }
        }

        parsed
    }

    fn add_condition(&mut self, keyword: &str, values: Vec<String>, negated: bool) {
        if let Some(existing) = self
            .conditions
            .iter_mut()
            .find(|c| c.keyword == keyword && c.negated == negated)
        {
            existing.values.extend(values);
            return;
        }

        self.conditions.push(Condition {
            keyword: keyword.to_string(),
            values,
            negated,
        });
    }

    /// True when at least one `key:value` constraint was found
    pub fn has_field_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Summarize the clause by its first field condition.
    ///
    /// Clauses without any condition report no field name; their search
    /// terms are the free-text segments.
    pub fn query_info(&self) -> QueryInfo {
        match self.conditions.first() {
            Some(condition) => QueryInfo {
                search_terms: condition.values.clone(),
                field_name: Some(condition.keyword.clone()),
                is_negated: condition.negated,
            },
            None => QueryInfo {
                search_terms: self.text_segments.iter().map(|s| s.text.clone()).collect(),
                field_name: None,
                is_negated: false,
            },
        }
    }
}

/// Split on whitespace outside double quotes. Quotes are kept in the token.
pub(crate) fn split_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Recognize `key:v1,v2`. Returns `None` for free text, including `key:` with
/// no usable value and tokens whose key would be quoted.
fn split_condition(token: &str) -> Option<(&str, Vec<String>)> {
    let (keyword, raw_values) = token.split_once(':')?;
    if keyword.is_empty() || keyword.contains('"') {
        return None;
    }

    let values: Vec<String> = split_values(raw_values)
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() {
        return None;
    }

    Some((keyword, values))
}

/// Comma-split a value list, ignoring commas inside quotes
fn split_values(raw: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    values.push(current);

    values
}

pub(crate) fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_conditions() {
        for query in ["-hello world", "hello world", "hello -world"] {
            let parsed = ParsedQuery::parse(query);
            assert!(!parsed.has_field_conditions(), "{:?}", query);
            assert_eq!(parsed.text_segments.len(), 2);
        }
    }

    #[test]
    fn test_field_conditions() {
        for query in ["label:hello", "tags:hello,world", "-label:hello"] {
            assert!(ParsedQuery::parse(query).has_field_conditions(), "{:?}", query);
        }
    }

    #[test]
    fn test_multi_value_condition() {
        let parsed = ParsedQuery::parse("tags:my-app,my-other-app");
        assert_eq!(
            parsed.conditions,
            vec![Condition {
                keyword: "tags".to_string(),
                values: vec!["my-app".to_string(), "my-other-app".to_string()],
                negated: false,
            }]
        );
    }

    #[test]
    fn test_query_info_negated() {
        let info = ParsedQuery::parse("-tag:my-app").query_info();
        assert!(info.is_negated);
        assert_eq!(info.field_name.as_deref(), Some("tag"));
        assert_eq!(info.search_terms, vec!["my-app"]);
    }

    #[test]
    fn test_query_info_field_name() {
        let info = ParsedQuery::parse("-tags:my-app").query_info();
        assert_eq!(info.field_name.as_deref(), Some("tags"));

        let info = ParsedQuery::parse("tags:my-app,my-other-app").query_info();
        assert_eq!(info.field_name.as_deref(), Some("tags"));
        assert!(!info.is_negated);
        assert_eq!(info.search_terms, vec!["my-app", "my-other-app"]);
    }

    #[test]
    fn test_repeated_keys_merge() {
        let parsed = ParsedQuery::parse("tags:a tags:b -tags:c");
        assert_eq!(parsed.conditions.len(), 2);
        assert_eq!(parsed.conditions[0].values, vec!["a", "b"]);
        assert!(parsed.conditions[1].negated);
    }

    #[test]
    fn test_quoted_values() {
        let parsed = ParsedQuery::parse(r#"label:"my linode",other "free text""#);
        assert_eq!(parsed.conditions[0].values, vec!["my linode", "other"]);
        assert_eq!(parsed.text_segments[0].text, "free text");
    }

    #[test]
    fn test_incomplete_condition_is_text() {
        let parsed = ParsedQuery::parse("label: :value");
        assert!(!parsed.has_field_conditions());
        assert_eq!(parsed.text_segments.len(), 2);
    }

    #[test]
    fn test_lone_dash_is_text() {
        let parsed = ParsedQuery::parse("-");
        assert_eq!(
            parsed.text_segments,
            vec![TextSegment { text: "-".to_string(), negated: false }]
        );
    }
}
