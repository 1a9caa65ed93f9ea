// SPDX-License-Identifier: MIT

//! HTML email templates

use crate::engine::error::EmailError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Built-in templates with named placeholders
static NAMED_TEMPLATES: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "<html><body><h1>Hello, {salutation} {fullName}!</h1><p>Welcome to our service.</p></body></html>".to_string(),
        "<html><body><h1>Dear {firstName},</h1><p>Your order #{projectName} has been shipped.</p></body></html>".to_string(),
        "<html><body><h1>Hi {firstName},</h1><p>We have received your request and will respond shortly.</p></body></html>".to_string(),
    ]
});

/// Built-in templates with positional placeholders, same ids as the named set
static POSITIONAL_TEMPLATES: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "<html><body><h1>Hello, {0} {1}!</h1><p>Welcome to our service.</p></body></html>".to_string(),
        "<html><body><h1>Dear {0},</h1><p>Your order #{1} has been shipped.</p></body></html>".to_string(),
        "<html><body><h1>Hi {0},</h1><p>We have received your request and will respond shortly.</p></body></html>".to_string(),
    ]
});

/// Two template sets: one rendered by name (`{key}`), one by position (`{0}`, `{1}`)
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    named: Vec<String>,
    positional: Vec<String>,
}

impl EmailTemplates {
    pub fn new(named: Vec<String>, positional: Vec<String>) -> Self {
        Self { named, positional }
    }

    pub fn named_len(&self) -> usize {
        self.named.len()
    }

    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    fn get(list: &[String], template_id: usize) -> Result<&str, EmailError> {
        list.get(template_id)
            .map(String::as_str)
            .ok_or(EmailError::UnknownTemplate(template_id))
    }

    /// Replace `{0}`, `{1}`, ... in a positional template with `values`.
    ///
    /// The template needs exactly one value per index up to its highest
    /// placeholder. Substituted values are never rescanned.
    pub fn format_positional(
        &self,
        template_id: usize,
        values: &[String],
    ) -> Result<String, EmailError> {
        let template = Self::get(&self.positional, template_id)?;
        let expected = placeholders(template)
            .iter()
            .filter_map(|p| p.parse::<usize>().ok())
            .max()
            .map_or(0, |highest| highest + 1);

        if values.len() != expected {
            return Err(EmailError::PlaceholderCount {
                template_id,
                expected,
                provided: values.len(),
            });
        }

        let mut rendered = String::with_capacity(template.len());
        for segment in segments(template) {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Placeholder(name) => match name.parse::<usize>() {
                    Ok(index) => rendered.push_str(&values[index]),
                    Err(_) => {
                        rendered.push('{');
                        rendered.push_str(name);
                        rendered.push('}');
                    }
                },
            }
        }
        Ok(rendered)
    }

    /// Replace `{key}` in a named template with `data[key]`; every
    /// placeholder must be covered
    pub fn fill_named(
        &self,
        template_id: usize,
        data: &HashMap<String, String>,
    ) -> Result<String, EmailError> {
        let template = Self::get(&self.named, template_id)?;

        let mut rendered = String::with_capacity(template.len());
        for segment in segments(template) {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Placeholder(name) => match data.get(name) {
                    Some(value) => rendered.push_str(value),
                    None => {
                        return Err(EmailError::UnresolvedPlaceholder {
                            template_id,
                            placeholder: name.to_string(),
                        })
                    }
                },
            }
        }
        Ok(rendered)
    }
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self::new(NAMED_TEMPLATES.clone(), POSITIONAL_TEMPLATES.clone())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and `{name}` placeholders, left to right.
/// `{}` and an unclosed `{` stay literal.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let end = match after.find('}') {
            Some(end) => end,
            None => break,
        };
        let name = &after[..end];
        if name.is_empty() {
            out.push(Segment::Text(&rest[..start + 2]));
        } else {
            if start > 0 {
                out.push(Segment::Text(&rest[..start]));
            }
            out.push(Segment::Placeholder(name));
        }
        rest = &after[end + 1..];
    }
    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// Distinct `{name}` placeholders in order of first appearance
fn placeholders(template: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::new();
    for segment in segments(template) {
        if let Segment::Placeholder(name) = segment {
            if !found.contains(&name) {
                found.push(name);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional() -> EmailTemplates {
        EmailTemplates::new(
            Vec::new(),
            vec![
                "<h1>Hello, {0} {1}!</h1>".to_string(),
                "<h1>Dear {0},</h1><p>Order #{1}, again {0}</p>".to_string(),
                "<p>{0} / {1}</p>".to_string(),
            ],
        )
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_format_positional() {
        let rendered = positional()
            .format_positional(0, &strings(&["Dr.", "Ada Lovelace"]))
            .unwrap();
        assert_eq!(rendered, "<h1>Hello, Dr. Ada Lovelace!</h1>");
    }

    #[test]
    fn test_positional_repeated_placeholder() {
        let rendered = positional()
            .format_positional(1, &strings(&["Ada", "42"]))
            .unwrap();
        assert_eq!(rendered, "<h1>Dear Ada,</h1><p>Order #42, again Ada</p>");
    }

    #[test]
    fn test_positional_count_mismatch() {
        let err = positional()
            .format_positional(0, &strings(&["only one"]))
            .unwrap_err();
        assert!(matches!(
            err,
            EmailError::PlaceholderCount {
                template_id: 0,
                expected: 2,
                provided: 1
            }
        ));
    }

    #[test]
    fn test_positional_values_are_not_rescanned() {
        let rendered = positional()
            .format_positional(2, &strings(&["{1}", "x"]))
            .unwrap();
        assert_eq!(rendered, "<p>{1} / x</p>");
    }

    #[test]
    fn test_default_positional_templates() {
        let templates = EmailTemplates::default();
        assert_eq!(templates.positional_len(), 3);
        assert_eq!(
            templates
                .format_positional(1, &strings(&["Ada", "42"]))
                .unwrap(),
            "<html><body><h1>Dear Ada,</h1><p>Your order #42 has been shipped.</p></body></html>"
        );
        assert!(matches!(
            templates.format_positional(2, &strings(&["Ada", "extra"])),
            Err(EmailError::PlaceholderCount {
                expected: 1,
                provided: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_template() {
        let templates = EmailTemplates::default();
        assert!(matches!(
            templates.fill_named(99, &HashMap::new()),
            Err(EmailError::UnknownTemplate(99))
        ));
        assert!(matches!(
            templates.format_positional(3, &[]),
            Err(EmailError::UnknownTemplate(3))
        ));
    }

    #[test]
    fn test_fill_named() {
        let rendered = EmailTemplates::default()
            .fill_named(1, &data(&[("firstName", "Ada"), ("projectName", "PX-7")]))
            .unwrap();
        assert_eq!(
            rendered,
            "<html><body><h1>Dear Ada,</h1><p>Your order #PX-7 has been shipped.</p></body></html>"
        );
    }

    #[test]
    fn test_fill_named_values_are_not_rescanned() {
        let rendered = EmailTemplates::default()
            .fill_named(
                1,
                &data(&[("firstName", "{projectName}"), ("projectName", "PX-7")]),
            )
            .unwrap();
        assert_eq!(
            rendered,
            "<html><body><h1>Dear {projectName},</h1><p>Your order #PX-7 has been shipped.</p></body></html>"
        );
    }

    #[test]
    fn test_fill_named_unresolved() {
        let err = EmailTemplates::default()
            .fill_named(0, &data(&[("salutation", "Ms.")]))
            .unwrap_err();
        match err {
            EmailError::UnresolvedPlaceholder {
                template_id,
                placeholder,
            } => {
                assert_eq!(template_id, 0);
                assert_eq!(placeholder, "fullName");
            }
            other => panic!("Expected UnresolvedPlaceholder, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let rendered = EmailTemplates::default()
            .fill_named(2, &data(&[("firstName", "Bo"), ("unused", "x")]))
            .unwrap();
        assert!(rendered.contains("Hi Bo,"));
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("a{x}b{}c{y"),
            vec![
                Segment::Text("a"),
                Segment::Placeholder("x"),
                Segment::Text("b{}"),
                Segment::Text("c{y"),
            ]
        );
        assert_eq!(placeholders("{0}{1}{0}"), vec!["0", "1"]);
    }
}
