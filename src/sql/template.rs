use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::period::Period;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unterminated tag at byte {offset} in template '{template}'")]
    Unterminated { template: &'static str, offset: usize },

    #[error("'{key}' is a value and cannot be inserted unescaped in template '{template}'")]
    UnescapedValue { template: &'static str, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    /// Caller-derived text; quote-escaped on insertion.
    Value(String),
    /// SQL drawn from a closed set of constants.
    Fragment(&'static str),
}

/// Values bound to the placeholders of one [`QueryTemplate`] invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<&'static str, Bound>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, Bound::Value(value.into()));
        self
    }

    pub fn int(self, key: &'static str, value: i64) -> Self {
        self.text(key, value.to_string())
    }

    pub fn date(self, key: &'static str, value: NaiveDate) -> Self {
        self.text(key, value.format("%Y-%m-%d").to_string())
    }

    /// Binds `begin` and `end`.
    pub fn period(self, period: &Period) -> Self {
        self.date("begin", period.begin()).date("end", period.end())
    }

    /// Binds a constant SQL fragment, the only kind of value allowed in a
    /// `{{{triple}}}` tag.
    pub fn fragment(mut self, key: &'static str, sql: &'static str) -> Self {
        self.values.insert(key, Bound::Fragment(sql));
        self
    }

    /// The bound text for `key`, unescaped.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|b| match b {
            Bound::Value(v) => v.as_str(),
            Bound::Fragment(f) => f,
        })
    }
}

/// A named SQL template with Mustache-style placeholders.
///
/// * `{{key}}` inserts the bound value with single quotes doubled.
/// * `{{{key}}}` inserts a bound fragment verbatim.
/// * Unbound keys render as the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplate {
    name: &'static str,
    text: &'static str,
}

impl QueryTemplate {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn render(&self, params: &QueryParams) -> Result<String, RenderError> {
        let src = self.text;
        let mut out = String::with_capacity(src.len() + 64);
        let mut pos = 0;

        while let Some(rel) = src[pos..].find("{{") {
            let start = pos + rel;
            out.push_str(&src[pos..start]);

            let raw = src[start..].starts_with("{{{");
            let (open, close) = if raw { ("{{{", "}}}") } else { ("{{", "}}") };
            let body_start = start + open.len();
            let Some(body_len) = src[body_start..].find(close) else {
                return Err(RenderError::Unterminated {
                    template: self.name,
                    offset: start,
                });
            };
            let key = src[body_start..body_start + body_len].trim();

            match (params.values.get(key), raw) {
                (None, _) => {}
                (Some(Bound::Fragment(sql)), _) => out.push_str(sql),
                (Some(Bound::Value(v)), false) => out.push_str(&v.replace('\'', "''")),
                (Some(Bound::Value(_)), true) => {
                    return Err(RenderError::UnescapedValue {
                        template: self.name,
                        key: key.to_string(),
                    });
                }
            }

            pos = body_start + body_len + close.len();
        }

        out.push_str(&src[pos..]);
        Ok(out)
    }
}
