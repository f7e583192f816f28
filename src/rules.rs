use crate::error::ComposeError;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reserved token replaced by the current date
pub const DATE_TOKEN: &str = "{{DATE}}";

/// Reserved token replaced by the current time
pub const TIME_TOKEN: &str = "{{TIME}}";

/// Replacement rule
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementRule {
    /// Token to replace
    pub from: String,

    /// String to replace it with
    pub to: String,
}

/// Ordered replacement rules: JSON keys in file order, then any reserved
/// tokens the file did not define
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<ReplacementRule>,
}

impl RuleSet {
    /// Load rules from a JSON file, stamping reserved tokens with the local clock
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        if !path.is_file() {
            return Err(ComposeError::RulesNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)
            .map_err(|source| ComposeError::UnreadableRules { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text, Local::now().naive_local())
    }

    /// Parse rules from JSON text, with `now` feeding the reserved tokens
    pub fn from_json_str(text: &str, now: NaiveDateTime) -> Result<Self, ComposeError> {
        let value: Value = serde_json::from_str(text)?;
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(ComposeError::RulesNotObject),
        };

        let mut rules = Vec::with_capacity(map.len() + 2);
        for (token, replacement) in map {
            match replacement {
                Value::String(to) => rules.push(ReplacementRule { from: token, to }),
                _ => return Err(ComposeError::NonStringReplacement { token }),
            }
        }

        let mut set = RuleSet { rules };
        set.insert_default(DATE_TOKEN, now.format("%Y-%m-%d").to_string());
        set.insert_default(TIME_TOKEN, now.format("%H:%M:%S").to_string());
        Ok(set)
    }

    /// Append a rule unless the token is already defined
    pub fn insert_default(&mut self, from: &str, to: String) {
        if !self.contains(from) {
            self.rules.push(ReplacementRule { from: from.to_string(), to });
        }
    }

    pub fn contains(&self, from: &str) -> bool {
        self.rules.iter().any(|rule| rule.from == from)
    }

    #[cfg(test)]
    pub fn get(&self, from: &str) -> Option<&str> {
        self.rules.iter()
            .find(|rule| rule.from == from)
            .map(|rule| rule.to.as_str())
    }
}
