// Rule registry and alias expansion

use crate::parser::parse_declaration;
use crate::{UsageError, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Checker returning whether a value passes, given the tag parameter.
pub type Checker = Arc<dyn Fn(&Value<'_>, &str) -> Result<bool, UsageError> + Send + Sync>;

/// Produces the failure description for a field.
pub type Formatter = Arc<dyn Fn(&str, &Value<'_>, &Tag) -> String + Send + Sync>;

/// Named checker plus error message producer.
///
/// A rule without formatter stops the rule chain silently when its checker
/// fails; this is how `optional` works.
#[derive(Clone)]
pub struct Rule {
    name: String,
    checker: Checker,
    formatter: Option<Formatter>,
}

impl Rule {
    /// Create a rule reporting failures through `formatter`
    pub fn new<C, F>(name: impl Into<String>, checker: C, formatter: F) -> Self
    where
        C: Fn(&Value<'_>, &str) -> Result<bool, UsageError> + Send + Sync + 'static,
        F: Fn(&str, &Value<'_>, &Tag) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            checker: Arc::new(checker),
            formatter: Some(Arc::new(formatter)),
        }
    }

    /// Create a rule that stops the chain without reporting a failure
    pub fn silent<C>(name: impl Into<String>, checker: C) -> Self
    where
        C: Fn(&Value<'_>, &str) -> Result<bool, UsageError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            checker: Arc::new(checker),
            formatter: None,
        }
    }

    /// Rule name as used in declarations
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the checker
    pub fn check(&self, value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
        (self.checker)(value, param)
    }

    /// Failure description, `None` for silent rules
    pub fn format(&self, field: &str, value: &Value<'_>, tag: &Tag) -> Option<String> {
        self.formatter.as_ref().map(|f| f(field, value, tag))
    }

    /// Whether a failure stops the chain without an error
    pub fn is_silent(&self) -> bool {
        self.formatter.is_none()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("silent", &self.is_silent())
            .finish()
    }
}

/// One resolved rule invocation parsed from a declaration.
#[derive(Debug, Clone)]
pub struct Tag {
    /// Name as written in the declaration
    pub name: String,

    /// Rule the name resolved to
    pub rule: Rule,

    /// Parameter after `=`, empty when absent
    pub param: String,
}

/// Registered rules and resolved aliases.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
    aliases: HashMap<String, Arc<[Tag]>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing any rule with the same name
    pub fn add_rule(&mut self, rule: Rule) {
        trace!(rule = %rule.name, "registered validation rule");
        self.rules.insert(rule.name.clone(), rule);
    }

    /// Add an alias, replacing any alias with the same name.
    ///
    /// The declaration is resolved immediately against the rules and
    /// aliases registered so far.
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        declaration: &str,
    ) -> Result<(), UsageError> {
        let alias = alias.into();
        let tags = parse_declaration(self, declaration)?;
        trace!(alias = %alias, declaration, rules = tags.len(), "registered validation alias");
        self.aliases.insert(alias, tags.into());
        Ok(())
    }

    /// Look up a rule
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Look up the resolved tags of an alias
    pub fn alias(&self, name: &str) -> Option<&[Tag]> {
        self.aliases.get(name).map(|tags| &tags[..])
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
