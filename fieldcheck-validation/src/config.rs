//! Validator configuration types.

use crate::validators::{standard_aliases, standard_rules};
use crate::Rule;
use serde::{Deserialize, Serialize};

/// Everything a [`Validator`](crate::Validator) is built from.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Prefix nested failures with their parent field names.
    pub full_error_path: bool,
    /// Rules to install, later entries overwrite earlier ones.
    pub rules: Vec<Rule>,
    /// Aliases to install, in order.
    pub aliases: Vec<(String, String)>,
}

impl ValidatorConfig {
    /// Create a new builder.
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Standard rules and aliases, short field names.
    pub fn standard() -> Self {
        Self::builder().standard_rules().standard_aliases().build()
    }
}

/// Builder for validator configuration.
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Install the packaged rules.
    pub fn standard_rules(mut self) -> Self {
        self.config.rules.extend(standard_rules());
        self
    }

    /// Install the packaged aliases.
    pub fn standard_aliases(mut self) -> Self {
        self.config.aliases.extend(
            standard_aliases()
                .into_iter()
                .map(|(name, declaration)| (name.to_string(), declaration.to_string())),
        );
        self
    }

    /// Report nested failures as `Parent.Child`.
    pub fn full_error_path(mut self) -> Self {
        self.config.full_error_path = true;
        self
    }

    /// Add a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.config.rules.push(rule);
        self
    }

    /// Add an alias. It may reference any rule and any alias added before it.
    pub fn alias(mut self, name: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.config.aliases.push((name.into(), declaration.into()));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}

/// Serializable subset of [`ValidatorConfig`] for application config files.
///
/// Custom rules carry closures and can only be added in code, through
/// [`ValidatorConfigBuilder::rule`] on the result of [`into_builder`](Self::into_builder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Prefix nested failures with their parent field names.
    pub full_error_path: bool,
    /// Install the packaged rules.
    pub standard_rules: bool,
    /// Install the packaged aliases.
    pub standard_aliases: bool,
    /// Extra aliases as `[name, declaration]` pairs, installed in order.
    pub aliases: Vec<(String, String)>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            full_error_path: false,
            standard_rules: true,
            standard_aliases: true,
            aliases: Vec::new(),
        }
    }
}

impl ValidatorOptions {
    /// Builder seeded with these options.
    pub fn into_builder(self) -> ValidatorConfigBuilder {
        let mut builder = ValidatorConfig::builder();
        if self.standard_rules {
            builder = builder.standard_rules();
        }
        if self.standard_aliases {
            builder = builder.standard_aliases();
        }
        if self.full_error_path {
            builder = builder.full_error_path();
        }
        for (name, declaration) in self.aliases {
            builder = builder.alias(name, declaration);
        }
        builder
    }

    /// Configuration described by these options.
    pub fn into_config(self) -> ValidatorConfig {
        self.into_builder().build()
    }
}
