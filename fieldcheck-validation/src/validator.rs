// Validation engine

use crate::parser::TagCache;
use crate::{
    Error, FieldError, FieldErrors, Result, Rule, RuleRegistry, ToValue, UsageError, Validate,
    ValidatorConfig, Value,
};
use once_cell::sync::Lazy;
use tracing::warn;

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::standard);

/// Validator with the standard rules and aliases, built on first use.
pub fn default_validator() -> &'static Validator {
    &DEFAULT_VALIDATOR
}

/// Walks records and applies the rule chains declared on their fields.
///
/// Build one per configuration and share it; parsed declarations are cached
/// per validator and safe to populate from many threads.
#[derive(Debug)]
pub struct Validator {
    registry: RuleRegistry,
    cache: TagCache,
    full_error_path: bool,
}

impl Validator {
    /// Create a validator from a configuration.
    ///
    /// Fails when an alias names an unknown rule or alias.
    pub fn new(config: ValidatorConfig) -> std::result::Result<Self, UsageError> {
        let mut registry = RuleRegistry::new();
        for rule in config.rules {
            registry.add_rule(rule);
        }
        for (name, declaration) in &config.aliases {
            registry.add_alias(name.as_str(), declaration)?;
        }

        Ok(Self {
            registry,
            cache: TagCache::new(),
            full_error_path: config.full_error_path,
        })
    }

    /// Validator with the standard rules and aliases.
    pub fn standard() -> Self {
        Self::new(ValidatorConfig::standard())
            .expect("standard aliases only reference standard rules")
    }

    /// Whether nested failures are reported as `Parent.Child`
    pub fn full_error_path(&self) -> bool {
        self.full_error_path
    }

    /// Registered rules and aliases
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Number of declarations parsed so far
    pub fn cached_declarations(&self) -> usize {
        self.cache.len()
    }

    /// Add a rule, replacing any rule with the same name.
    pub fn add_rule(&mut self, rule: Rule) {
        self.registry.add_rule(rule);
        self.cache.clear();
    }

    /// Add an alias resolved against the current rules and aliases.
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        declaration: &str,
    ) -> std::result::Result<(), UsageError> {
        self.registry.add_alias(alias, declaration)?;
        self.cache.clear();
        Ok(())
    }

    /// Validate every field of a record, recursing into nested values.
    ///
    /// Returns [`Error::Fields`] with one entry per failing field, or
    /// [`Error::Usage`] as soon as a declaration or value kind is misused.
    pub fn validate(&self, record: &dyn Validate) -> Result<()> {
        let mut errors = FieldErrors::default();
        self.walk_record(record, "", &mut errors)
            .map_err(|err| usage(err, "record"))?;
        finish(errors)
    }

    /// Validate any value without a declaration of its own.
    ///
    /// Records are walked, sequences and mappings are searched for records.
    pub fn validate_value<V: ToValue + ?Sized>(&self, value: &V) -> Result<()> {
        let mut errors = FieldErrors::default();
        self.deep(&value.to_value(), "", &mut errors)
            .map_err(|err| usage(err, "value"))?;
        finish(errors)
    }

    /// Run a declaration against a single value.
    ///
    /// The first failing rule wins and is returned as [`Error::Field`].
    /// Nested values are not traversed.
    pub fn field<V: ToValue + ?Sized>(&self, value: &V, name: &str, declaration: &str) -> Result<()> {
        if declaration == crate::SKIP {
            return Ok(());
        }

        match self.check(&value.to_value(), name, declaration) {
            Ok(None) => Ok(()),
            Ok(Some(err)) => Err(Error::Field(err)),
            Err(err) => Err(usage(err, name)),
        }
    }

    fn check(
        &self,
        value: &Value<'_>,
        name: &str,
        declaration: &str,
    ) -> std::result::Result<Option<FieldError>, UsageError> {
        let tags = self.cache.get_or_parse(&self.registry, declaration)?;

        for tag in tags.iter() {
            if tag.rule.check(value, &tag.param)? {
                continue;
            }
            return Ok(tag
                .rule
                .format(name, value, tag)
                .map(|description| FieldError::new(name, description)));
        }

        Ok(None)
    }

    fn walk_record(
        &self,
        record: &dyn Validate,
        parent: &str,
        errors: &mut FieldErrors,
    ) -> std::result::Result<(), UsageError> {
        let mut nested = FieldErrors::default();

        for field in record.fields() {
            if field.is_skipped() {
                continue;
            }
            if !field.declaration.is_empty() {
                if let Some(err) = self.check(&field.value, field.name, field.declaration)? {
                    nested.push(err);
                }
            }
            self.deep(&field.value, field.name, &mut nested)?;
        }

        if self.full_error_path && !parent.is_empty() {
            errors.extend(nested.into_iter().map(|err| err.nested_under(parent)));
        } else {
            errors.extend(nested);
        }
        Ok(())
    }

    fn deep(
        &self,
        value: &Value<'_>,
        name: &str,
        errors: &mut FieldErrors,
    ) -> std::result::Result<(), UsageError> {
        match value {
            Value::Record(record) => self.walk_record(*record, name, errors),
            Value::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.is_composite() {
                        self.deep(item, &format!("{}[{}]", name, i), errors)?;
                    }
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    if key.is_composite() {
                        self.deep(key, &format!("{}[{}](key)", name, key), errors)?;
                    }
                    if item.is_composite() {
                        self.deep(item, &format!("{}[{}](value)", name, key), errors)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::standard()
    }
}

fn usage(err: UsageError, subject: &str) -> Error {
    warn!(error = %err, subject, "validation aborted by usage error");
    Error::Usage(err)
}

fn finish(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Fields(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use std::collections::BTreeMap;

    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    struct Leaf {
        a: String,
    }

    impl Validate for Leaf {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("A", "required", self.a.to_value())]
        }
    }

    impl ToValue for Leaf {
        fn to_value(&self) -> Value<'_> {
            Value::Record(self)
        }
    }

    struct Branch {
        leaf: Leaf,
        leaves: Vec<Leaf>,
        by_name: BTreeMap<String, Leaf>,
        ignored: Leaf,
    }

    impl Validate for Branch {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::untagged("Leaf", Value::Record(&self.leaf)),
                Field::untagged(
                    "Leaves",
                    Value::Seq(self.leaves.iter().map(|l| Value::Record(l)).collect()),
                ),
                Field::untagged(
                    "ByName",
                    Value::Map(
                        self.by_name
                            .iter()
                            .map(|(k, v)| (k.to_value(), Value::Record(v)))
                            .collect(),
                    ),
                ),
                Field::new("Ignored", "-", Value::Record(&self.ignored)),
            ]
        }
    }

    fn empty_leaf() -> Leaf {
        Leaf { a: String::new() }
    }

    fn branch() -> Branch {
        let mut by_name = BTreeMap::new();
        by_name.insert("x".to_string(), empty_leaf());
        Branch {
            leaf: empty_leaf(),
            leaves: vec![Leaf { a: "ok".into() }, empty_leaf()],
            by_name,
            ignored: empty_leaf(),
        }
    }

    fn field_names(result: Result<()>) -> Vec<String> {
        match result {
            Err(Error::Fields(errors)) => errors.iter().map(|e| e.field.clone()).collect(),
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_traversal_short_names() {
        let validator = Validator::standard();
        assert_eq!(field_names(validator.validate(&branch())), vec!["A", "A", "A"]);
    }

    #[test]
    fn test_traversal_full_paths() {
        let validator =
            Validator::new(ValidatorConfig::builder().standard_rules().full_error_path().build())
                .unwrap();
        assert_eq!(
            field_names(validator.validate(&branch())),
            vec!["Leaf.A", "Leaves[1].A", "ByName[x](value).A"]
        );
    }

    struct Index {
        by_leaf: BTreeMap<Leaf, Leaf>,
    }

    impl Validate for Index {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::untagged("ByLeaf", self.by_leaf.to_value())]
        }
    }

    fn index() -> Index {
        let mut by_leaf = BTreeMap::new();
        by_leaf.insert(empty_leaf(), empty_leaf());
        by_leaf.insert(Leaf { a: "ok".into() }, Leaf { a: "ok".into() });
        Index { by_leaf }
    }

    #[test]
    fn test_mapping_keys_full_paths() {
        let validator =
            Validator::new(ValidatorConfig::builder().standard_rules().full_error_path().build())
                .unwrap();
        assert_eq!(
            field_names(validator.validate(&index())),
            vec!["ByLeaf[{A:}](key).A", "ByLeaf[{A:}](value).A"]
        );
    }

    #[test]
    fn test_mapping_keys_short_names() {
        let validator = Validator::standard();
        match validator.validate(&index()) {
            Err(Error::Fields(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "A");
                assert_eq!(errors[0].description, "A is required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validate_value_sequence() {
        let validator = Validator::standard();
        let leaves = vec![empty_leaf(), Leaf { a: "ok".into() }];
        assert_eq!(field_names(validator.validate_value(&leaves)), vec!["A"]);
        assert!(validator.validate_value(&vec!["plain"]).is_ok());
    }

    #[test]
    fn test_field_first_failure_wins() {
        let validator = Validator::standard();
        match validator.field("te", "Username", "required,username") {
            Err(Error::Field(err)) => {
                assert_eq!(err.field, "Username");
                assert_eq!(err.description, "Username must be at least 4 characters long");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(validator.field("", "Username", "-").is_ok());
        assert!(validator.field(&None::<String>, "Nick", "optional,lte=3").is_ok());
    }

    #[test]
    fn test_unknown_tag_is_usage_error() {
        let validator = Validator::standard();
        let err = validator.field("x", "X", "required,bogus").unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), r#"unknown validate tag "bogus""#);
        assert_eq!(validator.cached_declarations(), 0);
    }

    #[test]
    fn test_add_rule_clears_cache() {
        let mut validator = Validator::standard();
        assert!(validator.field("abc", "V", "required").is_ok());
        assert_eq!(validator.cached_declarations(), 1);

        validator.add_rule(Rule::new("required", |_, _| Ok(false), |f, _, _| format!("{} nope", f)));
        assert_eq!(validator.cached_declarations(), 0);
        assert!(validator.field("abc", "V", "required").is_err());
    }

    #[test]
    fn test_add_alias() {
        let mut validator = Validator::standard();
        validator.add_alias("short", "lte=2").unwrap();
        assert!(validator.field("abc", "V", "short").is_err());
        assert!(validator.add_alias("broken", "nope").is_err());
    }

    #[test]
    fn test_new_rejects_unknown_alias_target() {
        let config = ValidatorConfig::builder().alias("x", "required").build();
        assert_eq!(
            Validator::new(config).unwrap_err(),
            UsageError::UnknownTag("required".into())
        );
    }

    #[test]
    fn test_default_validator_is_shared() {
        assert!(std::ptr::eq(default_validator(), default_validator()));
        assert!(!default_validator().full_error_path());
    }
}
