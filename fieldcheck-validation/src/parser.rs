//! Declaration grammar and memoized parsing.
//!
//! A declaration is `name[=param](,name[=param])*`. A literal comma inside a
//! parameter is written as `\,`.

use crate::{RuleRegistry, Tag, UsageError};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Parse a declaration against a registry.
///
/// Rule names take precedence over aliases; an alias splices its resolved
/// tags in place.
pub fn parse_declaration(
    registry: &RuleRegistry,
    declaration: &str,
) -> Result<Vec<Tag>, UsageError> {
    let pieces = split_unescaped_commas(declaration);
    let mut tags = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let piece = piece.replace("\\,", ",");
        let (name, param) = match piece.split_once('=') {
            Some((name, param)) => (name.trim_matches(' '), param.trim_matches(' ')),
            None => (piece.trim_matches(' '), ""),
        };

        if name.is_empty() {
            return Err(UsageError::EmptyTag(declaration.to_string()));
        }

        if let Some(rule) = registry.rule(name) {
            tags.push(Tag {
                name: name.to_string(),
                rule: rule.clone(),
                param: param.to_string(),
            });
        } else if let Some(alias) = registry.alias(name) {
            tags.extend(alias.iter().cloned());
        } else {
            return Err(UsageError::UnknownTag(name.to_string()));
        }
    }

    Ok(tags)
}

/// Split on commas that are not escaped.
///
/// A comma preceded by an odd number of backslashes is literal.
pub fn split_unescaped_commas(declaration: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut backslashes = 0usize;

    for (i, c) in declaration.char_indices() {
        match c {
            '\\' => backslashes += 1,
            ',' if backslashes % 2 == 0 => {
                pieces.push(&declaration[start..i]);
                start = i + 1;
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
    }

    pieces.push(&declaration[start..]);
    pieces
}

/// Concurrent memo of parsed declarations keyed by the raw string.
///
/// Keys come from field declarations fixed at compile time, so the set is
/// small and the map is never evicted. Failed parses are not stored.
#[derive(Debug, Default)]
pub struct TagCache {
    entries: DashMap<String, Arc<[Tag]>>,
}

impl TagCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached parse of `declaration`, parsing it on first use.
    ///
    /// When two threads race on the same key, the first stored result wins
    /// and both callers receive it.
    pub fn get_or_parse(
        &self,
        registry: &RuleRegistry,
        declaration: &str,
    ) -> Result<Arc<[Tag]>, UsageError> {
        if let Some(tags) = self.entries.get(declaration) {
            return Ok(Arc::clone(tags.value()));
        }

        let parsed: Arc<[Tag]> = parse_declaration(registry, declaration)?.into();
        debug!(declaration, rules = parsed.len(), "parsed validate declaration");

        let entry = self
            .entries
            .entry(declaration.to_string())
            .or_insert(parsed);
        Ok(Arc::clone(entry.value()))
    }

    /// Drop every cached parse
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached declarations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.add_rule(Rule::new("a", |_, _| Ok(true), |f, _, _| f.to_string()));
        registry.add_rule(Rule::new("b", |_, _| Ok(true), |f, _, _| f.to_string()));
        registry.add_alias("ab", "a,b=1").unwrap();
        registry
    }

    #[test]
    fn test_split_plain() {
        assert_eq!(split_unescaped_commas("a,b=1,c"), vec!["a", "b=1", "c"]);
        assert_eq!(split_unescaped_commas(""), vec![""]);
    }

    #[test]
    fn test_split_escaped() {
        assert_eq!(split_unescaped_commas(r"a=x\,y,b"), vec![r"a=x\,y", "b"]);
        // even number of backslashes: the comma separates
        assert_eq!(split_unescaped_commas(r"a=x\\,b"), vec![r"a=x\\", "b"]);
        assert_eq!(split_unescaped_commas(r"a=x\\\,y"), vec![r"a=x\\\,y"]);
    }

    #[test]
    fn test_parse_params_and_whitespace() {
        let tags = parse_declaration(&registry(), r" a = x\,y , b").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "a");
        assert_eq!(tags[0].param, "x,y");
        assert_eq!(tags[1].name, "b");
        assert_eq!(tags[1].param, "");
    }

    #[test]
    fn test_parse_splices_alias() {
        let tags = parse_declaration(&registry(), "b,ab").unwrap();
        let names: Vec<_> = tags.iter().map(|t| (t.name.as_str(), t.param.as_str())).collect();
        assert_eq!(names, vec![("b", ""), ("a", ""), ("b", "1")]);
    }

    #[test]
    fn test_parse_errors() {
        let registry = registry();
        assert_eq!(
            parse_declaration(&registry, "a,zzz").unwrap_err(),
            UsageError::UnknownTag("zzz".into())
        );
        assert_eq!(
            parse_declaration(&registry, "").unwrap_err(),
            UsageError::EmptyTag(String::new())
        );
        assert_eq!(
            parse_declaration(&registry, "a,").unwrap_err(),
            UsageError::EmptyTag("a,".into())
        );
        assert_eq!(
            parse_declaration(&registry, "=3").unwrap_err(),
            UsageError::EmptyTag("=3".into())
        );
    }

    #[test]
    fn test_cache_returns_same_parse() {
        let registry = registry();
        let cache = TagCache::new();

        let first = cache.get_or_parse(&registry, "a,b").unwrap();
        let second = cache.get_or_parse(&registry, "a,b").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_skips_failures() {
        let registry = registry();
        let cache = TagCache::new();

        assert!(cache.get_or_parse(&registry, "nope").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_concurrent_population() {
        let registry = Arc::new(registry());
        let cache = Arc::new(TagCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_parse(&registry, "ab,a").unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for parsed in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], parsed));
        }
        assert_eq!(cache.len(), 1);
    }
}
