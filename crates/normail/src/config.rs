//! Declarative pipeline configuration.
//!
//! A [`NormalizerConfig`] describes provider rules as data so pipelines can
//! be loaded from JSON instead of assembled in code.
//!
//! ```json
//! {
//!   "aliases": { "googlemail.com": "gmail.com" },
//!   "alias_policy": "rewrite",
//!   "providers": {
//!     "gmail.com": { "strip_dots": true, "tag": "+" }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use normail_model::Address;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::pipeline::{Pipeline, canonicalize};
use crate::transform::{DomainFn, LocalFn, Transforms};
use crate::transforms::{DomainAlias, GMAIL, GOOGLEMAIL, TAG, cut_at_tag, delete_dots, lowercase};

/// How alias domains relate to their canonical domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPolicy {
    /// Rewrite the alias to the canonical domain in the output.
    #[default]
    Rewrite,
    /// Keep the alias domain but apply the canonical domain's provider rules.
    Share,
}

/// Local-part rules for one provider domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderRules {
    /// Remove every `.` from the local part.
    pub strip_dots: bool,
    /// Sub-addressing marker; the local part is cut at its first occurrence.
    pub tag: Option<char>,
}

impl ProviderRules {
    /// Local transforms for these rules: dots first, then the tag.
    pub fn transforms(&self) -> Transforms {
        let mut transforms = Transforms::new();
        if self.strip_dots {
            transforms.push(LocalFn(delete_dots));
        }
        transforms.push_opt(self.tag.map(|tag| {
            move |address: &mut Address| address.local = cut_at_tag(&address.local, tag)
        }));
        transforms
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Lowercase both parts before anything else.
    pub lowercase: bool,
    /// Alias domain -> canonical domain.
    pub aliases: BTreeMap<String, String>,
    pub alias_policy: AliasPolicy,
    /// Provider domain -> local-part rules.
    pub providers: BTreeMap<String, ProviderRules>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            aliases: BTreeMap::new(),
            alias_policy: AliasPolicy::default(),
            providers: BTreeMap::new(),
        }
    }
}

impl NormalizerConfig {
    /// The configuration behind [`Pipeline::gmail`].
    pub fn gmail() -> Self {
        Self {
            aliases: BTreeMap::from([(GOOGLEMAIL.to_string(), GMAIL.to_string())]),
            providers: BTreeMap::from([(
                GMAIL.to_string(),
                ProviderRules {
                    strip_dots: true,
                    tag: Some(TAG),
                },
            )]),
            ..Self::default()
        }
    }

    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`](crate::PipelineError::InvalidConfig)
    /// on malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assemble the pipeline this configuration describes.
    ///
    /// # Errors
    ///
    /// Fails when two provider entries share a canonical domain, e.g. a
    /// provider listed under both an alias and its target with
    /// [`AliasPolicy::Rewrite`], or when the alias table contains a cycle.
    pub fn build(&self) -> Result<Pipeline> {
        let mut domain = Transforms::new();
        let mut local = Transforms::new();
        if self.lowercase {
            domain.push(DomainFn(lowercase));
            local.push(LocalFn(lowercase));
        }

        // Alias tables are compared against the lowercased domain.
        let aliases: Vec<(String, String)> = self
            .aliases
            .iter()
            .map(|(alias, canonical)| {
                (
                    canonicalize(&domain, alias),
                    canonicalize(&domain, canonical),
                )
            })
            .collect();
        let aliases = resolve_aliases(&aliases)?;

        if self.alias_policy == AliasPolicy::Rewrite && !aliases.is_empty() {
            domain.push(DomainAlias::new(aliases.iter().cloned()));
        }

        let mut overrides: Vec<(String, Transforms)> = self
            .providers
            .iter()
            .map(|(provider, rules)| (provider.clone(), rules.transforms()))
            .collect();

        if self.alias_policy == AliasPolicy::Share {
            for (alias, canonical) in &aliases {
                if let Some(rules) = self
                    .providers
                    .iter()
                    .find(|(provider, _)| canonicalize(&domain, provider) == *canonical)
                    .map(|(_, rules)| rules)
                {
                    overrides.push((alias.clone(), rules.transforms()));
                }
            }
        }

        Pipeline::new(domain, local, overrides)
    }
}

/// Point every alias at the end of its chain, so a single alias lookup
/// always lands on a domain that is not itself an alias.
fn resolve_aliases(aliases: &[(String, String)]) -> Result<Vec<(String, String)>> {
    let table: HashMap<&str, &str> = aliases
        .iter()
        .filter(|(alias, canonical)| alias != canonical)
        .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
        .collect();

    let mut resolved = Vec::with_capacity(table.len());
    for (alias, canonical) in aliases.iter().filter(|(alias, canonical)| alias != canonical) {
        let alias = alias.as_str();
        let mut visited = vec![alias];
        let mut target = canonical.as_str();
        while let Some(&next) = table.get(target) {
            if visited.contains(&target) {
                return Err(PipelineError::AliasCycle {
                    alias: alias.to_string(),
                });
            }
            visited.push(target);
            target = next;
        }
        resolved.push((alias.to_string(), target.to_string()));
    }
    resolved.sort_unstable();
    Ok(resolved)
}
