//! Named transforms.
//!
//! The free functions are plain `&str -> String` rewrites that can be called
//! directly or lifted into a pipeline with [`LocalFn`](crate::LocalFn) and
//! [`DomainFn`](crate::DomainFn). The structs are configurable transforms
//! that look at the whole address, e.g. to act only for certain domains.

use std::collections::{HashMap, HashSet};

use normail_model::Address;

use crate::transform::Transform;

/// Character removed from local parts by [`delete_dots`].
pub const DOT: char = '.';
/// Sub-addressing marker cut by [`cut_at_first_tag`].
pub const TAG: char = '+';
/// Canonical Gmail domain.
pub const GMAIL: &str = "gmail.com";
/// Legacy Gmail hostname, operated as an alias of [`GMAIL`].
pub const GOOGLEMAIL: &str = "googlemail.com";

/// Lowercase the whole string.
pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// Remove every `.` from a local part.
pub fn delete_dots(local: &str) -> String {
    local.replace(DOT, "")
}

/// Keep only what precedes the first `+`.
pub fn cut_at_first_tag(local: &str) -> String {
    cut_at_tag(local, TAG)
}

/// Keep only what precedes the first `tag`, or the whole string if absent.
pub fn cut_at_tag(local: &str, tag: char) -> String {
    match local.split_once(tag) {
        Some((base, _)) => base.to_string(),
        None => local.to_string(),
    }
}

/// Map the known Gmail alias to its canonical domain.
pub fn map_domain_alias(domain: &str) -> String {
    if domain == GOOGLEMAIL {
        GMAIL.to_string()
    } else {
        domain.to_string()
    }
}

/// Lowercases both parts of the address.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCase;

impl Transform for LowerCase {
    fn apply(&self, address: &mut Address) {
        address.local = lowercase(&address.local);
        address.domain = lowercase(&address.domain);
    }

    fn name(&self) -> &'static str {
        "lower_case"
    }
}

/// Deletes dots from the local part for the listed domains only.
#[derive(Debug, Clone, Default)]
pub struct RemoveLocalDots {
    domains: HashSet<String>,
}

impl RemoveLocalDots {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }
}

impl Transform for RemoveLocalDots {
    fn apply(&self, address: &mut Address) {
        if self.domains.contains(&address.domain) {
            address.local = delete_dots(&address.local);
        }
    }

    fn name(&self) -> &'static str {
        "remove_local_dots"
    }
}

/// Strips sub-addressing tags using a per-domain marker character.
#[derive(Debug, Clone, Default)]
pub struct RemoveSubAddressing {
    tags: HashMap<String, char>,
}

impl RemoveSubAddressing {
    /// `tags` maps a domain to the marker its provider uses (`+`, `-`, ...).
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = (S, char)>,
        S: Into<String>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|(domain, tag)| (domain.into(), tag))
                .collect(),
        }
    }
}

impl Transform for RemoveSubAddressing {
    fn apply(&self, address: &mut Address) {
        if let Some(&tag) = self.tags.get(&address.domain) {
            address.local = cut_at_tag(&address.local, tag);
        }
    }

    fn name(&self) -> &'static str {
        "remove_sub_addressing"
    }
}

/// Rewrites alias domains to their canonical domain.
///
/// Placed in the domain stage, this runs before the override lookup, so one
/// override entry serves every alias of a provider.
#[derive(Debug, Clone, Default)]
pub struct DomainAlias {
    aliases: HashMap<String, String>,
}

impl DomainAlias {
    /// `aliases` maps an alias domain to its canonical domain.
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(alias, canonical)| (alias.into(), canonical.into()))
                .collect(),
        }
    }

    /// The Gmail alias table.
    pub fn gmail() -> Self {
        Self::new([(GOOGLEMAIL, GMAIL)])
    }
}

impl Transform for DomainAlias {
    fn apply(&self, address: &mut Address) {
        if let Some(canonical) = self.aliases.get(&address.domain) {
            address.domain.clone_from(canonical);
        }
    }

    fn name(&self) -> &'static str {
        "domain_alias"
    }
}
