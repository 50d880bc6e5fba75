//! Email normalization pipeline with ordered stage execution.
//!
//! # Stage Order
//!
//! 1. **Domain transforms** - applied to the domain in registration order
//! 2. **Local transforms** - applied to the local part in registration order
//! 3. **Domain overrides** - extra local transforms keyed by the domain as it
//!    stands after stage 1
//!
//! Because overrides are looked up after the domain stage, override keys are
//! stored in canonical form: every key is run through the domain transforms
//! at construction and at registration time.
//!
//! # Example
//!
//! ```
//! use normail::{Pipeline, Transforms, LocalFn, cut_at_first_tag, lowercase};
//!
//! let pipeline = Pipeline::builder()
//!     .domain_fn(lowercase)
//!     .local_fn(lowercase)
//!     .override_for("Example.COM", Transforms::new().with(LocalFn(cut_at_first_tag)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(pipeline.normalize("Jane+news@EXAMPLE.com"), "jane@example.com");
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use normail_model::{Address, SEPARATOR};
use tracing::{debug, trace};

use crate::error::{PipelineError, Result};
use crate::transform::{DomainFn, LocalFn, Transform, Transforms};
use crate::transforms::{GMAIL, cut_at_first_tag, delete_dots, lowercase, map_domain_alias};

/// An ordered, extensible normalization pipeline.
///
/// # Thread Safety
///
/// The override map sits behind an [`RwLock`]: registrations are serialized
/// and `normalize` sees either the list before or after a registration,
/// never a partially appended one. Override transforms run on a snapshot
/// taken under the read lock, after the lock is released.
pub struct Pipeline {
    domain: Transforms,
    local: Transforms,
    overrides: RwLock<HashMap<String, Transforms>>,
}

impl Pipeline {
    /// Build a pipeline from its three stages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateDomain`] if two override keys
    /// normalize to the same canonical domain.
    pub fn new<I, K>(domain: Transforms, local: Transforms, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Transforms)>,
        K: Into<String>,
    {
        let mut canonical: HashMap<String, (String, Transforms)> = HashMap::new();
        for (key, transforms) in overrides {
            let key = key.into();
            match canonical.entry(canonicalize(&domain, &key)) {
                Entry::Occupied(entry) => {
                    return Err(PipelineError::DuplicateDomain {
                        canonical: entry.key().clone(),
                        first: entry.get().0.clone(),
                        second: key,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert((key, transforms));
                }
            }
        }

        let overrides = canonical
            .into_iter()
            .map(|(domain, (_, transforms))| (domain, transforms))
            .collect();
        Ok(Self::from_canonical(domain, local, overrides))
    }

    /// Start a [`PipelineBuilder`].
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// A fresh pipeline with the default Gmail-aware configuration.
    ///
    /// - domain: lowercase, then `googlemail.com` → `gmail.com`
    /// - local: lowercase
    /// - `gmail.com`: delete dots, then cut at the first `+`
    ///
    /// The returned instance is owned by the caller and may be extended with
    /// [`register_local_transforms`](Self::register_local_transforms).
    pub fn gmail() -> Self {
        let domain = Transforms::new()
            .with(DomainFn(lowercase))
            .with(DomainFn(map_domain_alias));
        let local = Transforms::new().with(LocalFn(lowercase));
        let gmail_local = Transforms::new()
            .with(LocalFn(delete_dots))
            .with(LocalFn(cut_at_first_tag));

        Self::from_canonical(
            domain,
            local,
            HashMap::from([(GMAIL.to_string(), gmail_local)]),
        )
    }

    /// Overrides must already be keyed by canonical domain.
    fn from_canonical(
        domain: Transforms,
        local: Transforms,
        overrides: HashMap<String, Transforms>,
    ) -> Self {
        let mut keys: Vec<&str> = overrides.keys().map(String::as_str).collect();
        keys.sort_unstable();
        debug!(
            domain_transforms = domain.len(),
            local_transforms = local.len(),
            overrides = ?keys,
            "built normalization pipeline"
        );

        Self {
            domain,
            local,
            overrides: RwLock::new(overrides),
        }
    }

    /// Run `domain` through the domain transforms.
    pub fn canonical_domain(&self, domain: &str) -> String {
        canonicalize(&self.domain, domain)
    }

    /// Add local transforms for `domain`, after any already registered.
    ///
    /// The key is canonicalized first, so `"GMAIL.com"` extends the
    /// `gmail.com` entry of a lowercasing pipeline.
    pub fn register_local_transforms(&self, domain: &str, transforms: Transforms) -> &Self {
        let canonical = self.canonical_domain(domain);
        let appended = transforms.len();

        let mut overrides = self
            .overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let created = match overrides.entry(canonical) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().extend(transforms);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(transforms);
                true
            }
        };
        drop(overrides);

        debug!(domain, appended, created, "registered local transforms");
        self
    }

    /// Canonical domains that carry override transforms, sorted.
    pub fn override_domains(&self) -> Vec<String> {
        let overrides = self.overrides.read().unwrap_or_else(PoisonError::into_inner);
        let mut domains: Vec<String> = overrides.keys().cloned().collect();
        domains.sort_unstable();
        domains
    }

    /// Normalize an email address.
    ///
    /// Input without exactly one `@` is returned unchanged.
    pub fn normalize(&self, email: &str) -> String {
        let Some(mut address) = Address::parse(email) else {
            trace!(
                separators = email.matches(SEPARATOR).count(),
                "input passed through unparsed"
            );
            return email.to_string();
        };
        self.normalize_address(&mut address);
        address.render()
    }

    /// Run every stage against an already parsed address.
    pub fn normalize_address(&self, address: &mut Address) {
        self.domain.apply(address);
        self.local.apply(address);

        // The lock is released before caller transforms run, so they may
        // register on this same pipeline.
        let transforms = self
            .overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address.domain.as_str())
            .cloned();
        if let Some(transforms) = transforms {
            transforms.apply(address);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::gmail()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let overrides = self.overrides.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<(&String, &Transforms)> = overrides.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        f.debug_struct("Pipeline")
            .field("domain", &self.domain)
            .field("local", &self.local)
            .field("overrides", &entries)
            .finish()
    }
}

pub(crate) fn canonicalize(domain_transforms: &Transforms, domain: &str) -> String {
    let mut probe = Address::new(String::new(), domain);
    domain_transforms.apply(&mut probe);
    probe.domain
}

/// Fluent construction for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    domain: Transforms,
    local: Transforms,
    overrides: Vec<(String, Transforms)>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn domain(mut self, transform: impl Transform + 'static) -> Self {
        self.domain.push(transform);
        self
    }

    #[must_use]
    pub fn local(mut self, transform: impl Transform + 'static) -> Self {
        self.local.push(transform);
        self
    }

    #[must_use]
    pub fn domain_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.domain(DomainFn(f))
    }

    #[must_use]
    pub fn local_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.local(LocalFn(f))
    }

    /// Add an override entry. Keys are canonicalized at [`build`](Self::build).
    #[must_use]
    pub fn override_for(mut self, domain: impl Into<String>, transforms: Transforms) -> Self {
        self.overrides.push((domain.into(), transforms));
        self
    }

    /// # Errors
    ///
    /// Fails when two override keys share a canonical domain.
    pub fn build(self) -> Result<Pipeline> {
        Pipeline::new(self.domain, self.local, self.overrides)
    }
}

static DEFAULT_PIPELINE: OnceLock<Pipeline> = OnceLock::new();

fn default_pipeline() -> &'static Pipeline {
    DEFAULT_PIPELINE.get_or_init(Pipeline::gmail)
}

/// Normalize with the shared default pipeline (see [`Pipeline::gmail`]).
///
/// The shared instance is built on first use and cannot be extended; build
/// your own with [`Pipeline::gmail`] to register more transforms.
///
/// Alias domains are rewritten: `googlemail.com` addresses come back as
/// `gmail.com`. Use [`AliasPolicy::Share`](crate::AliasPolicy::Share) to
/// keep the alias domain in the output instead.
pub fn normalize(email: &str) -> String {
    default_pipeline().normalize(email)
}
