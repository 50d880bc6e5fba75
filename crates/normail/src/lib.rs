//! Email address canonicalization.
//!
//! Produces a normalized form of an email address suitable for equality and
//! deduplication, so that `A.B.c@Gmail.com`, `a.b.c@googlemail.com` and
//! `abc+tag@gmail.com` all map to the same key.
//!
//! # Overview
//!
//! - **Address model**: a parsed `(local, domain)` pair (re-exported from
//!   `normail-model`)
//! - **Pipeline**: domain transforms, then local transforms, then
//!   per-domain local overrides keyed by the transformed domain
//! - **Transforms**: named pure functions plus configurable transforms
//! - **Configuration**: provider rules loaded from JSON
//!
//! # Example
//!
//! ```
//! assert_eq!(normail::normalize("A.B.C.D+001@Gmail.com"), "abcd@gmail.com");
//! assert_eq!(normail::normalize("a.b.c+001@whatever.com"), "a.b.c+001@whatever.com");
//! assert_eq!(normail::normalize("Not@A@Email"), "Not@A@Email");
//! ```
//!
//! # Domain aliases
//!
//! The default pipeline rewrites alias domains: `x@googlemail.com` comes back
//! as `x@gmail.com`. Pipelines built from a [`NormalizerConfig`] with
//! [`AliasPolicy::Share`] keep the alias in the output and only share the
//! canonical provider's rules.
//!
//! # Design Principles
//!
//! - **Pass-through**: input without exactly one `@` is returned verbatim
//! - **Total transforms**: normalizing never fails; only construction does
//! - **No validation**: input is assumed to be a syntactically valid address

mod config;
mod error;
mod pipeline;
mod transform;
mod transforms;

// Address model
pub use normail_model::{Address, AddressError, SEPARATOR};

// Pipeline
pub use pipeline::{Pipeline, PipelineBuilder, normalize};

// Transforms
pub use transform::{DomainFn, LocalFn, Noop, Transform, Transforms};
pub use transforms::{
    DOT, DomainAlias, GMAIL, GOOGLEMAIL, LowerCase, RemoveLocalDots, RemoveSubAddressing, TAG,
    cut_at_first_tag, cut_at_tag, delete_dots, lowercase, map_domain_alias,
};

// Configuration
pub use config::{AliasPolicy, NormalizerConfig, ProviderRules};

// Error type
pub use error::{PipelineError, Result};
