//! The transform capability and ordered transform lists.
//!
//! Every pipeline step implements [`Transform`], a single operation that
//! mutates an [`Address`] in place. Plain functions join in two ways:
//!
//! - any `Fn(&mut Address)` closure is a transform as-is
//! - [`LocalFn`] and [`DomainFn`] lift a `Fn(&str) -> String` onto one field
//!
//! # Example
//!
//! ```
//! use normail::{Address, DomainFn, LocalFn, Transforms, delete_dots, lowercase};
//!
//! let transforms = Transforms::new()
//!     .with(DomainFn(lowercase))
//!     .with(LocalFn(delete_dots))
//!     .with(|address: &mut Address| address.local.push('!'));
//!
//! let mut address = Address::new("a.b", "Example.COM");
//! transforms.apply(&mut address);
//! assert_eq!(address.render(), "ab!@example.com");
//! ```

use std::fmt;
use std::sync::Arc;

use normail_model::Address;

/// A single normalization step.
///
/// Transforms are total: one that cannot do its job leaves the address
/// untouched instead of failing.
pub trait Transform: Send + Sync {
    /// Mutate `address` in place.
    fn apply(&self, address: &mut Address);

    /// Human-readable name for this transform (for logging/debugging).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> Transform for F
where
    F: Fn(&mut Address) + Send + Sync,
{
    fn apply(&self, address: &mut Address) {
        self(address);
    }
}

/// Applies a string function to the local part only.
#[derive(Debug, Clone, Copy)]
pub struct LocalFn<F>(pub F);

impl<F> Transform for LocalFn<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply(&self, address: &mut Address) {
        address.local = (self.0)(&address.local);
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

/// Applies a string function to the domain part only.
#[derive(Debug, Clone, Copy)]
pub struct DomainFn<F>(pub F);

impl<F> Transform for DomainFn<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply(&self, address: &mut Address) {
        address.domain = (self.0)(&address.domain);
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }
}

/// Explicit hole in a transform list. Applying it changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Transform for Noop {
    fn apply(&self, _address: &mut Address) {}

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// An ordered list of transforms, applied front to back.
///
/// Cloning is cheap: entries are shared, so the same list can back several
/// override domains.
#[derive(Clone, Default)]
pub struct Transforms(Vec<Arc<dyn Transform>>);

impl Transforms {
    /// Create an empty list. Applying it is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform, builder style.
    #[must_use]
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.push(transform);
        self
    }

    /// Append an optional transform, builder style. `None` is skipped.
    #[must_use]
    pub fn with_opt<T: Transform + 'static>(mut self, transform: Option<T>) -> Self {
        self.push_opt(transform);
        self
    }

    pub fn push(&mut self, transform: impl Transform + 'static) {
        self.0.push(Arc::new(transform));
    }

    pub fn push_opt<T: Transform + 'static>(&mut self, transform: Option<T>) {
        if let Some(transform) = transform {
            self.push(transform);
        }
    }

    /// Append every transform of `other`, keeping its order.
    pub fn extend(&mut self, other: Transforms) {
        self.0.extend(other.0);
    }

    /// Run every transform, in order, against `address`.
    pub fn apply(&self, address: &mut Address) {
        for transform in &self.0 {
            transform.apply(address);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|t| t.name()).collect()
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
