//! Capability interface over the two upstream lookups.

use async_trait::async_trait;

/// Resolve an `I` into an `O` by consulting an upstream.
///
/// Concrete resolvers are injected into the domain services through their
/// constructors. The location resolver classifies its own failures while the
/// climate resolver surfaces raw upstream errors, hence the associated error.
#[async_trait]
pub trait Resolver<I, O>: Send + Sync
where
    I: ?Sized + Sync,
    O: Send,
{
    /// Failure type surfaced to the caller.
    type Error: Send;

    /// Resolve one input.
    async fn resolve(&self, input: &I) -> Result<O, Self::Error>;
}
