//! Provider-facing contracts (capabilities + readiness) and the OIDC adapter.
//!
//! `contract` defines [`OAuthProvider`], the capability interface every registered provider
//! implements, and [`ProviderRegistration`], the hook a provider calls once it is ready to
//! serve callbacks. `registry` composes providers by name. `adapter` holds the lazily
//! initialized OIDC provider that guards every call until discovery has completed.

pub mod adapter;
pub mod contract;
pub mod registry;

pub use adapter::*;
pub use contract::*;
pub use registry::*;
