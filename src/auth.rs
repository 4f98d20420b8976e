//! Auth-domain identifiers, secrets, token results, and user identities.

pub mod id;
pub mod identity;
pub mod secret;
pub mod token;

pub use id::*;
pub use identity::*;
pub use secret::*;
pub use token::*;
