//! Caller identity and webhook authentication.
//!
//! End-user requests are authenticated upstream by the identity layer, which
//! forwards a trusted user identifier in a configurable header;
//! [`current_user::CurrentUser`] extracts it. The billing collaborator's
//! webhook authenticates differently, with an HMAC signature over the raw
//! payload ([`signing`]).

pub mod current_user;
pub mod signing;

pub use current_user::CurrentUser;
