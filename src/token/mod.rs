mod authority;
mod claims;

pub use authority::{TokenAuthority, TokenRequest};
pub use claims::{GUEST_ROLE, Identity, Metadata, USER_ROLE};
