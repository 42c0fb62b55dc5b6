//! Session cookie handling and caller resolution.

pub mod cookies;
pub mod resolver;

pub use cookies::{AuthCookieCodec, CookieError, CookieUpdates};
pub use resolver::{Caller, ResolvedSession, SessionResolver};
