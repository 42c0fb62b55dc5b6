//! Per-request caller resolution from session cookies.

use std::sync::Arc;

use chrono::Utc;
use cookie::Cookie;
use tracing::{debug, warn};

use joeview_core::error::ErrorKind;
use joeview_entity::session::{AuthSession, CallerIdentity};

use super::cookies::{AuthCookieCodec, CookieUpdates};
use crate::identity::IdentityProvider;

/// Sessions expiring within this many seconds are refreshed first.
pub const REFRESH_MARGIN_SECS: i64 = 90;

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// The identity provider vouched for this user.
    Identified(CallerIdentity),
    /// No usable session.
    Anonymous,
}

impl Caller {
    /// The resolved identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        match self {
            Self::Identified(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }
}

/// Outcome of resolving a request's session.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// The caller.
    pub caller: Caller,
    /// Cookie changes to apply to the response after a refresh.
    pub cookies: CookieUpdates,
}

impl ResolvedSession {
    fn anonymous() -> Self {
        Self::anonymous_with(CookieUpdates::default())
    }

    fn anonymous_with(cookies: CookieUpdates) -> Self {
        Self {
            caller: Caller::Anonymous,
            cookies,
        }
    }
}

/// Resolves the caller from the auth cookie.
///
/// Resolution never fails: a missing or undecodable cookie, a rejected
/// token and an unreachable identity provider all yield
/// [`Caller::Anonymous`].
#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn IdentityProvider>,
    codec: AuthCookieCodec,
    refresh_margin_secs: i64,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("codec", &self.codec)
            .field("refresh_margin_secs", &self.refresh_margin_secs)
            .finish()
    }
}

impl SessionResolver {
    /// Create a resolver over the given provider and cookie codec.
    pub fn new(provider: Arc<dyn IdentityProvider>, codec: AuthCookieCodec) -> Self {
        Self {
            provider,
            codec,
            refresh_margin_secs: REFRESH_MARGIN_SECS,
        }
    }

    /// Resolve the caller from the request's cookies.
    pub async fn resolve(&self, cookies: &[Cookie<'_>]) -> ResolvedSession {
        let session = match self.codec.read(cookies) {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("No auth cookie on request");
                return ResolvedSession::anonymous();
            }
            Err(e) => {
                debug!(error = %e, cookie = %self.codec.name(), "Ignoring undecodable auth cookie");
                return ResolvedSession::anonymous();
            }
        };

        let now = Utc::now().timestamp();
        let (session, updates) = if session.expires_within(now, self.refresh_margin_secs) {
            match self.refresh(&session, cookies).await {
                Ok(refreshed) => refreshed,
                Err(cleared) => return ResolvedSession::anonymous_with(cleared),
            }
        } else {
            (session, CookieUpdates::default())
        };

        match self.provider.get_user(&session.access_token).await {
            Ok(identity) => {
                debug!(user_id = %identity.id, "Caller identified");
                ResolvedSession {
                    caller: Caller::Identified(identity),
                    cookies: updates,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    details = e.details.as_deref().unwrap_or(""),
                    "Identity provider did not resolve caller; treating as anonymous"
                );
                ResolvedSession::anonymous()
            }
        }
    }

    /// Exchange the refresh token once, returning the new session and the
    /// cookies that persist it.
    ///
    /// On failure the error carries the cookie changes to send back: a
    /// refresh token the provider refuses is dead, so the stored session is
    /// expired; a transport failure leaves it in place for the next request.
    async fn refresh(
        &self,
        session: &AuthSession,
        cookies: &[Cookie<'_>],
    ) -> Result<(AuthSession, CookieUpdates), CookieUpdates> {
        let refreshed = match self.provider.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!(
                    error = %e,
                    details = e.details.as_deref().unwrap_or(""),
                    "Session refresh failed; treating as anonymous"
                );
                return Err(if e.kind == ErrorKind::Authentication {
                    self.codec.clear(cookies)
                } else {
                    CookieUpdates::default()
                });
            }
        };

        // The new session is used for this request even if it cannot be
        // persisted.
        let updates = match self.codec.write(&refreshed, cookies) {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Failed to encode refreshed session cookie");
                CookieUpdates::default()
            }
        };

        debug!(cookies = updates.set.len(), "Session refreshed");
        Ok((refreshed, updates))
    }
}
