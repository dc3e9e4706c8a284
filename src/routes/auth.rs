//! Caller identity for state-changing routes.
//!
//! The backend sits behind a gateway that authenticates users and forwards
//! their identity in headers; trusted bots present a shared secret instead.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, state::SharedState};

const USER_HEADER: &str = "x-devwars-user";
const ROLE_HEADER: &str = "x-devwars-role";
const BOT_SECRET_HEADER: &str = "x-bot-secret";

/// Role forwarded by the gateway for a human caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Regular player.
    User,
    /// Game moderator.
    Moderator,
    /// Platform administrator.
    Admin,
}

/// Authenticated caller attached to the request as an extension.
#[derive(Debug, Clone)]
pub enum Principal {
    /// A human caller identified by the gateway.
    User {
        /// The caller's user id.
        id: Uuid,
        /// The caller's role.
        role: Role,
    },
    /// A trusted bot presenting the shared secret.
    Bot,
}

impl Principal {
    /// Whether the caller may run moderation actions.
    pub fn is_moderator(&self) -> bool {
        matches!(
            self,
            Principal::User {
                role: Role::Moderator | Role::Admin,
                ..
            }
        )
    }

    /// Whether the caller may act on behalf of `user_id` for self-service
    /// endpoints (themselves, or any moderator).
    pub fn acts_for(&self, user_id: Uuid) -> bool {
        match self {
            Principal::User { id, .. } if *id == user_id => true,
            _ => self.is_moderator(),
        }
    }

    /// Require the moderator role; bots are rejected.
    pub fn require_moderator(&self) -> Result<(), AppError> {
        if self.is_moderator() {
            Ok(())
        } else {
            Err(AppError::Forbidden("moderator role required".into()))
        }
    }

    /// Require the moderator role or the trusted-bot secret.
    pub fn require_moderator_or_bot(&self) -> Result<(), AppError> {
        if matches!(self, Principal::Bot) || self.is_moderator() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "moderator role or trusted-bot key required".into(),
            ))
        }
    }
}

fn parse_role(value: &str) -> Option<Role> {
    match value {
        "user" => Some(Role::User),
        "moderator" => Some(Role::Moderator),
        "admin" => Some(Role::Admin),
        _ => None,
    }
}

fn principal_from_headers(
    state: &SharedState,
    headers: &HeaderMap,
) -> Result<Principal, AppError> {
    if let Some(provided) = headers
        .get(BOT_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        return match state.config().bot_secret.as_deref() {
            Some(expected) if expected == provided => Ok(Principal::Bot),
            _ => Err(AppError::Unauthorized("invalid bot secret".into())),
        };
    }

    let id = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("missing `{USER_HEADER}` header")))?
        .parse::<Uuid>()
        .map_err(|_| AppError::Unauthorized(format!("malformed `{USER_HEADER}` header")))?;

    let role = match headers.get(ROLE_HEADER).and_then(|value| value.to_str().ok()) {
        Some(value) => parse_role(value)
            .ok_or_else(|| AppError::Unauthorized(format!("unknown role `{value}`")))?,
        None => Role::User,
    };

    Ok(Principal::User { id, role })
}

/// Middleware resolving the caller identity and storing it as an extension.
pub async fn authenticate(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = principal_from_headers(&state, req.headers())?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> Principal {
        Principal::User {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn moderators_and_admins_can_moderate() {
        assert!(!user(Role::User).is_moderator());
        assert!(user(Role::Moderator).is_moderator());
        assert!(user(Role::Admin).is_moderator());
        assert!(!Principal::Bot.is_moderator());
    }

    #[test]
    fn self_service_covers_self_and_moderators() {
        let id = Uuid::new_v4();
        let me = Principal::User {
            id,
            role: Role::User,
        };
        assert!(me.acts_for(id));
        assert!(!me.acts_for(Uuid::new_v4()));
        assert!(user(Role::Moderator).acts_for(id));
        assert!(!Principal::Bot.acts_for(id));
    }

    #[test]
    fn bot_passes_only_the_relaxed_check() {
        assert!(Principal::Bot.require_moderator().is_err());
        assert!(Principal::Bot.require_moderator_or_bot().is_ok());
        assert!(user(Role::User).require_moderator_or_bot().is_err());
    }
}
