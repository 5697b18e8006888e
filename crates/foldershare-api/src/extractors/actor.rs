//! `RequestActor` extractor: resolves the acting user for a request.
//!
//! FolderShare does not implement authentication itself. The deployment
//! puts a trusted front end ahead of this server; the front end asserts
//! the authenticated user id in the `x-foldershare-user` header. A
//! request without the header is an anonymous visitor. Role permissions
//! always come from the user directory, never from the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use foldershare_access::Actor;
use foldershare_core::error::AppError;
use foldershare_core::types::UserId;

use crate::state::ApiState;

/// Header carrying the asserted user id.
pub const USER_HEADER: &str = "x-foldershare-user";

/// Extracted acting user, available in every handler.
#[derive(Debug, Clone, Copy)]
pub struct RequestActor(pub Actor);

impl std::ops::Deref for RequestActor {
    type Target = Actor;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<ApiState> for RequestActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = match parts.headers.get(USER_HEADER) {
            Some(value) => {
                let text = value
                    .to_str()
                    .map_err(|_| AppError::validation("Invalid user header"))?;
                let id: i64 = text
                    .parse()
                    .map_err(|_| AppError::validation("Invalid user id in user header"))?;
                Some(UserId(id))
            }
            None => None,
        };

        let permissions = state.users.permissions_for(user_id).await?;
        let actor = match user_id {
            Some(id) => Actor::new(id, permissions),
            None => Actor::anonymous(permissions),
        };
        Ok(RequestActor(actor))
    }
}
