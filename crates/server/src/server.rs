use axum::{
    Router,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::convert::Infallible;
use std::sync::Arc;

use crate::{offer, user, wish, wishlist};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves the caller's identity on routes that work with or without one.
///
/// Wish reads apply the hidden-amount visibility filter per caller, so they
/// accept anonymous requests; absent or unknown credentials resolve to `None`
/// instead of rejecting.
pub struct MaybeUser(pub Option<users::Model>);

impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(auth)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state).await
        else {
            return Ok(Self(None));
        };

        match state.engine.find_user_by_username(auth.username()).await {
            Ok(Some(user)) if user.password == auth.password() => Ok(Self(Some(user))),
            _ => Ok(Self(None)),
        }
    }
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .find_user_by_username(auth_header.username())
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = match user {
        Some(user) if user.password == auth_header.password() => user,
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/users/me", get(user::me))
        .route("/users/me/wishes", get(user::my_wishes))
        .route("/wishes", post(wish::create))
        .route("/wishes/{id}", patch(wish::update).delete(wish::remove))
        .route("/wishes/{id}/copy", post(wish::copy))
        .route("/offers", post(offer::create).get(offer::list))
        .route("/offers/{id}", get(offer::detail))
        .route("/wishlists", post(wishlist::create))
        .route(
            "/wishlists/{id}",
            patch(wishlist::update).delete(wishlist::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let public = Router::new()
        .route("/signup", post(user::signup))
        .route("/users/{username}", get(user::profile))
        .route("/users/{username}/wishes", get(user::wishes))
        .route("/wishes/last", get(wish::last))
        .route("/wishes/top", get(wish::top))
        .route("/wishes/{id}", get(wish::detail))
        .route("/wishlists", get(wishlist::list))
        .route("/wishlists/{id}", get(wishlist::detail));

    protected.merge(public).with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
