use crate::db::sqlite::PortalStorage;
use crate::error::PortalError;
use crate::service::auth_ops::{AuthOps, mint_token};
use crate::types::api::{LoginRequest, SignupRequest, UserInfo};

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Public messages handled by the sessions actor.
#[derive(Debug)]
pub enum SessionsMessage {
    /// Authenticate credentials; reply with a fresh session or a failure.
    Login(LoginRequest, RpcReplyPort<Result<SessionGrant, PortalError>>),
    /// Create an account and an initial session for it.
    Signup(SignupRequest, RpcReplyPort<Result<SessionGrant, PortalError>>),
    /// Resolve a bearer token to the user it was issued to.
    Verify(String, RpcReplyPort<Result<UserInfo, PortalError>>),
    /// Destroy the session behind a token; unknown tokens are a no-op.
    Logout { token: String },
}

/// A freshly issued session: opaque token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: String,
    pub user: UserInfo,
}

/// Handle for interacting with the sessions actor.
#[derive(Clone)]
pub struct SessionsHandle {
    actor: ActorRef<SessionsMessage>,
}

impl SessionsHandle {
    pub async fn login(&self, req: LoginRequest) -> Result<SessionGrant, PortalError> {
        ractor::call!(self.actor, SessionsMessage::Login, req)
            .map_err(|e| PortalError::ActorError(format!("Login RPC failed: {e}")))?
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<SessionGrant, PortalError> {
        ractor::call!(self.actor, SessionsMessage::Signup, req)
            .map_err(|e| PortalError::ActorError(format!("Signup RPC failed: {e}")))?
    }

    pub async fn verify(&self, token: impl AsRef<str>) -> Result<UserInfo, PortalError> {
        ractor::call!(
            self.actor,
            SessionsMessage::Verify,
            token.as_ref().to_string()
        )
        .map_err(|e| PortalError::ActorError(format!("Verify RPC failed: {e}")))?
    }

    pub fn logout(&self, token: impl AsRef<str>) {
        let _ = ractor::cast!(
            self.actor,
            SessionsMessage::Logout {
                token: token.as_ref().to_string()
            }
        );
    }
}

/// Internal state held by the ractor-driven sessions actor. The actor is the
/// sole owner of the token map, so session mutations never race.
struct SessionsState {
    ops: AuthOps,
    sessions: HashMap<String, i64>,
}

struct SessionsActor;

#[ractor::async_trait]
impl Actor for SessionsActor {
    type Msg = SessionsMessage;
    type State = SessionsState;
    type Arguments = AuthOps;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        ops: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("SessionsActor started; session map is empty until first login");
        Ok(SessionsState {
            ops,
            sessions: HashMap::new(),
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SessionsMessage::Login(req, rp) => {
                let result = Self::handle_login(state, req).await;
                let _ = rp.send(result);
            }
            SessionsMessage::Signup(req, rp) => {
                let result = Self::handle_signup(state, req).await;
                let _ = rp.send(result);
            }
            SessionsMessage::Verify(token, rp) => {
                let result = Self::handle_verify(state, &token).await;
                let _ = rp.send(result);
            }
            SessionsMessage::Logout { token } => {
                if state.sessions.remove(&token).is_some() {
                    debug!("session destroyed on logout");
                }
            }
        }
        Ok(())
    }
}

impl SessionsActor {
    async fn handle_login(
        state: &mut SessionsState,
        req: LoginRequest,
    ) -> Result<SessionGrant, PortalError> {
        let user = state.ops.login(&req.email, &req.password).await?;
        let user: UserInfo = user.into();

        let token = mint_token();
        state.sessions.insert(token.clone(), user.id);
        info!(user_id = user.id, role = %user.role, "login succeeded");

        Ok(SessionGrant { token, user })
    }

    async fn handle_signup(
        state: &mut SessionsState,
        req: SignupRequest,
    ) -> Result<SessionGrant, PortalError> {
        let user = state.ops.signup(req).await?;
        let user: UserInfo = user.into();

        let token = mint_token();
        state.sessions.insert(token.clone(), user.id);
        info!(user_id = user.id, role = %user.role, "signup succeeded");

        Ok(SessionGrant { token, user })
    }

    /// Resolve the token to the user it was issued to. Any miss (unknown
    /// token, or an account that disappeared) reads as an expired session.
    async fn handle_verify(
        state: &mut SessionsState,
        token: &str,
    ) -> Result<UserInfo, PortalError> {
        let Some(user_id) = state.sessions.get(token).copied() else {
            debug!("verify failed: unknown token");
            return Err(PortalError::SessionExpired);
        };

        match state.ops.storage().get_user_by_id(user_id).await? {
            Some(user) => Ok(user.into()),
            None => {
                warn!(user_id, "verify failed: session points at missing user");
                state.sessions.remove(token);
                Err(PortalError::SessionExpired)
            }
        }
    }
}

/// Async spawn of the sessions actor and return a handle.
pub async fn spawn(storage: PortalStorage) -> SessionsHandle {
    let (actor, _jh) = Actor::spawn(None, SessionsActor, AuthOps::new(storage))
        .await
        .expect("failed to spawn SessionsActor");
    SessionsHandle { actor }
}
