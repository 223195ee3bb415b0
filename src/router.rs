use crate::db::sqlite::PortalStorage;
use crate::handlers::{auth, pages, students};
use crate::service::sessions_actor::SessionsHandle;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared application state: the sessions actor handle plus storage.
#[derive(Clone)]
pub struct PortalState {
    sessions: SessionsHandle,
    storage: PortalStorage,
}

impl PortalState {
    pub fn new(sessions: SessionsHandle, storage: PortalStorage) -> Self {
        Self { sessions, storage }
    }

    pub fn sessions(&self) -> &SessionsHandle {
        &self.sessions
    }

    pub fn storage(&self) -> &PortalStorage {
        &self.storage
    }
}

pub fn portal_router(state: PortalState) -> Router {
    Router::new()
        .route("/", get(pages::root_page))
        .route("/login", get(pages::login_page).post(auth::login))
        .route("/signup", get(pages::signup_page).post(auth::signup))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/admin", get(pages::admin_page))
        .route("/student", get(pages::student_page))
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/owner/{owner_user_id}",
            get(students::get_student_by_owner),
        )
        .route(
            "/students/{id}",
            patch(students::update_student).delete(students::delete_student),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
