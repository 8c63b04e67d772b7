use crate::service::CommentService;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub service: CommentService,
}

impl FromRef<AppState> for CommentService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}
