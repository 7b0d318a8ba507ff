use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{
    forgot_password, login, register, resend_otp, reset_password, verify_otp,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
