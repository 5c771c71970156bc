//! Backend endpoint paths
//!
//! Paths are relative; the coordinator resolves them against the configured
//! base URL.

/// Authentication endpoints
pub mod auth {
    /// Exchange credentials for a session
    pub const LOGIN: &str = "/api/auth/login";
    /// Create an account
    pub const REGISTER: &str = "/api/auth/register";
    /// Request a password reset email
    pub const FORGOT_PASSWORD: &str = "/api/auth/forgot-password";
    /// Set a new password from a reset token
    pub const RESET_PASSWORD: &str = "/api/auth/reset-password";
    /// Confirm an email address
    pub const VERIFY_EMAIL: &str = "/api/auth/verify-email";
    /// Send the verification email again
    pub const RESEND_VERIFICATION_EMAIL: &str = "/api/auth/resend-verification-email";
    /// Change the password of the signed-in user
    pub const CHANGE_PASSWORD: &str = "/api/auth/change-password";
    /// End the session
    pub const LOGOUT: &str = "/api/auth/logout";
}
