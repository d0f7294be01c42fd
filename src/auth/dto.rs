use serde::Deserialize;

/// Body of the login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of the signup form.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
}
