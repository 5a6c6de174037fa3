use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use thiserror::Error;
use vpo_engine::AuthApiError;
use vpo_jwt::TokenError;

pub const NOT_AUTHORIZED: &str = "User is not authorized";
pub const ACCESS_DENIED: &str = "Access denied";
pub const REGISTRATION_ERROR: &str = "Registration error";
pub const LOGIN_ERROR: &str = "Login error";

fn json_message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::json())
        .body(serde_json::json!({ "message": message }).to_string())
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not serialize access token. {0}")]
    CouldNotSerializeAccessToken(String),
    #[error("{0}")]
    RegistrationFailed(AuthApiError),
    #[error("{0}")]
    LoginFailed(AuthApiError),
}

impl ServerError {
    /// The text sent to clients.
    fn public_message(&self) -> String {
        match self {
            Self::AuthenticationError(e) => e.public_message().to_string(),
            Self::RegistrationFailed(AuthApiError::EmailTaken) => AuthApiError::EmailTaken.to_string(),
            Self::RegistrationFailed(_) => REGISTRATION_ERROR.to_string(),
            Self::LoginFailed(e @ (AuthApiError::UserNotFound(_) | AuthApiError::IncorrectPassword)) => e.to_string(),
            Self::LoginFailed(_) | Self::CouldNotSerializeAccessToken(_) => LOGIN_ERROR.to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationError(e) => e.status_code(),
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::RegistrationFailed(_) => StatusCode::BAD_REQUEST,
            Self::LoginFailed(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotSerializeAccessToken(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("💻️ {self}");
        }
        json_message(self.status_code(), &self.public_message())
    }
}

/// Reasons a request is turned away by the access middleware.
///
/// Every variant is a 403. Clients only ever see [`ACCESS_DENIED`] for a role mismatch or [`NOT_AUTHORIZED`] for
/// everything else; the detail goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No bearer token was provided.")]
    MissingCredential,
    #[error("Access token was rejected. {0}")]
    InvalidToken(#[from] TokenError),
    #[error("The role {0} is required.")]
    InsufficientRole(String),
}

impl AuthError {
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InsufficientRole(_) => ACCESS_DENIED,
            Self::MissingCredential | Self::InvalidToken(_) => NOT_AUTHORIZED,
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    fn error_response(&self) -> HttpResponse {
        json_message(self.status_code(), self.public_message())
    }
}
