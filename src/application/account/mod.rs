mod account_service;
mod password;
mod token;

pub use account_service::{DEFAULT_REDIRECT, LoginOutcome, SignupOutcome, login, signup};
pub use token::{InvalidTokenLifetime, MAX_TOKEN_LIFETIME_HOURS, TokenIssuer};
