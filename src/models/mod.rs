/// Data models for the credential lifecycle
pub mod token;
pub mod user;

pub use token::{
    AccessTokenData, AuthSession, RefreshTokenRecord, RefreshTokenRequest, SignoutRequest,
    TokenPair,
};
pub use user::{
    normalize_email, ChangePasswordRequest, NewUser, Role, SigninRequest, SignupRequest,
    UpdateProfileRequest, User, UserProfile,
};
