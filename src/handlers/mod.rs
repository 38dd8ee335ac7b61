/// HTTP request handlers (REST API)
pub mod auth;

pub use auth::{
    change_password, deactivate, me, refresh_token, signin, signout, signout_all, signup,
    update_profile,
};
