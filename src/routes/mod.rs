mod auth;
mod health_check;
mod profiles;

pub use auth::{list_registered, login, logout, register};
pub use health_check::health_check;
pub use profiles::{create_profile, delete_profile, get_profile, list_profiles, update_profile};
