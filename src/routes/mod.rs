mod admin;
mod health_check;
mod home;
mod login;
mod oauth;
mod signup;
mod signup_confirm;

pub use admin::*;
pub use health_check::*;
pub use home::*;
pub use login::*;
pub use oauth::*;
pub use signup::*;
pub use signup_confirm::*;
