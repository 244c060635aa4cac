mod new_user;
mod signup_token;
mod user_email;
mod user_name;
mod user_password;

pub use new_user::NewUser;
pub use signup_token::SignupToken;
pub use user_email::UserEmail;
pub use user_name::UserName;
pub use user_password::{ValidPassword, ValidPasswordError};
