use crate::domain::{UserEmail, UserName, ValidPassword};

/// A validated signup request, ready to be persisted.
pub struct NewUser {
    pub username: UserName,
    pub email: UserEmail,
    pub password: ValidPassword,
}
