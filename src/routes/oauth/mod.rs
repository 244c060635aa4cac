mod callback;
mod login;

pub use callback::*;
pub use login::*;
