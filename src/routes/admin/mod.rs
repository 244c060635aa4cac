mod dashboard;
mod log_out;
mod password;

pub use dashboard::*;
pub use log_out::*;
pub use password::*;
