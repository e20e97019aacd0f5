pub mod health;
pub use self::health::health;

pub mod check_password;
pub use self::check_password::check_password;
