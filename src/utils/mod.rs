pub mod jwt;
pub mod logging;
pub mod mailer;
pub mod password;
