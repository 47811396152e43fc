//! External service integrations

pub mod mailer;

pub use mailer::{HttpMailer, LogMailer, MailMessage, Mailer};
