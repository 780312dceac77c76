mod brevo;
mod email;
mod mail;
mod publisher;
mod storage;

pub use brevo::BrevoMailer;
pub use mail::{MailTransport, SesMailer};
pub use publisher::{Notification, PublishOutcome, PublishTarget, Publisher};
pub use storage::{ObjectStore, S3Store};

#[cfg(test)]
pub use email::ReportEmail;
