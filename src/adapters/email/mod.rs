//! Email notifier adapters.

mod logging_notifier;
mod resend_notifier;

pub use logging_notifier::LoggingEmailNotifier;
pub use resend_notifier::{ResendConfig, ResendEmailNotifier};
