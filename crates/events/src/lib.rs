//! Workwear notification infrastructure.
//!
//! - [`delivery`]: the [`Mailer`] seam with SMTP and log-only transports.
//! - [`NotificationDispatcher`]: routes messages according to the configured
//!   [`EmailMode`] and turns every delivery attempt into a [`DeliveryOutcome`].
//! - [`templates`]: plain-text bodies for the emails the backend sends.

pub mod delivery;
pub mod dispatcher;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailError, SmtpMailer};
pub use delivery::log::LogMailer;
pub use delivery::{EmailMessage, Mailer};
pub use dispatcher::{DeliveryOutcome, EmailMode, NotificationDispatcher};
