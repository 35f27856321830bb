//! The rendered email handed to a [`Mailer`](super::Mailer).

/// A fully rendered email, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// The single recipient address.
    pub recipient: String,
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl Email {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}
