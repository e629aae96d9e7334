use std::sync::Mutex;

/// Outbound email dispatch.
///
/// The service only composes messages (subject, body, embedded token);
/// transport, retries and async delivery belong to the implementation
/// behind this trait.
pub trait Mailer: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, body: &str);
}

/// Mailer that writes outbound messages to the application log.
///
/// Stands in for a real transport in development deployments.
pub struct LogMailer {
    sender: String,
    subject_prefix: String,
}

impl LogMailer {
    pub fn new(sender: String, subject_prefix: String) -> Self {
        Self {
            sender,
            subject_prefix,
        }
    }
}

impl Mailer for LogMailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) {
        tracing::info!(
            from = %self.sender,
            to = %recipient,
            subject = %format!("{} {}", self.subject_prefix, subject),
            "outbound email"
        );
        tracing::debug!(body = %body, "outbound email body");
    }
}

/// A message captured by [`MemoryMailer`]
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages in memory, for tests
#[derive(Default)]
pub struct MemoryMailer {
    messages: Mutex<Vec<OutboundEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.messages.lock().unwrap().clone()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, recipient: &str, subject: &str, body: &str) {
        self.messages.lock().unwrap().push(OutboundEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
    }
}
