use std::time::{Duration, Instant};

/// One visible banner message.
#[derive(Debug, Clone)]
pub struct BannerMessage {
    pub text: String,
    shown_at: Instant,
}

/// The uniform surface for non-fatal error reporting: messages appear,
/// linger for a fixed lifetime, and are pruned on the next tick after they
/// expire. Every message is mirrored to the log.
#[derive(Debug)]
pub struct ErrorBanner {
    messages: Vec<BannerMessage>,
    lifetime: Duration,
}

impl ErrorBanner {
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            messages: Vec::new(),
            lifetime,
        }
    }

    pub fn report(&mut self, text: impl Into<String>) {
        self.report_at(text, Instant::now());
    }

    pub fn report_at(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        log::warn!("{text}");
        self.messages.push(BannerMessage {
            text,
            shown_at: now,
        });
    }

    /// Drops messages older than the banner lifetime.
    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.messages
            .retain(|m| now.saturating_duration_since(m.shown_at) < lifetime);
    }

    #[must_use]
    pub fn messages(&self) -> &[BannerMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
