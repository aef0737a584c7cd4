//! Console messenger adapter
//!
//! Resolves message keys against a template catalog, substitutes
//! `%name%` placeholders, and prints the result. The core only ever
//! supplies keys and placeholder maps; everything about wording lives
//! here and can be overridden per key.

use colored::Colorize;
use nightpoll_application::messages::{Placeholders, keys};
use nightpoll_application::ports::messenger::Messenger;
use nightpoll_application::ports::zone::Zone;
use nightpoll_domain::ParticipantId;
use std::collections::HashMap;
use tracing::warn;

/// Key-to-template table with `%name%` substitution
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut templates = HashMap::new();
        let defaults: [(&str, &str); 21] = [
            (
                keys::POLL_STARTED,
                "A poll to skip the night has started in %zone%! It ends in %duration%s.",
            ),
            (
                keys::POLL_STARTED_MANUAL,
                "%initiator% started a poll to skip the night in %zone%! It ends in %duration%s.",
            ),
            (
                keys::POLL_INSTRUCTIONS,
                "Vote y/yes or n/no within %duration% seconds.",
            ),
            (keys::PARTICIPANT_VOTED, "%participant% voted %ballot%."),
            (
                keys::VOTE_WITHDRAWN,
                "%participant% left %zone%; their ballot no longer counts.",
            ),
            (
                keys::POLL_RESULTS,
                "Poll closed in %zone%: %yes% yes, %no% no, %eligible% eligible.",
            ),
            (keys::POLL_PASSED, "The poll passed! Morning comes early to %zone%."),
            (keys::POLL_FAILED, "The poll failed. The night goes on in %zone%."),
            (
                keys::CLOCK_UNCHANGED,
                "The poll passed, but the clock of %zone% cannot be changed.",
            ),
            (
                keys::ALL_ELIGIBLE_LEFT,
                "Every eligible voter left %zone%; the poll is cancelled.",
            ),
            (keys::POLL_CANCELLED, "The poll in %zone% was cancelled by %by%."),
            (
                keys::POLL_CANCELLED_SHUTDOWN,
                "The poll in %zone% was cancelled: the host is shutting down.",
            ),
            (
                keys::POLL_IN_PROGRESS,
                "A poll to skip the night is running in %zone%.",
            ),
            (
                keys::POLL_ALREADY_ACTIVE,
                "A poll is already running in %other_zone%.",
            ),
            (keys::ZONE_NOT_VOTABLE, "Polls cannot be held in %zone%."),
            (keys::ZONE_NOT_FOUND, "No zone named %zone% exists."),
            (
                keys::NOT_ENOUGH_PARTICIPANTS,
                "%zone% needs %need% participants for a poll, only %have% present.",
            ),
            (keys::NO_ACTIVE_POLL, "There is no active poll."),
            (keys::NOT_IN_POLL_ZONE, "You must be in %zone% to vote."),
            (keys::NOT_ELIGIBLE, "You are not eligible to vote in this poll."),
            (keys::ALREADY_VOTED, "You have already voted."),
        ];
        for (key, template) in defaults {
            templates.insert(key.to_string(), template.to_string());
        }
        Self { templates }
    }
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace or add a template, builder style.
    pub fn with_template(mut self, key: &str, template: impl Into<String>) -> Self {
        self.templates.insert(key.to_string(), template.into());
        self
    }

    /// The raw template for `key`, if present.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Resolve `key` and substitute `%name%` placeholders.
    ///
    /// An unknown key renders as a visible marker rather than failing:
    /// message delivery must never abort a poll operation.
    pub fn render(&self, key: &str, placeholders: &Placeholders) -> String {
        let Some(template) = self.templates.get(key) else {
            warn!(key, "missing message template");
            return format!("missing message: {key}");
        };
        let mut message = template.clone();
        for (name, value) in placeholders.iter() {
            message = message.replace(&format!("%{name}%"), value);
        }
        message
    }
}

/// Messenger that renders the catalog to stdout
pub struct ConsoleMessenger {
    catalog: MessageCatalog,
    prefix: String,
}

impl ConsoleMessenger {
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            catalog,
            prefix: "[nightpoll]".to_string(),
        }
    }

    /// Override the line prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Default for ConsoleMessenger {
    fn default() -> Self {
        Self::new(MessageCatalog::default())
    }
}

impl Messenger for ConsoleMessenger {
    fn notify(&self, participant: &ParticipantId, key: &str, placeholders: &Placeholders) {
        let text = self.catalog.render(key, placeholders);
        let target = format!("@{participant}");
        println!(
            "{} {} {}",
            self.prefix.as_str().yellow(),
            target.as_str().cyan(),
            text
        );
    }

    fn broadcast(&self, zone: &dyn Zone, key: &str, placeholders: &Placeholders) {
        let text = self.catalog.render(key, placeholders);
        let target = format!("[{}]", zone.name());
        println!(
            "{} {} {}",
            self.prefix.as_str().yellow(),
            target.as_str().magenta(),
            text
        );
    }
}
