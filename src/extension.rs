//! Message contract between the browser extension's background context and
//! its content script.
//!
//! Each side sends a [`Greeting`] and answers with an [`Ack`]. Delivery goes
//! through the host's extension messaging channel, modelled by [`TabChannel`]
//! and [`RuntimeChannel`]. A reply is `None` when the receiving context is not
//! loaded; there is no retry and no ordering between the two directions.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const BACKGROUND_GREETING: &str = "Hello from background!";
pub const CONTENT_GREETING: &str = "Hello from content.js!";
pub const CONTENT_ACK: &str = "Content script received the message!";
pub const BACKGROUND_ACK: &str = "Received your message in background.js!";

/// Colour the content script paints the page when greeted by the background.
pub const HIGHLIGHT_COLOR: &str = "lightblue";

/// Request shape: `{"greeting": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub greeting: String,
}

impl Greeting {
    pub fn new(greeting: &str) -> Self {
        Self {
            greeting: greeting.to_string(),
        }
    }
}

/// Response shape: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub type TabId = u32;

/// Background to content script, addressed by tab.
pub trait TabChannel {
    fn send_to_tab(&self, tab: TabId, msg: &Greeting) -> Option<Ack>;
}

/// Content script to background.
pub trait RuntimeChannel {
    fn send_to_background(&self, msg: &Greeting) -> Option<Ack>;
}

/// The part of the page the content script is allowed to touch.
pub trait Page {
    fn set_background_color(&mut self, color: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Background;

impl Background {
    /// Toolbar icon clicked on `tab`.
    pub fn on_action_clicked<C: TabChannel>(&self, tab: TabId, channel: &C) -> Option<Ack> {
        info!(tab, "extension icon clicked");
        let reply = channel.send_to_tab(tab, &Greeting::new(BACKGROUND_GREETING));
        info!(?reply, "response from content script");
        reply
    }

    pub fn on_message(&self, msg: &Greeting) -> Ack {
        info!(greeting = %msg.greeting, "message received in background");
        Ack::new(BACKGROUND_ACK)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ContentScript;

impl ContentScript {
    pub fn on_message<P: Page>(&self, msg: &Greeting, page: &mut P) -> Ack {
        info!(greeting = %msg.greeting, "message received in content script");
        if msg.greeting == BACKGROUND_GREETING {
            page.set_background_color(HIGHLIGHT_COLOR);
        }
        Ack::new(CONTENT_ACK)
    }

    /// Runs once when the script is injected.
    pub fn on_load<C: RuntimeChannel>(&self, channel: &C) -> Option<Ack> {
        let reply = channel.send_to_background(&Greeting::new(CONTENT_GREETING));
        debug!(?reply, "response from background script");
        reply
    }
}
