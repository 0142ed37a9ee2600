//! Reply items produced by the NLU service for a single turn.

/// Raw payload prefix that marks a card button as a link.
const LINK_PREFIX: &str = "http";

/// One reply item of a turn, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnItem {
    /// One or more lines of plain text. Empty lines are never sent.
    Text { lines: Vec<String> },

    /// A prompt with a fixed set of reply options.
    QuickReplies { title: String, options: Vec<String> },

    /// A single image by URI.
    Image { uri: String },

    /// A rich card. Consecutive cards are grouped into one gallery.
    Card(Card),

    /// A message kind the relay does not know how to render.
    Unsupported { kind: String },
}

impl TurnItem {
    /// Convenience constructor for a text item.
    pub fn text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TurnItem::Text {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Convenience constructor for a quick replies item.
    pub fn quick_replies<I, S>(title: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TurnItem::QuickReplies {
            title: title.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn image(uri: impl Into<String>) -> Self {
        TurnItem::Image { uri: uri.into() }
    }

    /// Short kind name, used in logs.
    pub fn kind(&self) -> &str {
        match self {
            TurnItem::Text { .. } => "text",
            TurnItem::QuickReplies { .. } => "quick_replies",
            TurnItem::Image { .. } => "image",
            TurnItem::Card(_) => "card",
            TurnItem::Unsupported { kind } => kind,
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, TurnItem::Card(_))
    }
}

/// A card with title, image, subtitle and buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub title: String,
    pub image_uri: String,
    pub subtitle: String,
    pub buttons: Vec<Button>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image_uri: impl Into<String>) -> Self {
        self.image_uri = image_uri.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }
}

/// A card button with its classified action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

/// What tapping a card button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Opens the URL in the platform's browser.
    Link { url: String },
    /// Sends the payload back to the relay as a postback event.
    Postback { payload: String },
}

impl Button {
    /// Classifies a raw `(label, payload)` pair coming from the NLU service.
    ///
    /// Payloads starting with `http` become links, anything else a postback.
    pub fn classify(label: impl Into<String>, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        let action = if payload.starts_with(LINK_PREFIX) {
            ButtonAction::Link { url: payload }
        } else {
            ButtonAction::Postback { payload }
        };

        Self {
            label: label.into(),
            action,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self.action, ButtonAction::Link { .. })
    }
}
