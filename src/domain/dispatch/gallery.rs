//! Card gallery batcher.
//!
//! Turns a run of consecutive cards into a single generic template send.
//! The element order follows the card order; no element cap is applied
//! here, the platform rejects oversized galleries itself.

use crate::domain::conversation::{Button, ButtonAction, Card};
use crate::domain::foundation::SenderId;

use super::send_command::{GalleryElement, SendCommand, TemplateButton};

/// Builds one generic template command from a non-empty run of cards.
pub fn build_gallery(recipient: &SenderId, cards: &[Card]) -> SendCommand {
    SendCommand::GenericTemplate {
        recipient: recipient.clone(),
        elements: cards.iter().map(GalleryElement::from).collect(),
    }
}

impl From<&Card> for GalleryElement {
    fn from(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            image_url: card.image_uri.clone(),
            subtitle: card.subtitle.clone(),
            buttons: card.buttons.iter().map(TemplateButton::from).collect(),
        }
    }
}

impl From<&Button> for TemplateButton {
    fn from(button: &Button) -> Self {
        match &button.action {
            ButtonAction::Link { url } => TemplateButton::WebUrl {
                title: button.label.clone(),
                url: url.clone(),
            },
            ButtonAction::Postback { payload } => TemplateButton::Postback {
                title: button.label.clone(),
                payload: payload.clone(),
            },
        }
    }
}
