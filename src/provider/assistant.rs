//! `booking_assistant`: fixed guidance for an agent taking bookings.

use crate::error::ProtocolResult;
use crate::protocol::{Content, GetPromptResult, Prompt, PromptMessage, Role};
use crate::provider::registry::PromptHandler;
use std::collections::HashMap;

pub const BOOKING_ASSISTANT: &str = "booking_assistant";

const GUIDANCE: &str = "You are a professional cab booking assistant.

Guidelines:
- Be friendly and efficient
- Always confirm booking details before finalizing
- Provide clear estimated fares
- Offer alternative cab types if needed
- Handle cancellations professionally

Available cab types:
- Standard: Budget-friendly option
- Premium: Comfortable mid-range
- Luxury: High-end experience
";

pub struct BookingAssistantPrompt;

impl PromptHandler for BookingAssistantPrompt {
    fn definition(&self) -> Prompt {
        Prompt {
            name: BOOKING_ASSISTANT.into(),
            description: Some("Professional cab booking assistant prompt".into()),
            arguments: Some(Vec::new()),
        }
    }

    // Takes no arguments; any supplied are ignored.
    fn render(&self, _arguments: &HashMap<String, String>) -> ProtocolResult<GetPromptResult> {
        Ok(GetPromptResult {
            description: Some("Professional cab booking assistant prompt".into()),
            messages: vec![PromptMessage {
                role: Role::System,
                content: Content::text(GUIDANCE),
            }],
        })
    }
}
