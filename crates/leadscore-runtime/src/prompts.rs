//! Prompt for the intent reasoning call.
//!
//! The prompt carries the offer (name, value props, ideal use cases) and the
//! lead (name, role, company, industry, bio), then demands exactly two lines:
//!
//! ```text
//! Intent: <High|Medium|Low>
//! Reasoning: <1-2 sentence explanation>
//! ```
//!
//! The response parser depends on that format; change both together.

use leadscore_core::{LeadField, LeadProfile, OfferProfile};

use crate::providers::ChatMessage;

/// Response format the model must follow.
pub const RESPONSE_FORMAT: &str = "Intent: [High/Medium/Low]\nReasoning: [Your 1-2 sentence explanation]";

/// Render the intent prompt for one lead. Missing lead fields render empty.
pub fn build_intent_prompt(lead: &LeadProfile, offer: &OfferProfile) -> String {
    format!(
        r#"Analyze the following prospect's buying intent for our product.

**Our Product/Offer:**
- Name: {offer_name}
- Value Propositions: {value_props}
- Ideal Use Cases / Target Industry: {use_cases}

**Prospect Details:**
- Name: {name}
- Role: {role}
- Company: {company}
- Industry: {industry}
- LinkedIn Bio: {bio}

**Task:**
Your response MUST be in the following format, with no other text:
{format}"#,
        offer_name = offer.name,
        value_props = offer.value_props.join(", "),
        use_cases = offer.ideal_use_cases.join(", "),
        name = lead.field(LeadField::Name),
        role = lead.field(LeadField::Role),
        company = lead.field(LeadField::Company),
        industry = lead.field(LeadField::Industry),
        bio = lead.field(LeadField::Bio),
        format = RESPONSE_FORMAT,
    )
}

/// The prompt as the message list sent to the provider.
pub fn intent_messages(lead: &LeadProfile, offer: &OfferProfile) -> Vec<ChatMessage> {
    vec![ChatMessage::user(build_intent_prompt(lead, offer))]
}
