//! Prompt templates sent to the text-generation endpoint.
//!
//! Field values are interpolated as-is. The report sections are requested in a
//! fixed order; the model's answer follows that order, so do not reshuffle them.

use crate::domain::model::DeploymentRequest;

pub const REPORT_SECTIONS: [&str; 6] = [
    "Recommended Network Topology",
    "Infrastructure Requirements",
    "Deployment Steps",
    "Cost Estimation & Budget Justification",
    "Scalability & Future Upgrades",
    "Potential Challenges & Mitigation Strategies",
];

/// The seven request fields as a bulleted requirements block.
pub fn request_summary(request: &DeploymentRequest) -> String {
    format!(
        "A user wants to deploy a network with the following requirements:\n\
         - Location: {}\n\
         - Terrain: {}\n\
         - Budget: {}\n\
         - Special Conditions: {}\n\
         - Estimated Users: {}\n\
         - Coverage Area: {} km²\n\
         - Technology Preference: {}\n",
        request.location(),
        request.terrain(),
        request.budget(),
        request.special_conditions(),
        request.estimated_users(),
        format_area(request.coverage_area_km2()),
        request.technology_preference(),
    )
}

/// Shortest round-trip decimal, always with a fraction (`10.0`); large and tiny
/// values use a signed two-digit exponent (`1e+16`, `1e-05`).
fn format_area(value: f64) -> String {
    let shortest = format!("{:?}", value);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => shortest,
    }
}

pub fn suggestion_prompt(request: &DeploymentRequest) -> String {
    let mut prompt = request_summary(request);
    prompt.push_str("\nProvide a detailed deployment recommendation including:\n");
    for (index, section) in REPORT_SECTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, section));
    }
    prompt
}

pub fn comparison_prompt(model_suggestion: &str, request: &DeploymentRequest) -> String {
    format!(
        "Compare the following two network deployment strategies based on efficiency, cost, and feasibility.\n\
         *Model's Suggestion:* {}\n\
         *User's Suggestion:* {}\n\
         Provide a final decision on which one is better and explain why in a structured format.\n",
        model_suggestion,
        request_summary(request),
    )
}
