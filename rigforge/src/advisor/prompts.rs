use crate::advisor::provider::SuggestionRequest;

pub fn build_suggestion_prompt(request: &SuggestionRequest) -> Result<String, serde_json::Error> {
    let inventory = serde_json::to_string(&request.simplified_inventory)?;

    Ok(format!(
        r#"You are an expert PC builder choosing parts from a fixed inventory.

Budget: {}
Intended usage: {}

Inventory (JSON, prices in whole currency units):
{}

Pick one compatible part per needed category (CPU, motherboard, RAM, storage, GPU if useful, case, PSU, cooler) so the total stays within the budget. CPU and motherboard sockets must match, RAM must match the motherboard memory type, and the GPU and cooler must fit the case.

Respond ONLY with valid JSON in this exact format (no markdown, no code blocks):
{{
  "productIds": ["id-1", "id-2"],
  "explanation": "Why this build fits the budget and usage"
}}

Only use ids that appear in the inventory."#,
        request.budget,
        if request.usage.trim().is_empty() {
            "general use"
        } else {
            request.usage.trim()
        },
        inventory
    ))
}
