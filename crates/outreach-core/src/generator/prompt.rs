//! Instruction builder for the draft generator.
//!
//! Produces the single instruction payload sent to the text-generation
//! collaborator: existing draft body as context when present, a JSON-only
//! reply contract, the controlled placeholder vocabulary, and the
//! tone/style constraints (enforced as instruction text, not code).

use outreach_types::draft::DraftContext;

/// System message framing the collaborator's role.
pub const DRAFT_SYSTEM_PROMPT: &str = "You are a helpful assistant that creates warm, human \
email templates with variable tags. Return only valid JSON.";

/// Build the user-turn instruction for one generation call.
///
/// When the context carries an existing body, the instruction asks for an
/// enhanced version of it rather than a fresh draft.
pub fn build_draft_prompt(context: &DraftContext) -> String {
    let existing = context.current_body.trim();

    let context_section = if existing.is_empty() {
        String::new()
    } else {
        format!("=== EXISTING TEMPLATE (enhance or use as context) ===\n{existing}\n\n")
    };

    let task = if existing.is_empty() {
        "a new email template"
    } else {
        "an enhanced version of the above template"
    };

    format!(
        r#"You are a Business Development Relationship Manager. Your task is to create a warm, human, low-pressure outreach EMAIL TEMPLATE with DYNAMIC VARIABLES.

{context_section}=== YOUR TASK ===
Create {task} using VARIABLE TAGS for personalization.

Return ONLY valid JSON in this exact format:
{{
  "content": "The email template with {{{{variableName}}}} tags",
  "suggestedVariables": ["firstName", "companyName", etc.]
}}

=== VARIABLE TAG FORMAT ===
Use {{{{variableName}}}} ONLY for contact-specific data that will be filled in later.

**CONTACT VARIABLES** (use {{{{tags}}}} - these will be filled later):
- {{{{firstName}}}} - Contact's first name
- {{{{lastName}}}} - Contact's last name
- {{{{companyName}}}} - Their current company
- {{{{title}}}} - Their job title
- {{{{fullName}}}} - Full name (first + last)
- {{{{goesBy}}}} - Preferred name/nickname

=== REQUIREMENTS ===
1. **Contact Variables Only**: ONLY use {{{{variableName}}}} for firstName, lastName, companyName, title, fullName, goesBy
2. **Human & Natural**: Write like a real person, not a sales bot
3. **Low Pressure**: Always include a release valve that removes pressure
4. **No Sales Language**: No CTAs, no calendar links, no "let's hop on a call"
5. **Greeting**: Always start with "Hi {{{{firstName}}}}," or similar
6. **Company Context**: Use {{{{companyName}}}} when relevant
7. **Signature**: End with a plain name, one clear sender voice

IMPORTANT: Only use {{{{variables}}}} for contact-specific data. The template should be warm, personal, and low-pressure.

Return ONLY the JSON object, no markdown, no code blocks, no explanation."#
    )
}
