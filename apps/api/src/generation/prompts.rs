// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for script generation. Output is plain spoken-word text.
pub const GENERATION_SYSTEM: &str = "You are an expert video scriptwriter who writes \
    original, high-retention scripts for online video. \
    Respond with the finished script only. \
    Do NOT include titles, notes, explanations, or apologies outside the script.";

/// Script generation prompt template.
/// Replace: {originality_instruction}, {spoken_word_instruction}, {topic}, {description},
///          {target_audience}, {format}, {format_structure}, {approach}, {target_word_count},
///          {tactics}, {references}, {call_to_action}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{originality_instruction}

{spoken_word_instruction}

Write a complete video script.

TOPIC: {topic}
DESCRIPTION: {description}
TARGET AUDIENCE: {target_audience}
FORMAT: {format}
FORMAT STRUCTURE: {format_structure}

CREATIVE APPROACH for this draft:
{approach}

PERSUASION TACTICS found in the reference scripts, strongest first.
Weave the techniques in naturally; do NOT name them in the script:
{tactics}

REFERENCE SCRIPT EXCERPTS (style only, never reuse wording):
{references}

HARD RULES:
1. The script MUST be about {target_word_count} words long (within 5%).
2. Open with a hook in the first two sentences.
3. End with this call to action, in your own words: {call_to_action}
4. Every factual claim must be general knowledge; do NOT invent statistics or quotes."#;
