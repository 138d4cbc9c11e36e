// All LLM prompt constants for the tactic analysis module.

/// System prompt for script analysis. Enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert video script analyst who studies \
    why viral scripts hold attention and persuade viewers. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Analysis prompt template. Replace `{script_count}`, `{categories}`, and `{scripts}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the {script_count} reference video scripts below.

For EACH script identify the persuasion tactics it uses and its section structure.
Then synthesize the tactics and structure that the scripts have in common.

Return a JSON object with this EXACT schema (no extra fields):
{
  "per_script": [
    {
      "script_index": 0,
      "tactics": [
        {
          "name": "Curiosity Gap",
          "category": "hook",
          "evidence": "Nobody tells you why your savings vanish",
          "effectiveness": 88,
          "detail": "question hook"
        }
      ],
      "structure": [
        {"title": "Hook", "purpose": "Stop the scroll", "share_percent": 10}
      ],
      "summary": "One sentence on what makes this script work"
    }
  ],
  "synthesis": {
    "tactics": [ ...same shape as above, one entry per distinct tactic... ],
    "structure": [ ...same shape as above... ],
    "summary": "Two sentences on the shared formula"
  }
}

Rules:
- "per_script" MUST contain exactly {script_count} entries, in input order, with script_index 0..{script_count}.
- "category" MUST be one of: {categories}
- "effectiveness" is an integer 0-100.
- "detail" is a short category-specific note: the hook style for hook, the arc stage for narrative,
  the persuasion principle for persuasion, the prompt kind for engagement, the emotion for emotional,
  the retention device for retention, the cited source for authority, the proof kind for social,
  and the constraint for scarcity.
- "evidence" quotes at most 20 words from the script.
- "share_percent" values within one structure should sum to roughly 100.
- Each tactic name appears at most once in "synthesis.tactics".

SCRIPTS:
{scripts}"#;
