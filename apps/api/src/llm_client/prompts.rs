// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Reference scripts are style exemplars, never source text to reuse.
pub const ORIGINALITY_INSTRUCTION: &str = "\
    CRITICAL: The reference scripts are examples of style and structure only. \
    Do NOT copy sentences, jokes, anecdotes, or distinctive phrases from them. \
    Reuse the persuasion TECHNIQUES, never the WORDS.";

/// Keeps generated text speakable.
pub const SPOKEN_WORD_INSTRUCTION: &str = "\
    Write for the ear, not the page: short sentences, contractions, direct address to the viewer. \
    Mark sections with bracketed headings such as [HOOK] or [CALL TO ACTION]. \
    Do NOT include camera directions, emojis, or hashtags.";
