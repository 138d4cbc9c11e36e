//! Format recommendation: a fixed rule table mapping keywords in the
//! (topic, angle, goal) triple to suggested video formats.
//!
//! Each rule fires at most once per call. Matching is a case-insensitive
//! substring test. Results are stable-sorted by descending score, so ties keep
//! rule declaration order.

use serde::{Deserialize, Serialize};

/// A suggested content format with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatRecommendation {
    pub format: String,
    /// 0 – 100
    pub score: u8,
    pub reason: String,
    pub example: String,
    pub structure: String,
    pub rationale: String,
}

/// Which inputs a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Angle,
    Goal,
}

const ALL_FIELDS: &[Field] = &[Field::Topic, Field::Angle, Field::Goal];

pub struct FormatRule {
    pub fields: &'static [Field],
    pub keywords: &'static [&'static str],
    pub format: &'static str,
    pub score: u8,
    pub reason: &'static str,
    pub example: &'static str,
    pub structure: &'static str,
    pub rationale: &'static str,
}

impl FormatRule {
    fn fires(&self, topic: &str, angle: &str, goal: &str) -> bool {
        self.fields.iter().any(|field| {
            let text = match field {
                Field::Topic => topic,
                Field::Angle => angle,
                Field::Goal => goal,
            };
            self.keywords.iter().any(|kw| text.contains(*kw))
        })
    }

    fn to_recommendation(&self) -> FormatRecommendation {
        FormatRecommendation {
            format: self.format.to_string(),
            score: self.score,
            reason: self.reason.to_string(),
            example: self.example.to_string(),
            structure: self.structure.to_string(),
            rationale: self.rationale.to_string(),
        }
    }
}

/// Keywords are lower-case; inputs are lower-cased before matching.
pub static RULES: &[FormatRule] = &[
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["politician", "investigat", "truth", "scandal", "expose", "conspiracy", "history of"],
        format: "Documentary Format",
        score: 92,
        reason: "The subject rewards evidence, timelines, and a reveal.",
        example: "The Untold Story of the Senate's Most Hated Member",
        structure: "Cold open on the central question → background → evidence in chronological order → turning point → verdict",
        rationale: "Investigative framing keeps viewers for the reveal and earns trust through sourcing.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["explain", "educate", "teach", "tutorial", "how to", "learn", "guide"],
        format: "Teaching Format",
        score: 88,
        reason: "The goal is understanding, so clarity beats spectacle.",
        example: "Compound Interest Explained in 8 Minutes",
        structure: "Promise of the outcome → core concept → worked example → common mistakes → recap",
        rationale: "Step-by-step explanation gives a concrete takeaway and drives saves and shares.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["top ", "best", "worst", "ranking", "ranked", "most "],
        format: "Countdown List Format",
        score: 85,
        reason: "Superlatives map naturally onto a ranked list.",
        example: "Top 7 Worst Financial Decisions of the Decade",
        structure: "Hook with the #1 teaser → entries from last to first → payoff at #1 → call to action",
        rationale: "Viewers stay to see the top entry, which lifts average view duration.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["story", "journey", "my life", "personal", "experience", "transformation"],
        format: "Story-Driven Format",
        score: 84,
        reason: "A personal arc invites emotional investment.",
        example: "How I Went From Broke to Debt-Free in 18 Months",
        structure: "In-media-res hook → backstory → struggle → turning point → lesson",
        rationale: "Narrative tension keeps attention and makes the lesson memorable.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["business", "startup", "brand", "company", "case study", "revenue"],
        format: "Case Study Format",
        score: 82,
        reason: "Business topics are most convincing when grounded in a real example.",
        example: "How a Tiny Coffee Brand Beat Starbucks in One City",
        structure: "Surprising result → context → decisions that mattered → numbers → transferable lessons",
        rationale: "Concrete outcomes add authority and give viewers something to apply.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &[" vs ", "versus", "compare", "comparison", "debate", "better than"],
        format: "Comparison Format",
        score: 80,
        reason: "Two options side by side make the decision the hook.",
        example: "Renting vs Buying: The Math Nobody Shows You",
        structure: "Frame the choice → criteria → round-by-round comparison → verdict → who should pick which",
        rationale: "Viewers with a pending decision watch to the verdict.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["challenge", "experiment", "i tried", "for 30 days", "test"],
        format: "Challenge Format",
        score: 78,
        reason: "An experiment with an uncertain outcome creates built-in suspense.",
        example: "I Only Ate Gas Station Food for a Week",
        structure: "Rules of the challenge → day-by-day progress → setback → results → takeaway",
        rationale: "Progress checkpoints act as natural open loops.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["react", "opinion", "review", "controvers", "drama", "hot take"],
        format: "Commentary Format",
        score: 75,
        reason: "A strong point of view on something already being discussed.",
        example: "Reacting to the Most Controversial Ad of the Year",
        structure: "Clip or claim → first reaction → deeper analysis → counterpoint → final take",
        rationale: "Riding an existing conversation brings search and comment activity.",
    },
    FormatRule {
        fields: ALL_FIELDS,
        keywords: &["motivat", "inspir", "mindset", "discipline", "habit"],
        format: "Motivational Format",
        score: 74,
        reason: "The goal is to move the viewer to act.",
        example: "The 5 AM Habit That Rewired My Discipline",
        structure: "Relatable low point → reframe → principle → proof → direct challenge to the viewer",
        rationale: "Emotional lift paired with a concrete action earns shares.",
    },
    FormatRule {
        fields: &[Field::Goal],
        keywords: &["sell", "convert", "sales", "leads", "sign up", "signups"],
        format: "Problem-Solution Format",
        score: 72,
        reason: "A conversion goal needs a clear problem and a product-shaped answer.",
        example: "Why Your Budget Fails (And the 10-Minute Fix)",
        structure: "Agitate the problem → failed alternatives → solution → proof → offer with call to action",
        rationale: "Classic direct-response structure aligned with a measurable conversion goal.",
    },
];

/// Recommends formats for the given topic, angle, and goal.
///
/// Returns an empty vector when no rule fires; callers decide how to present that.
pub fn recommend(topic: &str, angle: &str, goal: &str) -> Vec<FormatRecommendation> {
    recommend_with(RULES, topic, angle, goal)
}

pub fn recommend_with(
    rules: &[FormatRule],
    topic: &str,
    angle: &str,
    goal: &str,
) -> Vec<FormatRecommendation> {
    let topic = topic.to_lowercase();
    let angle = angle.to_lowercase();
    let goal = goal.to_lowercase();

    let mut recommendations: Vec<FormatRecommendation> = rules
        .iter()
        .filter(|rule| rule.fires(&topic, &angle, &goal))
        .map(FormatRule::to_recommendation)
        .collect();

    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations
}
