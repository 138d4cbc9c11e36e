//! Tactic catalog: the static table of persuasion tactics known to the service.
//!
//! Names are unique and act as the dedup key during synthesis.

use serde::{Deserialize, Serialize};

/// Broad family a tactic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticCategory {
    Hook,
    Narrative,
    Persuasion,
    Engagement,
    Emotional,
    Retention,
    Authority,
    Social,
    Scarcity,
}

/// A named persuasion or engagement technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tactic {
    pub name: String,
    pub category: TacticCategory,
    pub description: String,
    /// 0 – 100
    pub effectiveness_weight: u8,
    pub example_phrases: Vec<String>,
}

/// Compile-time row of the catalog. Converted to an owned `Tactic` on demand.
pub struct TacticDef {
    pub name: &'static str,
    pub category: TacticCategory,
    pub description: &'static str,
    pub effectiveness_weight: u8,
    pub example_phrases: &'static [&'static str],
}

impl TacticDef {
    pub fn to_tactic(&self) -> Tactic {
        Tactic {
            name: self.name.to_string(),
            category: self.category,
            description: self.description.to_string(),
            effectiveness_weight: self.effectiveness_weight,
            example_phrases: self.example_phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

pub static CATALOG: &[TacticDef] = &[
    TacticDef {
        name: "Pattern Interrupt",
        category: TacticCategory::Hook,
        description: "Opens with a jarring statement or command that breaks the viewer's scrolling autopilot.",
        effectiveness_weight: 92,
        example_phrases: &[
            "Stop scrolling right now",
            "Wait, don't skip this",
        ],
    },
    TacticDef {
        name: "Curiosity Gap",
        category: TacticCategory::Hook,
        description: "Teases an answer without giving it, so the viewer stays to close the loop.",
        effectiveness_weight: 90,
        example_phrases: &[
            "Nobody ever explains why this happens",
            "Here's what nobody mentions",
        ],
    },
    TacticDef {
        name: "Bold Claim",
        category: TacticCategory::Hook,
        description: "States a provocative, confident thesis in the first seconds.",
        effectiveness_weight: 85,
        example_phrases: &[
            "Forget everything they taught you",
            "Conventional wisdom lies to you",
        ],
    },
    TacticDef {
        name: "Hero's Journey",
        category: TacticCategory::Narrative,
        description: "Frames the content as a protagonist overcoming an obstacle and returning changed.",
        effectiveness_weight: 84,
        example_phrases: &[
            "Three years ago I was completely broke",
            "Everything fell apart when",
        ],
    },
    TacticDef {
        name: "Open Loop",
        category: TacticCategory::Retention,
        description: "Promises a payoff later in the video to hold attention through the middle.",
        effectiveness_weight: 88,
        example_phrases: &[
            "Keep watching until the end",
            "Later I'll reveal exactly why",
        ],
    },
    TacticDef {
        name: "Problem Agitation",
        category: TacticCategory::Persuasion,
        description: "Names the viewer's pain point and makes it feel urgent before offering relief.",
        effectiveness_weight: 86,
        example_phrases: &[
            "Wasting money monthly on",
            "Struggling every single month",
        ],
    },
    TacticDef {
        name: "Reciprocity",
        category: TacticCategory::Persuasion,
        description: "Gives something of value up front so the viewer feels inclined to return the favor.",
        effectiveness_weight: 74,
        example_phrases: &[
            "Free template linked below",
            "Grab your free checklist",
        ],
    },
    TacticDef {
        name: "Direct Question",
        category: TacticCategory::Engagement,
        description: "Asks the viewer a question they can answer in the comments.",
        effectiveness_weight: 70,
        example_phrases: &[
            "Comment below what you think",
            "Drop your answer below",
        ],
    },
    TacticDef {
        name: "Call to Action",
        category: TacticCategory::Engagement,
        description: "Explicitly asks the viewer to subscribe, like, follow, or click.",
        effectiveness_weight: 72,
        example_phrases: &[
            "Subscribe right now for more",
            "Smash like, subscribe, share",
        ],
    },
    TacticDef {
        name: "Vulnerability",
        category: TacticCategory::Emotional,
        description: "Shares a personal failure or fear to build intimacy and trust.",
        effectiveness_weight: 80,
        example_phrases: &[
            "Truthfully, failing publicly terrified me",
            "I've never told anyone this",
        ],
    },
    TacticDef {
        name: "Fear of Missing Out",
        category: TacticCategory::Emotional,
        description: "Suggests others are already benefiting and the viewer is being left behind.",
        effectiveness_weight: 78,
        example_phrases: &[
            "Everyone else already started",
            "While you're sleeping, others are",
        ],
    },
    TacticDef {
        name: "Listicle Countdown",
        category: TacticCategory::Retention,
        description: "Structures the video as a ranked list so viewers wait for the top entry.",
        effectiveness_weight: 76,
        example_phrases: &[
            "Number five absolutely shocked everyone",
            "Countdown begins right here",
        ],
    },
    TacticDef {
        name: "Expert Credential",
        category: TacticCategory::Authority,
        description: "Cites the speaker's experience or qualifications to earn credibility.",
        effectiveness_weight: 82,
        example_phrases: &[
            "After ten years as a doctor",
            "Certified financial planners recommend",
        ],
    },
    TacticDef {
        name: "Data Citation",
        category: TacticCategory::Authority,
        description: "Backs a claim with a statistic, study, or named source.",
        effectiveness_weight: 79,
        example_phrases: &[
            "Studies consistently show",
            "Research from Harvard shows",
        ],
    },
    TacticDef {
        name: "Social Proof",
        category: TacticCategory::Social,
        description: "Points to crowds, testimonials, or results of other people.",
        effectiveness_weight: 83,
        example_phrases: &[
            "Thousands already joined",
            "Customers keep telling me",
        ],
    },
    TacticDef {
        name: "Us Versus Them",
        category: TacticCategory::Social,
        description: "Builds in-group identity by contrasting the audience with an out-group.",
        effectiveness_weight: 68,
        example_phrases: &[
            "Unlike most people out there",
            "They don't want you knowing",
        ],
    },
    TacticDef {
        name: "Limited Time",
        category: TacticCategory::Scarcity,
        description: "Attaches a deadline to the offer or the information.",
        effectiveness_weight: 77,
        example_phrases: &[
            "Only available until Friday",
            "Offer expires tonight",
        ],
    },
    TacticDef {
        name: "Exclusive Access",
        category: TacticCategory::Scarcity,
        description: "Frames the content as insider knowledge available to few.",
        effectiveness_weight: 73,
        example_phrases: &[
            "Insiders rarely share this",
            "Members-only content unlocked",
        ],
    },
];

/// Returns the full catalog as owned tactics, in declaration order.
pub fn all_tactics() -> Vec<Tactic> {
    CATALOG.iter().map(TacticDef::to_tactic).collect()
}

/// Looks up a tactic by exact name.
pub fn find_tactic(name: &str) -> Option<Tactic> {
    CATALOG
        .iter()
        .find(|t| t.name == name)
        .map(TacticDef::to_tactic)
}
