use serde::{Deserialize, Serialize};

/// Progress indicators reported for a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Plan adherence, 0-100
    pub adherence: u8,
    pub improvements: Vec<String>,
    pub setbacks: Vec<String>,
}

/// Structured member profile extracted from the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub name: String,
    pub current_plan: String,
    pub medications: Vec<String>,
    pub exercise_plan: String,
    pub health_goals: Vec<String>,
    pub challenges: Vec<String>,
    pub progress: Progress,
}

impl MemberProfile {
    /// Profile returned whenever extraction fails
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            current_plan: "No plan available".to_string(),
            medications: vec![],
            exercise_plan: "No exercise plan available".to_string(),
            health_goals: vec![],
            challenges: vec![],
            progress: Progress {
                adherence: 0,
                improvements: vec![],
                setbacks: vec![],
            },
        }
    }
}

impl Default for MemberProfile {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A decision made about the member's plan, with its context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision: String,
    pub date: String,
    pub reasoning: String,
    pub factors: Vec<String>,
    pub outcome: String,
}
