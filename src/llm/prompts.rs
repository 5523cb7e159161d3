use crate::models::QueryKind;
use crate::query::QueryError;

const PROFILE_INSTRUCTIONS: &str = r#"Please provide a structured analysis including:
1. Current health plan and recommendations
2. Medications being taken
3. Exercise plan details
4. Health goals
5. Current challenges
6. Progress indicators (adherence, improvements, setbacks)

Format the response as a JSON object with the following structure:
{
  "name": "member name",
  "currentPlan": "current health plan",
  "medications": ["medication1", "medication2"],
  "exercisePlan": "exercise plan details",
  "healthGoals": ["goal1", "goal2"],
  "challenges": ["challenge1", "challenge2"],
  "progress": {
    "adherence": 75,
    "improvements": ["improvement1", "improvement2"],
    "setbacks": ["setback1", "setback2"]
  }
}
"adherence" must be an integer between 0 and 100."#;

const DECISIONS_INSTRUCTIONS: &str = r#"Look for decisions about:
- Medication changes
- Exercise plan modifications
- Diagnostic tests
- Treatment adjustments
- Lifestyle recommendations

For each decision identified, provide:
1. What the decision was
2. When it was made
3. The reasoning behind it
4. Key factors considered
5. Expected or actual outcomes

Format the response as a JSON array of decision objects:
[
  {
    "decision": "description of decision",
    "date": "date when made",
    "reasoning": "why this decision was made",
    "factors": ["factor1", "factor2"],
    "outcome": "expected or actual outcome"
  }
]"#;

const WEEK_SUMMARY_INSTRUCTIONS: &str = "Include:
- Key events and milestones
- Member's adherence to recommendations
- Challenges faced
- Progress made
- Any decisions or plan changes
- Recommendations for the following week

Respond in plain narrative text.";

const PROGRESS_INSTRUCTIONS: &str = "Provide analysis on:
1. Overall adherence trends
2. Key milestones achieved
3. Persistent challenges
4. Areas of improvement
5. Recommendations for continued progress
6. Risk factors or concerns
7. Success metrics and achievements

Format as a comprehensive analysis with specific data points and recommendations, in plain narrative text.";

/// Build the prompt for a query kind around the selected context.
///
/// Pure: identical inputs give identical prompts. `WeekSummary` needs a week
/// number; the other kinds ignore it.
pub fn build_prompt(
    kind: QueryKind,
    context: &str,
    week_number: Option<u32>,
) -> Result<String, QueryError> {
    let prompt = match kind {
        QueryKind::Profile => format!(
            "Based on the following conversation data, analyze and extract the member's profile information:\n\n\
             {context}\n\n\
             {PROFILE_INSTRUCTIONS}\n"
        ),
        QueryKind::Decisions => format!(
            "Analyze the following conversation data to identify key decisions made regarding the member's health plan:\n\n\
             {context}\n\n\
             {DECISIONS_INSTRUCTIONS}\n"
        ),
        QueryKind::WeekSummary => {
            let week = week_number.ok_or(QueryError::MissingParameter {
                kind,
                parameter: "week number",
            })?;
            format!(
                "Provide a comprehensive summary of Week {week} from the following conversation data:\n\n\
                 {context}\n\n\
                 {WEEK_SUMMARY_INSTRUCTIONS}\n"
            )
        }
        QueryKind::Progress => format!(
            "Analyze the entire conversation data to provide insights on the member's progress over time:\n\n\
             {context}\n\n\
             {PROGRESS_INSTRUCTIONS}\n"
        ),
    };

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "[01/01/24, 09:00 AM] Coach: Start with 10 minute walks.";

    #[test]
    fn test_prompts_embed_context_verbatim() {
        for kind in [
            QueryKind::Profile,
            QueryKind::Decisions,
            QueryKind::WeekSummary,
            QueryKind::Progress,
        ] {
            let prompt = build_prompt(kind, CONTEXT, Some(1)).unwrap();
            assert!(prompt.contains(CONTEXT), "{kind} prompt lost the context");
        }
    }

    #[test]
    fn test_output_format_instructions() {
        let profile = build_prompt(QueryKind::Profile, CONTEXT, None).unwrap();
        assert!(profile.contains("JSON object"));
        assert!(profile.contains("\"currentPlan\""));

        let decisions = build_prompt(QueryKind::Decisions, CONTEXT, None).unwrap();
        assert!(decisions.contains("JSON array"));
        assert!(decisions.contains("\"reasoning\""));

        let progress = build_prompt(QueryKind::Progress, CONTEXT, None).unwrap();
        assert!(progress.contains("narrative"));
    }

    #[test]
    fn test_week_summary_requires_week() {
        let err = build_prompt(QueryKind::WeekSummary, CONTEXT, None).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MissingParameter {
                kind: QueryKind::WeekSummary,
                ..
            }
        ));

        let prompt = build_prompt(QueryKind::WeekSummary, CONTEXT, Some(12)).unwrap();
        assert!(prompt.contains("Week 12"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let a = build_prompt(QueryKind::Decisions, CONTEXT, Some(3)).unwrap();
        let b = build_prompt(QueryKind::Decisions, CONTEXT, Some(3)).unwrap();
        assert_eq!(a, b);
    }
}
