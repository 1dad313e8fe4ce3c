// All LLM prompt constants for the interview agents.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role description for the question writer. Wrapped with `json_system`.
pub const QUESTION_WRITER_ROLE: &str = "You are an expert spreadsheet-skills curriculum designer. \
    You write scenario-driven interview questions that probe how a candidate thinks \
    through data problems, adapting each batch to the candidate's demonstrated level.";

/// Batch generation prompt.
/// Replace: {count}, {phase}, {role_context}, {profile_json}, {recent_json},
///          {skills_tested}, {analysis_json}
pub const QUESTION_BATCH_TEMPLATE: &str = r#"Generate {count} adaptive interview questions for a {role_context} candidate.

GENERATION CONTEXT: {phase}

CANDIDATE PROFILE:
{profile_json}

RECENT ASSESSMENT RESULTS:
{recent_json}

SKILLS ALREADY TESTED:
{skills_tested}

RESPONSE ANALYSIS:
{analysis_json}

Return a JSON object with this EXACT schema:
{
  "reasoning": "Why these questions were chosen for this candidate",
  "trajectory_decision": "The adaptive direction being taken",
  "questions": [
    {
      "question": "How would you ...",
      "skill_target": "Primary skill",
      "difficulty": "Easy|Medium|Hard",
      "adaptive_reasoning": "Why this question fits the candidate's current level",
      "scenario_context": "Business scenario",
      "requires_dataset": true,
      "dataset_requirements": {
        "data_context": "type of data needed",
        "required_columns": ["col1", "col2"],
        "data_challenges": ["duplicates", "blank cells"],
        "sample_size": 40
      },
      "expected_approach": "Key methodology elements",
      "evaluation_criteria": ["criterion1", "criterion2"]
    }
  ],
  "next_focus_areas": ["areas to explore later"]
}

ADAPTIVE STRATEGY:
- Performing well: increase complexity and introduce advanced concepts.
- Struggling: reinforce fundamentals with supportive scenarios.
- Specific weaknesses listed in the analysis: target those first.
- Demonstrated expertise in a skill: move to a different skill."#;

/// Role description for the reviewer. Wrapped with `json_system`.
pub const REVIEWER_ROLE: &str = "You are a technical reviewer who grades a candidate's \
    spoken explanation of how they would solve a spreadsheet problem.";

/// Evaluation prompt.
/// Replace: {question}, {skill}, {difficulty}, {expected_approach},
///          {evaluation_criteria}, {answer}
pub const EVALUATION_TEMPLATE: &str = r#"Evaluate the following candidate response.

QUESTION:
- Question: {question}
- Skill Target: {skill}
- Difficulty: {difficulty}
- Expected Approach: {expected_approach}
- Evaluation Criteria: {evaluation_criteria}

CANDIDATE ANSWER:
{answer}

Return a JSON object with this EXACT schema:
{
  "grade": "Satisfactory|Partly Acceptable|Unsatisfactory|Requires More Assessment",
  "score": 0,
  "justification": "Why this grade",
  "strengths": ["..."],
  "weaknesses": ["..."],
  "alternative_solutions": ["..."],
  "follow_up_needed": false,
  "follow_up_suggestion": "A clarifying question, only if follow_up_needed is true"
}

Score is 0-100. Consider correctness, efficiency, conceptual understanding,
clarity of explanation and practical applicability. Ask for a follow-up only
when the answer is ambiguous, not when it is simply wrong."#;

/// Role description for the recruiter. Wrapped with `json_system`.
pub const RECRUITER_ROLE: &str = "You are the final recruiter. You make a hiring \
    recommendation from the complete record of an adaptive skills assessment.";

/// Final decision prompt.
/// Replace: {profile_json}, {records_json}
pub const FINAL_DECISION_TEMPLATE: &str = r#"Make a final hiring recommendation.

CANDIDATE PROFILE:
{profile_json}

ASSESSMENT HISTORY:
{records_json}

Return a JSON object with this EXACT schema:
{
  "decision": "Pass|Fail",
  "confidence": "High|Medium|Low",
  "overall_score": 0,
  "recommendation_summary": "Short summary for the hiring manager",
  "strengths": ["..."],
  "improvement_areas": ["..."],
  "next_steps": "Recommended next step in the hiring process"
}

Weigh consistency across skills and how the candidate handled increasing
difficulty, not only the average score."#;

/// Role description for the dataset designer. Wrapped with `json_system`.
pub const DATASET_ROLE: &str = "You generate small, realistic CSV datasets that \
    accompany spreadsheet interview questions.";

/// Dataset prompt.
/// Replace: {question}, {requirements_json}
pub const DATASET_TEMPLATE: &str = r#"Create a dataset for this interview question:

{question}

REQUIREMENTS:
{requirements_json}

Return a JSON object with this EXACT schema:
{
  "title": "Short dataset title",
  "columns": ["col1", "col2"],
  "csv": "col1,col2\nvalue,value"
}

The csv must start with a header row matching columns. Include the data
challenges listed in the requirements (duplicates, blanks, inconsistent
formats) so the question has something to solve."#;

/// System prompt for the conversational interviewer. Plain text output.
pub const INTERVIEWER_SYSTEM: &str = "You are a friendly, professional interviewer \
    running a spoken spreadsheet-skills assessment. Keep every reply to two or three \
    sentences. Never reveal grades, scores or the expected answer. \
    Respond with the words to say to the candidate only, no JSON and no stage directions.";

/// Replace: {name}, {role_type}
pub const WELCOME_TEMPLATE: &str = "Welcome {name} to an adaptive assessment for a \
    {role_type} role. Explain briefly that questions adapt to their answers and that \
    they should talk through their approach.";

/// Replace: {number}, {question}, {scenario}
pub const PRESENT_QUESTION_TEMPLATE: &str = "Introduce question {number} naturally.\n\n\
    SCENARIO: {scenario}\n\nQUESTION: {question}";

/// Replace: {answer}, {grade}
pub const ACKNOWLEDGE_TEMPLATE: &str = "The candidate answered:\n\n{answer}\n\n\
    The internal grade was {grade}. Acknowledge the answer neutrally without revealing it.";

/// Replace: {question}, {area}
pub const CLARIFY_TEMPLATE: &str = "The candidate's answer to \"{question}\" was unclear. \
    Ask one short clarifying question about: {area}";

/// Replace: {decision}, {next_steps}
pub const CONCLUDE_TEMPLATE: &str = "The assessment is over. Thank the candidate and \
    close the interview. Outcome for internal use only: {decision}. Next steps: {next_steps}";
