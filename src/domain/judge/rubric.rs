use crate::domain::test_case::TestCase;

/// Criteria used when a test case lists no expectations
pub const GENERIC_CRITERIA: &str = "overall quality, accuracy, and helpfulness";

const CRITERIA_DELIMITER: &str = "; ";

/// Build the prompt sent to the judge model
pub fn build_rubric_prompt(persona_instruction: &str, test_case: &TestCase, response: &str) -> String {
    let criteria = if test_case.expectations().is_empty() {
        GENERIC_CRITERIA.to_string()
    } else {
        test_case.expectations().join(CRITERIA_DELIMITER)
    };

    format!(
        "{persona}\n\n\
         Evaluate the AI response below against these criteria: {criteria}\n\n\
         ### Original prompt\n{prompt}\n\n\
         ### Response to evaluate\n{response}\n\n\
         Reply with a single JSON object and nothing else, in the form \
         {{\"score\": <float between 0.0 and 1.0>, \"reasoning\": \"<one or two sentences>\"}}",
        persona = persona_instruction,
        criteria = criteria,
        prompt = test_case.prompt(),
        response = response,
    )
}
