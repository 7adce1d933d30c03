//! Prompt construction shared by every AI backend.

use quizforge_domain::DifficultyLevel;

/// System prompt for question generation.
pub fn generation_system_prompt() -> String {
    r#"You are a trivia question writer for an adaptive quiz game.

You MUST respond with EXACTLY this JSON format and nothing else:
```json
{
  "statement": "the question text",
  "options": [
    {"text": "option A", "is_correct": false},
    {"text": "option B", "is_correct": true},
    {"text": "option C", "is_correct": false},
    {"text": "option D", "is_correct": false}
  ],
  "correct_explanation": "shown when the player answers correctly",
  "incorrect_explanation": "shown when the player answers incorrectly",
  "source": "optional reference, may be null"
}
```

Rules:
1. Exactly 4 options with exactly 1 marked correct
2. Option texts must be distinct
3. Both explanations must be non-empty
4. Do not include any text outside the JSON block"#
        .to_string()
}

/// User message asking for one question on `topic` at the given tier.
pub fn generation_user_prompt(topic: &str, difficulty: DifficultyLevel) -> String {
    format!(
        r#"Write one multiple-choice trivia question.

Topic: {topic}
Difficulty: {} of 5 ({} - {})

Respond with the JSON format specified."#,
        difficulty.as_u8(),
        difficulty.label(),
        difficulty.prompt_description(),
    )
}

/// System prompt for judging a free-form answer.
pub fn validation_system_prompt() -> String {
    r#"You are a trivia judge. Given a question and a player's answer, decide
whether the answer is correct.

You MUST respond with EXACTLY this JSON format and nothing else:
```json
{
  "is_correct": true or false,
  "explanation": "one or two sentences justifying the verdict"
}
```"#
        .to_string()
}

pub fn validation_user_prompt(statement: &str, answer: &str) -> String {
    format!(
        r#"## Question
{statement}

## Player's answer
{answer}

Judge the answer and respond with the JSON format specified."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_names_the_tier() {
        let prompt = generation_user_prompt("roman history", DifficultyLevel::Advanced);
        assert!(prompt.contains("roman history"));
        assert!(prompt.contains("4 of 5"));
        assert!(prompt.contains("advanced"));
    }
}
