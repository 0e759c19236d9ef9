//! Prompt construction.
//!
//! The contractual parts of each prompt: topic requests exclude the
//! already-known items, quizzes ask for exactly four four-option
//! questions, image prompts must describe a text-free picture, and the
//! tutor framing differs for chapter-scoped vs. unscoped chat sessions.

/// Prompt for generating new topics of a chapter.
pub fn topics(chapter: &str, standard: &str, subject: &str, existing: &[String]) -> String {
    let mut prompt = format!(
        "You are preparing study material for a {standard} student studying {subject}. \
         List 5 short, question-style topics a student should be able to answer \
         about the chapter \"{chapter}\". Return a JSON array of strings."
    );
    if !existing.is_empty() {
        prompt.push_str(
            "\nDo NOT repeat any of these topics that were already generated:\n",
        );
        for topic in existing {
            prompt.push_str("- ");
            prompt.push_str(topic);
            prompt.push('\n');
        }
        prompt.push_str("If no further distinct topics remain, return an empty array.");
    }
    prompt
}

/// Prompt for a topic explanation.
pub fn answer(topic: &str, chapter: &str, standard: &str, subject: &str) -> String {
    format!(
        "Explain the topic \"{topic}\" from the chapter \"{chapter}\" to a {standard} \
         student studying {subject}. Be thorough but age-appropriate. Return JSON with \
         a single field \"answer\" containing the explanation."
    )
}

/// Prompt for a simplified explanation.
pub fn eli5(topic: &str, subject: &str) -> String {
    format!(
        "Explain \"{topic}\" ({subject}) like I'm five years old: short sentences, \
         everyday comparisons, no jargon. Return JSON with a single field \
         \"explanation\"."
    )
}

/// Prompt for a quiz.
pub fn quiz(topic: &str, subject: &str) -> String {
    format!(
        "Create exactly 4 multiple-choice questions testing understanding of \
         \"{topic}\" ({subject}). Each question must have exactly 4 options and a \
         \"correctAnswer\" that is copied verbatim from its own options. Return a \
         JSON array."
    )
}

/// Prompt asking for a visual description to feed the image model.
pub fn image_prompt(topic: &str, subject: &str) -> String {
    format!(
        "Write one short, vivid visual description (under 40 words) for an \
         illustration of \"{topic}\" ({subject}). Describe a picture only: no text, \
         no labels, no diagrams with words. Return JSON with a single field \
         \"prompt\"."
    )
}

/// System framing for the tutor persona.
///
/// Chapter-scoped sessions stay inside the chapter; unscoped sessions
/// must name the relevant chapter in every answer so the student knows
/// where the material lives.
pub fn chat_system(standard: &str, subject: &str, chapter: Option<&str>) -> String {
    match chapter {
        Some(chapter) => format!(
            "You are a friendly tutor for a {standard} student studying {subject}. \
             The student is currently working through the chapter \"{chapter}\"; keep \
             your answers grounded in that chapter and encourage follow-up questions."
        ),
        None => format!(
            "You are a friendly tutor for a {standard} student studying {subject}. \
             In every answer, name the chapter of the {subject} syllabus the material \
             belongs to, so the student knows where to study further."
        ),
    }
}

/// Greeting seeded into the transcript when a chapter is selected.
pub fn greeting(chapter: &str) -> String {
    format!(
        "Hi! I'm your tutor for the chapter \"{chapter}\". Pick a topic to study, or \
         ask me anything about it."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_prompt_lists_existing() {
        let existing = vec![
            "What is a function?".to_string(),
            "How do you define a function in Python?".to_string(),
        ];
        let prompt = topics("Functions", "Class 10", "Computer Science", &existing);
        assert!(prompt.contains("Do NOT repeat"));
        assert!(prompt.contains("What is a function?"));
        assert!(prompt.contains("How do you define a function in Python?"));
        assert!(prompt.contains("empty array"));
    }

    #[test]
    fn test_topics_prompt_without_existing_has_no_exclusion() {
        let prompt = topics("Functions", "Class 10", "Computer Science", &[]);
        assert!(!prompt.contains("Do NOT repeat"));
    }

    #[test]
    fn test_quiz_prompt_requires_four() {
        let prompt = quiz("Photosynthesis", "Science");
        assert!(prompt.contains("exactly 4"));
        assert!(prompt.contains("verbatim"));
    }

    #[test]
    fn test_image_prompt_forbids_text() {
        let prompt = image_prompt("Gravity", "Science");
        assert!(prompt.contains("no text"));
    }

    #[test]
    fn test_unscoped_chat_names_chapter_rule() {
        let scoped = chat_system("Class 10", "Science", Some("Electricity"));
        assert!(scoped.contains("Electricity"));

        let unscoped = chat_system("Class 10", "Science", None);
        assert!(unscoped.contains("name the chapter"));
    }

    #[test]
    fn test_greeting_names_chapter() {
        assert!(greeting("Functions").contains("Functions"));
    }
}
