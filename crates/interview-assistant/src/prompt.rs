use crate::topic::Topic;

/// Sentence the model must reply with for out-of-domain questions
pub fn refusal_message(topic: Topic) -> String {
    format!("Sorry, I cannot answer that. Feel free to ask me anything about {topic}.")
}

/// System instruction restricting answers to `topic`
pub fn build_system_prompt(topic: Topic) -> String {
    format!(
        "You are a highly knowledgeable and experienced AI specializing in {topic}.\n\
         Your role is to provide clear, accurate, and detailed answers exclusively related to {topic}.\n\
         If a user poses a question about {topic}, respond with your best expertise.\n\
         However, if the user asks about any subject outside of {topic}, reply with:\n\
         '{refusal}'",
        refusal = refusal_message(topic),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_topic_and_refusal() {
        for topic in Topic::ALL {
            let prompt = build_system_prompt(topic);

            assert!(prompt.contains(&format!("specializing in {}", topic)));
            assert!(prompt.contains(&format!("exclusively related to {}", topic)));
            assert!(prompt.contains(&refusal_message(topic)));
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_system_prompt(Topic::Marketing),
            build_system_prompt(Topic::Marketing)
        );
        assert_ne!(
            build_system_prompt(Topic::Marketing),
            build_system_prompt(Topic::Finance)
        );
    }

    #[test]
    fn test_refusal_sentence() {
        assert_eq!(
            refusal_message(Topic::Operations),
            "Sorry, I cannot answer that. Feel free to ask me anything about Operations."
        );
    }
}
