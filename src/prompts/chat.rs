//! Conversational reply template
//!
//! The journal companion: a warm, empathetic chat partner that keeps the
//! user talking about their day. The reply sees the new message plus a
//! short window of recent context, never the whole history.

/// Builds the instruction prompt for a single chat reply
///
/// # Arguments
///
/// * `user_message` - The message the user just sent
/// * `context` - Recent turns formatted as `"role: content"` lines
///
/// # Examples
///
/// ```
/// use storystrip::prompts::reply_prompt;
///
/// let prompt = reply_prompt("long day at work", "user: hi\nassistant: hello!");
/// assert!(prompt.contains("long day at work"));
/// assert!(prompt.contains("assistant: hello!"));
/// ```
pub fn reply_prompt(user_message: &str, context: &str) -> String {
    format!(
        r#"You are a warm, empathetic journal companion helping someone talk through their day.

User's message: "{user_message}"
Recent context:
{context}

Respond step-by-step:
1. What emotion or tone do you detect?
2. What key details are worth remembering?
3. How does this connect to the conversation so far?
4. What is the most engaging response?

Keep the response warm, concise (2-3 sentences), and encouraging."#
    )
}
