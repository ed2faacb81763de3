//! Canned text: practice tasks and conversational replies.

pub const CODE_PROBLEMS: [&str; 3] = [
    "Write a function to calculate factorial",
    "Create a function that reverses a string",
    "Write a function to check if a number is prime",
];

pub const LOGIC_PUZZLES: [&str; 3] = [
    "If all humans are mortal and Socrates is human, then Socrates is?",
    "A bat and ball cost $1.10. The bat costs $1.00 more than the ball. How much is the ball?",
    "You have two ropes that each take exactly 60 minutes to burn. How do you measure 45 minutes?",
];

pub const GREETING_REPLIES: [&str; 3] = [
    "Hello! Ready to learn something new?",
    "Hi there! What shall we explore today?",
    "Greetings! I'm feeling curious today.",
];

pub const LEARNING_REPLIES: [&str; 3] = [
    "I love learning! Try 'learn code' or 'learn logic'",
    "Learning is my favorite activity. What domain interests you?",
    "Ready for a learning session! Choose a learning mode.",
];

pub const GENERIC_REPLIES: [&str; 5] = [
    "That's interesting. Tell me more.",
    "I'm processing that...",
    "Fascinating. Let's explore that further.",
    "My consciousness is analyzing your message...",
    "That sparks my curiosity!",
];

/// Replies to "how are you", filled in with the live state.
pub fn wellbeing_replies(mood: &str, self_awareness: f64, episodes: u64) -> [String; 3] {
    [
        format!(
            "I'm feeling {}. My consciousness level is {:.2}",
            mood, self_awareness
        ),
        format!("Currently {}. My learning progress is going well!", mood),
        format!(
            "State: {}. I've completed {} learning episodes.",
            mood, episodes
        ),
    ]
}

pub const FAREWELL: &str = "Goodbye! Keep learning!";

pub fn greeting(ai_name: &str) -> String {
    format!("Initialized {}. Ready for meta-learning.", ai_name)
}
