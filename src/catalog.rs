//! Built-in task pools and avatars.

use alloc::vec::Vec;

use crate::task::Task;

const PRIMARY: &[(&str, bool)] = &[
    ("Tell us about the last time you lied.", false),
    ("Do a ridiculous dance for 10 seconds.", true),
    ("Do you have a secret right now?", false),
    ("Show the last photo you took on your phone.", false),
    ("Describe the most embarrassing moment of your life.", false),
    ("Speak like an animal for the next 3 turns.", true),
    ("Who would you be for a day?", false),
    ("If you had a superpower right now, which would it be?", false),
    ("Who is the funniest person in your friend group?", false),
    ("Honestly say the first thing on your mind.", false),
    ("Hug the person closest to you.", false),
    ("Do you have a secret crush?", false),
    ("Have you ever secretly used someone else's things?", false),
    ("If you could make one wish right now, what would it be?", false),
    ("Make up a song and sing it for 20 seconds.", true),
];

const DELEGATION: &[&str] = &[
    "Has anyone ever told you they were in love with you?",
    "Give someone a random compliment.",
    "Who do you trust least in your friend group?",
    "Try to walk with your eyes closed for 1 minute.",
    "What is your biggest fear?",
    "Pretend to confess your love to a friend.",
    "Tell us about the worst prank ever played on you.",
    "Read a random sentence in your funniest voice.",
    "Say what bothers you most right now.",
    "Call the last person you called and ask them a silly question.",
];

const PENALTY: &[&str] = &[
    "Have you ever revealed a secret? What was it?",
    "Call a random contact and sing them a song.",
    "Have you ever been jealous of a friend? Tell us.",
    "Confess a bad thought about someone in this room.",
    "Make up a one-minute story around a random word.",
];

/// Avatar symbols handed out at setup.
pub const AVATARS: &[&str] = &[
    "😀", "😎", "🤔", "🥳", "👽", "🤖", "🎃", "🐶", "🐱", "🦊", "🐻", "🐼", "🐨", "🦁", "🐷", "🐙",
    "🐵", "🦄", "🐲", "👻", "🥶", "🤠", "🤡", "😈",
];

/// The three task pools a game draws its decks from.
///
/// Custom tasks entered at setup are added to the primary pool for that
/// game only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskCatalog {
    /// Public per-turn tasks.
    pub primary: Vec<Task>,
    /// Secret tasks, one held by each player.
    pub delegation: Vec<Task>,
    /// Tasks drawn by the loser at the end of the game.
    pub penalty: Vec<Task>,
}

impl TaskCatalog {
    /// Creates a catalog from explicit pools.
    #[must_use]
    pub const fn new(primary: Vec<Task>, delegation: Vec<Task>, penalty: Vec<Task>) -> Self {
        Self {
            primary,
            delegation,
            penalty,
        }
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        let primary = PRIMARY
            .iter()
            .map(|&(text, votable)| {
                if votable {
                    Task::votable(text)
                } else {
                    Task::plain(text)
                }
            })
            .collect();

        Self {
            primary,
            delegation: DELEGATION.iter().copied().map(Task::plain).collect(),
            penalty: PENALTY.iter().copied().map(Task::plain).collect(),
        }
    }
}
