pub mod dialogue;

pub use dialogue::{DialogueState, Intent};
