//! Data models for cycletime

pub mod story;

pub use story::{Label, ScoredStory, Story, StoryType, Transition};
