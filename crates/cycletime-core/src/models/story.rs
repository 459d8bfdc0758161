//! Tracker story models
//!
//! Serde mappings for the tracker API payloads plus the label helpers the
//! report layer classifies with.

use serde::{Deserialize, Serialize};

use crate::worktime::BusinessDuration;

/// Story classification for cycle-time purposes
///
/// Chores finish on `accepted`; everything else (features, bugs, releases)
/// finishes on `finished`. Unknown tracker types deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Chore,
    #[default]
    #[serde(other)]
    Other,
}

/// A story label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A tracker story as returned by the stories endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub story_type: StoryType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_state: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Story {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.name == label)
    }

    pub fn has_a_label_from(&self, labels: &[&str]) -> bool {
        labels.iter().any(|label| self.has_label(label))
    }
}

/// One state change in a story's transition log
///
/// `occurred_at` stays a raw RFC3339 string here; the state machine parses it
/// so a malformed timestamp is attributed to the story it aborts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub state: String,
    pub occurred_at: String,
}

/// A story paired with its computed cycle time
#[derive(Debug, Clone, Serialize)]
pub struct ScoredStory {
    #[serde(flatten)]
    pub story: Story,
    pub cycle_time: BusinessDuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_type_maps_chore_and_everything_else() {
        let chore: StoryType = serde_json::from_str("\"chore\"").unwrap();
        assert_eq!(chore, StoryType::Chore);

        let feature: StoryType = serde_json::from_str("\"feature\"").unwrap();
        assert_eq!(feature, StoryType::Other);

        let bug: StoryType = serde_json::from_str("\"bug\"").unwrap();
        assert_eq!(bug, StoryType::Other);
    }

    #[test]
    fn story_deserializes_from_tracker_payload() {
        let json = r#"{
            "id": 160005662,
            "story_type": "feature",
            "name": "Speed up the pipeline",
            "current_state": "accepted",
            "labels": [{"name": "broken build"}, {"name": "infra"}]
        }"#;
        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.id, 160005662);
        assert_eq!(story.story_type, StoryType::Other);
        assert!(story.has_label("broken build"));
        assert!(!story.has_label("github-issue"));
        assert!(story.has_a_label_from(&["github-issue", "infra"]));
        assert!(!story.has_a_label_from(&["github-issue", "gcp-502s"]));
    }

    #[test]
    fn story_tolerates_missing_optional_fields() {
        let story: Story =
            serde_json::from_str(r#"{"id": 7, "story_type": "chore"}"#).unwrap();
        assert_eq!(story.story_type, StoryType::Chore);
        assert!(story.labels.is_empty());
    }

    #[test]
    fn transition_deserializes() {
        let json = r#"{"state": "started", "occurred_at": "2018-09-14T16:00:00Z"}"#;
        let transition: Transition = serde_json::from_str(json).unwrap();
        assert_eq!(transition.state, "started");
        assert_eq!(transition.occurred_at, "2018-09-14T16:00:00Z");
    }
}
