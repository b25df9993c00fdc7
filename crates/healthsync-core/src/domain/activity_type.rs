use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Mindfulness,
    Steps,
    Workout,
    Sleep,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Mindfulness,
        ActivityType::Steps,
        ActivityType::Workout,
        ActivityType::Sleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Mindfulness => "mindfulness",
            ActivityType::Steps => "steps",
            ActivityType::Workout => "workout",
            ActivityType::Sleep => "sleep",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mindfulness" | "mindful" | "meditation" => Some(ActivityType::Mindfulness),
            "steps" | "step" => Some(ActivityType::Steps),
            "workout" | "workouts" => Some(ActivityType::Workout),
            "sleep" => Some(ActivityType::Sleep),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
