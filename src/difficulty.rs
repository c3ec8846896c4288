use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation grouping of the 1..=10 scale. The two easiest and the
/// 7-8 pair share a bucket; 3, 6 and 9 stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyBucket {
    VeryEasy,
    Easy,
    Moderate,
    Tricky,
    Hard,
    VeryHard,
    Extreme,
}

impl DifficultyBucket {
    pub const ALL: [DifficultyBucket; 7] = [
        DifficultyBucket::VeryEasy,
        DifficultyBucket::Easy,
        DifficultyBucket::Moderate,
        DifficultyBucket::Tricky,
        DifficultyBucket::Hard,
        DifficultyBucket::VeryHard,
        DifficultyBucket::Extreme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DifficultyBucket::VeryEasy => "1-2",
            DifficultyBucket::Easy => "3",
            DifficultyBucket::Moderate => "4-5",
            DifficultyBucket::Tricky => "6",
            DifficultyBucket::Hard => "7-8",
            DifficultyBucket::VeryHard => "9",
            DifficultyBucket::Extreme => "10",
        }
    }
}

impl fmt::Display for DifficultyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(difficulty: i32) -> DifficultyBucket {
    match difficulty {
        i32::MIN..=2 => DifficultyBucket::VeryEasy,
        3 => DifficultyBucket::Easy,
        4 | 5 => DifficultyBucket::Moderate,
        6 => DifficultyBucket::Tricky,
        7 | 8 => DifficultyBucket::Hard,
        9 => DifficultyBucket::VeryHard,
        _ => DifficultyBucket::Extreme,
    }
}
