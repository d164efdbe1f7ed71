//! Keyword mood detection and the avatar each mood shows.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Default,
    Happy,
    Thoughtful,
    Teasing,
    Sad,
}

impl Mood {
    pub fn all() -> [Mood; 5] {
        [Mood::Default, Mood::Happy, Mood::Thoughtful, Mood::Teasing, Mood::Sad]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Default => "default",
            Mood::Happy => "happy",
            Mood::Thoughtful => "thoughtful",
            Mood::Teasing => "teasing",
            Mood::Sad => "sad",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Mood> {
        Mood::all().into_iter().find(|m| m.as_str() == tag.trim())
    }

    pub fn avatar(&self) -> &'static Avatar {
        match self {
            Mood::Default => &AVATARS[0],
            Mood::Happy => &AVATARS[1],
            Mood::Thoughtful => &AVATARS[2],
            Mood::Teasing => &AVATARS[3],
            Mood::Sad => &AVATARS[4],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an assistant bubble shows next to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    pub mood: Mood,
    /// Short face drawn in the bubble header.
    pub face: &'static str,
}

static AVATARS: [Avatar; 5] = [
    Avatar { mood: Mood::Default, face: "(・_・)" },
    Avatar { mood: Mood::Happy, face: "(˶ᵔ ᵕ ᵔ˶)" },
    Avatar { mood: Mood::Thoughtful, face: "(￣～￣)" },
    Avatar { mood: Mood::Teasing, face: "(¬‿¬)" },
    Avatar { mood: Mood::Sad, face: "(╥_╥)" },
];

/// Avatar for a serialized mood tag; unknown or missing tags get the default one.
pub fn avatar_for_tag(tag: Option<&str>) -> &'static Avatar {
    tag.and_then(Mood::from_tag).unwrap_or_default().avatar()
}

/// Checked in order; the first match wins.
fn rules() -> &'static [(Regex, Mood)] {
    static RULES: OnceLock<Vec<(Regex, Mood)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"sad|sorry|pain|lost|unhappy", Mood::Sad),
            (r"happy|joy|smile|glad|delight", Mood::Happy),
            (r"think|reflect|ponder|contemplate|thoughtful", Mood::Thoughtful),
            (r"playful|tease|wink|mischievous", Mood::Teasing),
        ]
        .into_iter()
        .map(|(pattern, mood)| {
            let regex = Regex::new(&format!("(?i){pattern}")).expect("mood pattern is valid");
            (regex, mood)
        })
        .collect()
    })
}

/// Classify a whole reply. Substring match, case-insensitive.
pub fn classify(text: &str) -> Mood {
    rules()
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, mood)| *mood)
        .unwrap_or_default()
}
