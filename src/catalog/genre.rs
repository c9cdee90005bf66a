//! The closed set of music genres a visitor can pair with a room.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Music genre choice. Serialized as the kiosk's Korean label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicGenre {
    #[serde(rename = "인디")]
    Indie,
    #[serde(rename = "K-POP")]
    KPop,
    #[serde(rename = "팝")]
    Pop,
    #[serde(rename = "힙합/랩")]
    HipHop,
    #[serde(rename = "R&B")]
    RnB,
    #[serde(rename = "록")]
    Rock,
    #[serde(rename = "발라드")]
    Ballad,
    #[serde(rename = "재즈")]
    Jazz,
    #[serde(rename = "클래식")]
    Classical,
    #[serde(rename = "EDM/일렉트로닉")]
    Electronic,
    #[serde(rename = "기타")]
    Other,
}

impl MusicGenre {
    /// Kiosk display order.
    pub const ALL: [MusicGenre; 11] = [
        MusicGenre::Indie,
        MusicGenre::KPop,
        MusicGenre::Pop,
        MusicGenre::HipHop,
        MusicGenre::RnB,
        MusicGenre::Rock,
        MusicGenre::Ballad,
        MusicGenre::Jazz,
        MusicGenre::Classical,
        MusicGenre::Electronic,
        MusicGenre::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MusicGenre::Indie => "인디",
            MusicGenre::KPop => "K-POP",
            MusicGenre::Pop => "팝",
            MusicGenre::HipHop => "힙합/랩",
            MusicGenre::RnB => "R&B",
            MusicGenre::Rock => "록",
            MusicGenre::Ballad => "발라드",
            MusicGenre::Jazz => "재즈",
            MusicGenre::Classical => "클래식",
            MusicGenre::Electronic => "EDM/일렉트로닉",
            MusicGenre::Other => "기타",
        }
    }
}

impl fmt::Display for MusicGenre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for genre in MusicGenre::ALL {
            let json = serde_json::to_string(&genre).unwrap();
            assert_eq!(json, format!("\"{}\"", genre.label()));
        }
    }

    #[test]
    fn test_eleven_distinct_genres() {
        let labels: std::collections::HashSet<_> = MusicGenre::ALL.iter().map(|g| g.label()).collect();
        assert_eq!(labels.len(), 11);
    }
}
