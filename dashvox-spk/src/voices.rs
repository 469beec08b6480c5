//! Friendly voice names and their provider identifiers

/// Voice used when nothing else is configured
pub const DEFAULT_VOICE: &str = "Adam";

/// Catalog entry for a provider voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: &'static str,
    pub id: &'static str,
    pub gender: &'static str,
    pub accent: &'static str,
}

const VOICES: &[VoiceInfo] = &[
    VoiceInfo { name: "Adam", id: "pNInz6obpgDQGcFmaJgB", gender: "male", accent: "american" },
    VoiceInfo { name: "Antoni", id: "ErXwobaYiN019PkySvjV", gender: "male", accent: "american" },
    VoiceInfo { name: "Arnold", id: "VR6AewLTigWG4xSOukaG", gender: "male", accent: "american" },
    VoiceInfo { name: "Bella", id: "EXAVITQu4vr4xnSDxMaL", gender: "female", accent: "american" },
    VoiceInfo { name: "Domi", id: "AZnzlk1XvdvUeBnXmlld", gender: "female", accent: "american" },
    VoiceInfo { name: "Elli", id: "MF3mGyEYCl7XYWbV9V6O", gender: "female", accent: "american" },
    VoiceInfo { name: "Freya", id: "jsCqWAovK2LkecY7zXl4", gender: "female", accent: "american" },
    VoiceInfo { name: "Grace", id: "oWAxZDx7w5VEj9dCyTzz", gender: "female", accent: "american" },
    VoiceInfo { name: "Josh", id: "TxGEqnHWrfWFTfGW9XjX", gender: "male", accent: "american" },
    VoiceInfo { name: "Rachel", id: "piTKgcLEGmPE4e6mEKli", gender: "female", accent: "american" },
    VoiceInfo { name: "Sam", id: "yoZ06aMxZJJ28mfd3POQ", gender: "male", accent: "american" },
];

/// All known voices, in display order
pub fn catalog() -> &'static [VoiceInfo] {
    VOICES
}

/// Look up a voice by friendly name (case-insensitive)
pub fn find(name: &str) -> Option<&'static VoiceInfo> {
    let name = name.trim();
    VOICES.iter().find(|v| v.name.eq_ignore_ascii_case(name))
}

/// Map a friendly name to its provider id; anything else is taken as a literal id.
pub fn resolve_voice_id(voice: &str) -> &str {
    match find(voice) {
        Some(info) => info.id,
        None => voice.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_names_resolve() {
        assert_eq!(resolve_voice_id("Adam"), "pNInz6obpgDQGcFmaJgB");
        assert_eq!(resolve_voice_id("josh"), "TxGEqnHWrfWFTfGW9XjX");
        assert_eq!(resolve_voice_id(" RACHEL "), "piTKgcLEGmPE4e6mEKli");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(resolve_voice_id("21m00Tcm4TlvDq8ikWAM"), "21m00Tcm4TlvDq8ikWAM");
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = catalog().iter().map(|v| v.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
        assert!(find(DEFAULT_VOICE).is_some());
    }
}
