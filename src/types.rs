// Shared domain types: wedding events, dress codes and color suggestions

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

/// Wedding ceremonies the stylist knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventType {
    Nikkah,
    #[default]
    Baraat,
    Valima,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Nikkah, EventType::Baraat, EventType::Valima];

    /// Traditional attire for this ceremony
    pub fn dress_code(self) -> DressCombination {
        match self {
            EventType::Nikkah => DressCombination {
                bride: "Gharara or Sharara",
                groom: "Kurta Pajama with Waistcoat",
            },
            EventType::Baraat => DressCombination {
                bride: "Lehenga, Gharara or Sharara",
                groom: "Sherwani with Turban",
            },
            EventType::Valima => DressCombination {
                bride: "Gown or Lehenga",
                groom: "3-Piece Suit",
            },
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Nikkah => write!(f, "Nikkah"),
            EventType::Baraat => write!(f, "Baraat"),
            EventType::Valima => write!(f, "Valima"),
        }
    }
}

/// Attire description per role for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DressCombination {
    pub bride: &'static str,
    pub groom: &'static str,
}

/// Which half of the couple a color belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Bride,
    Groom,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Bride => Role::Groom,
            Role::Groom => Role::Bride,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Bride => write!(f, "bride"),
            Role::Groom => write!(f, "groom"),
        }
    }
}

/// One complementary color proposed by the text model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorSuggestion {
    pub name: String,
    pub hex: String,
}

/// Preview image returned by the image model, kept only in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    base64: String,
    bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn from_base64(payload: String) -> Result<Self, base64::DecodeError> {
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self {
            base64: payload,
            bytes,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.base64.trim())
    }
}
