//! The static 78-card catalog.
//!
//! Cards 0–21 are the Major Arcana in traditional order. Cards 22–77 are the
//! Minor Arcana, generated suit by suit (Wands, Cups, Swords, Pentacles) with
//! ranks 1–14 each. The catalog is built once and never mutated; readings
//! receive clones with their orientation set at draw time.

use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::EntropyError;

/// Total number of cards in a full deck.
pub const FULL_DECK_SIZE: usize = 78;
/// Number of Major Arcana.
pub const MAJOR_ARCANA_SIZE: usize = 22;

// ---------------------------------------------------------------------------
// Card attributes
// ---------------------------------------------------------------------------

/// Display language for card names and spread positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fr => write!(f, "fr"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = EntropyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fr" | "french" => Ok(Self::Fr),
            "en" | "english" => Ok(Self::En),
            other => Err(EntropyError::InvalidParameter(format!(
                "unknown language '{other}' (expected fr or en)"
            ))),
        }
    }
}

/// Minor Arcana suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Suit {
    /// Suits in catalog order.
    pub const ALL: [Suit; 4] = [Suit::Wands, Suit::Cups, Suit::Swords, Suit::Pentacles];

    /// Classical element associated with the suit.
    pub fn element(self) -> &'static str {
        match self {
            Self::Wands => "Fire",
            Self::Cups => "Water",
            Self::Swords => "Air",
            Self::Pentacles => "Earth",
        }
    }

    pub fn name(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Wands, Language::Fr) => "Bâtons",
            (Self::Cups, Language::Fr) => "Coupes",
            (Self::Swords, Language::Fr) => "Épées",
            (Self::Pentacles, Language::Fr) => "Deniers",
            (Self::Wands, Language::En) => "Wands",
            (Self::Cups, Language::En) => "Cups",
            (Self::Swords, Language::En) => "Swords",
            (Self::Pentacles, Language::En) => "Pentacles",
        }
    }
}

/// Major card, or Minor card with suit and rank (1 = Ace … 14 = King).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Minor { suit: Suit, rank: u8 },
}

impl Arcana {
    pub fn is_major(&self) -> bool {
        matches!(self, Self::Major)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Upright,
    Reversed,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upright => write!(f, "upright"),
            Self::Reversed => write!(f, "reversed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A catalog entry. Identity is the integer `id`: equality and hashing ignore
/// orientation and names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: u8,
    pub name_fr: String,
    pub name_en: String,
    pub arcana: Arcana,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Card {
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Fr => &self.name_fr,
            Language::En => &self.name_en,
        }
    }

    /// Clone of this card with a new orientation.
    pub fn with_orientation(&self, orientation: Orientation) -> Card {
        Card {
            orientation,
            ..self.clone()
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.orientation == Orientation::Reversed
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// Deck selection
// ---------------------------------------------------------------------------

/// Which subset of the catalog a reading draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckType {
    #[default]
    Full,
    MajorOnly,
}

impl DeckType {
    pub fn size(self) -> usize {
        match self {
            Self::Full => FULL_DECK_SIZE,
            Self::MajorOnly => MAJOR_ARCANA_SIZE,
        }
    }
}

impl std::fmt::Display for DeckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::MajorOnly => write!(f, "major-only"),
        }
    }
}

impl FromStr for DeckType {
    type Err = EntropyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" | "78" => Ok(Self::Full),
            "major" | "major-only" | "major_only" | "22" => Ok(Self::MajorOnly),
            other => Err(EntropyError::InvalidParameter(format!(
                "unknown deck '{other}' (expected full or major)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog data
// ---------------------------------------------------------------------------

const MAJOR_ARCANA: [(&str, &str, [&str; 3]); MAJOR_ARCANA_SIZE] = [
    ("Le Mat", "The Fool", ["New beginnings", "Innocence", "Adventure"]),
    ("Le Bateleur", "The Magician", ["Manifestation", "Willpower", "Skill"]),
    ("La Papesse", "The High Priestess", ["Intuition", "Mystery", "Inner wisdom"]),
    ("L'Impératrice", "The Empress", ["Abundance", "Creativity", "Nurturing"]),
    ("L'Empereur", "The Emperor", ["Authority", "Structure", "Stability"]),
    ("Le Pape", "The Hierophant", ["Tradition", "Teaching", "Belief"]),
    ("L'Amoureux", "The Lovers", ["Choice", "Union", "Harmony"]),
    ("Le Chariot", "The Chariot", ["Determination", "Victory", "Control"]),
    ("La Force", "Strength", ["Courage", "Patience", "Compassion"]),
    ("L'Ermite", "The Hermit", ["Introspection", "Solitude", "Guidance"]),
    ("La Roue de Fortune", "Wheel of Fortune", ["Cycles", "Fate", "Turning point"]),
    ("La Justice", "Justice", ["Fairness", "Truth", "Cause and effect"]),
    ("Le Pendu", "The Hanged Man", ["Surrender", "New perspective", "Pause"]),
    ("La Mort", "Death", ["Endings", "Transformation", "Transition"]),
    ("La Tempérance", "Temperance", ["Balance", "Moderation", "Patience"]),
    ("Le Diable", "The Devil", ["Attachment", "Temptation", "Shadow"]),
    ("La Maison Dieu", "The Tower", ["Upheaval", "Revelation", "Sudden change"]),
    ("L'Étoile", "The Star", ["Hope", "Renewal", "Serenity"]),
    ("La Lune", "The Moon", ["Illusion", "Dreams", "Subconscious"]),
    ("Le Soleil", "The Sun", ["Joy", "Success", "Vitality"]),
    ("Le Jugement", "Judgement", ["Awakening", "Reckoning", "Renewal"]),
    ("Le Monde", "The World", ["Completion", "Fulfilment", "Wholeness"]),
];

const COURT_NAMES: [(u8, &str, &str); 4] = [
    (11, "Valet", "Page"),
    (12, "Chevalier", "Knight"),
    (13, "Reine", "Queen"),
    (14, "Roi", "King"),
];

static CATALOG: LazyLock<Vec<Card>> = LazyLock::new(build_catalog);

fn build_catalog() -> Vec<Card> {
    let mut cards = Vec::with_capacity(FULL_DECK_SIZE);

    for (id, (name_fr, name_en, keywords)) in MAJOR_ARCANA.iter().enumerate() {
        cards.push(Card {
            id: id as u8,
            name_fr: (*name_fr).to_string(),
            name_en: (*name_en).to_string(),
            arcana: Arcana::Major,
            orientation: Orientation::Upright,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        });
    }

    let mut id = MAJOR_ARCANA_SIZE as u8;
    for suit in Suit::ALL {
        for rank in 1..=14u8 {
            cards.push(minor_card(id, suit, rank));
            id += 1;
        }
    }

    cards
}

fn minor_card(id: u8, suit: Suit, rank: u8) -> Card {
    let (rank_fr, rank_en) = match COURT_NAMES.iter().find(|(r, _, _)| *r == rank) {
        Some((_, fr, en)) => (fr.to_string(), en.to_string()),
        None if rank == 1 => ("As".to_string(), "Ace".to_string()),
        None => (rank.to_string(), rank.to_string()),
    };

    Card {
        id,
        name_fr: format!("{rank_fr} de {}", suit.name(Language::Fr)),
        name_en: format!("{rank_en} of {}", suit.name(Language::En)),
        arcana: Arcana::Minor { suit, rank },
        orientation: Orientation::Upright,
        keywords: minor_keywords(suit, rank),
    }
}

fn minor_keywords(suit: Suit, rank: u8) -> Vec<String> {
    let words: [String; 3] = match rank {
        1 => ["New beginnings".into(), "Potential".into(), "Opportunity".into()],
        2 => ["Balance".into(), "Choice".into(), "Partnership".into()],
        3 => ["Growth".into(), "Expansion".into(), "Collaboration".into()],
        _ => [
            suit.name(Language::En).into(),
            suit.element().into(),
            format!("Rank {rank}"),
        ],
    };
    words.into()
}

/// The full ordered catalog (78 cards).
pub fn catalog() -> &'static [Card] {
    &CATALOG
}

/// The Major Arcana prefix of the catalog (22 cards).
pub fn major_arcana() -> &'static [Card] {
    &CATALOG[..MAJOR_ARCANA_SIZE]
}

/// Snapshot of the requested deck, in catalog order.
pub fn deck(deck_type: DeckType) -> Vec<Card> {
    match deck_type {
        DeckType::Full => catalog().to_vec(),
        DeckType::MajorOnly => major_arcana().to_vec(),
    }
}

pub fn card_by_id(id: u8) -> Option<&'static Card> {
    catalog().get(id as usize)
}
