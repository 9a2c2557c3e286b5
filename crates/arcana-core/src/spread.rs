//! Built-in spread layouts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Language;
use crate::error::EntropyError;

/// One of the four fixed spreads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadType {
    Single,
    #[default]
    PastPresentFuture,
    Horseshoe,
    CelticCross,
}

/// Required card count plus one label per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpreadDescriptor {
    pub card_count: usize,
    pub positions: &'static [&'static str],
}

const SINGLE_FR: [&str; 1] = ["La Réponse"];
const SINGLE_EN: [&str; 1] = ["The Answer"];

const PPF_FR: [&str; 3] = ["Le Passé", "Le Présent", "Le Futur"];
const PPF_EN: [&str; 3] = ["The Past", "The Present", "The Future"];

const HORSESHOE_FR: [&str; 7] = [
    "Le Passé",
    "Le Présent",
    "Influences Cachées",
    "Obstacles",
    "Environnement",
    "Action Recommandée",
    "Résultat Probable",
];
const HORSESHOE_EN: [&str; 7] = [
    "The Past",
    "The Present",
    "Hidden Influences",
    "Obstacles",
    "Surroundings",
    "Recommended Action",
    "Likely Outcome",
];

const CELTIC_FR: [&str; 10] = [
    "Situation Actuelle",
    "Défi/Obstacle",
    "Passé Récent",
    "Futur Proche",
    "Objectif Conscient",
    "Influences Inconscientes",
    "Votre Position",
    "Influences Extérieures",
    "Espoirs et Peurs",
    "Résultat Final",
];
const CELTIC_EN: [&str; 10] = [
    "Present Situation",
    "Challenge",
    "Recent Past",
    "Near Future",
    "Conscious Goal",
    "Unconscious Influences",
    "Your Stance",
    "External Influences",
    "Hopes and Fears",
    "Final Outcome",
];

impl SpreadType {
    pub const ALL: [SpreadType; 4] = [
        SpreadType::Single,
        SpreadType::PastPresentFuture,
        SpreadType::Horseshoe,
        SpreadType::CelticCross,
    ];

    pub fn card_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::PastPresentFuture => 3,
            Self::Horseshoe => 7,
            Self::CelticCross => 10,
        }
    }

    pub fn descriptor(self, language: Language) -> SpreadDescriptor {
        let positions: &'static [&'static str] = match (self, language) {
            (Self::Single, Language::Fr) => &SINGLE_FR,
            (Self::Single, Language::En) => &SINGLE_EN,
            (Self::PastPresentFuture, Language::Fr) => &PPF_FR,
            (Self::PastPresentFuture, Language::En) => &PPF_EN,
            (Self::Horseshoe, Language::Fr) => &HORSESHOE_FR,
            (Self::Horseshoe, Language::En) => &HORSESHOE_EN,
            (Self::CelticCross, Language::Fr) => &CELTIC_FR,
            (Self::CelticCross, Language::En) => &CELTIC_EN,
        };
        SpreadDescriptor {
            card_count: self.card_count(),
            positions,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Single => "One card for a quick, direct answer.",
            Self::PastPresentFuture => "Three cards for the past, present and future of a situation.",
            Self::Horseshoe => "Seven cards in an arc for a panoramic view of the path ahead.",
            Self::CelticCross => "The classic ten-card spread covering every aspect of a question.",
        }
    }
}

impl std::fmt::Display for SpreadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::PastPresentFuture => write!(f, "past-present-future"),
            Self::Horseshoe => write!(f, "horseshoe"),
            Self::CelticCross => write!(f, "celtic-cross"),
        }
    }
}

impl FromStr for SpreadType {
    type Err = EntropyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(Self::Single),
            "past-present-future" | "ppf" | "three" | "3" => Ok(Self::PastPresentFuture),
            "horseshoe" | "7" => Ok(Self::Horseshoe),
            "celtic-cross" | "celtic" | "10" => Ok(Self::CelticCross),
            other => Err(EntropyError::InvalidParameter(format!(
                "unknown spread '{other}'"
            ))),
        }
    }
}
