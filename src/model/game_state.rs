use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker appended to the display name of an upgraded card.
pub const UPGRADE_MARKER: char = '+';

/// A point-in-time capture of the player's run, sent through the prompt
/// builder to the LLM. Built fresh for every advice request and never mutated.
///
/// `error` is set only when there was no active run; every other field is
/// absent in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Vec<CardRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relics: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<CombatSnapshot>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GameSnapshot {
    /// The snapshot produced when the host has no run in progress.
    pub fn no_active_run(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    #[serde(
        rename = "current_energy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub energy: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<i32>,

    #[serde(
        rename = "character",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub character_name: Option<String>,
}

/// A card as it appears in a deck or hand listing.
///
/// `name` never carries a trailing upgrade marker; [`fmt::Display`] adds
/// exactly one when `upgraded` is set. This is the only place the marker is
/// applied, for both deck and hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct CardRef {
    pub name: String,
    pub upgraded: bool,
}

impl CardRef {
    /// Normalizes a host card name. Hosts that already bake the marker into
    /// the name (`"Strike+"`) end up with the same value as those that don't.
    pub fn new(name: impl AsRef<str>, upgraded: bool) -> Self {
        let name = name.as_ref();
        let base = if has_upgrade_counter(name) {
            name
        } else {
            name.trim_end_matches(UPGRADE_MARKER)
        };

        Self {
            name: base.trim_end().to_string(),
            upgraded,
        }
    }
}

/// `true` for names like `"Searing Blow+3"` whose upgrade level is already
/// spelled out.
fn has_upgrade_counter(name: &str) -> bool {
    match name.rsplit_once(UPGRADE_MARKER) {
        Some((base, digits)) => {
            !base.is_empty() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.upgraded && !has_upgrade_counter(&self.name) {
            write!(f, "{}", UPGRADE_MARKER)?;
        }
        Ok(())
    }
}

impl From<CardRef> for String {
    fn from(card: CardRef) -> Self {
        card.to_string()
    }
}

impl From<String> for CardRef {
    fn from(display: String) -> Self {
        let upgraded = display.ends_with(UPGRADE_MARKER) || has_upgrade_counter(&display);
        CardRef::new(display, upgraded)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    #[serde(default)]
    pub hand: Vec<CardRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_pile_size: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard_pile_size: Option<usize>,

    #[serde(default)]
    pub enemies: Vec<EnemySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_damage: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgraded_card_gets_one_marker() {
        assert_eq!(CardRef::new("Strike", true).to_string(), "Strike+");
        assert_eq!(CardRef::new("Strike+", true).to_string(), "Strike+");
        assert_eq!(CardRef::new("Strike++", true).to_string(), "Strike+");
        assert_eq!(CardRef::new("Strike", false).to_string(), "Strike");
    }

    #[test]
    fn counted_upgrades_are_left_alone() {
        assert_eq!(
            CardRef::new("Searing Blow+3", true).to_string(),
            "Searing Blow+3"
        );
    }

    #[test]
    fn error_snapshot_serializes_only_error() {
        let snapshot = GameSnapshot::no_active_run("No active game");
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "No active game" }));
    }

    #[test]
    fn serializes_original_wire_keys() {
        let snapshot = GameSnapshot {
            player: Some(PlayerSnapshot {
                current_hp: Some(42),
                max_hp: Some(70),
                energy: Some(3),
                gold: Some(99),
                character_name: Some("Ironclad".into()),
            }),
            deck: Some(vec![CardRef::new("Bash", true)]),
            ..GameSnapshot::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["player"]["current_energy"], 3);
        assert_eq!(json["player"]["character"], "Ironclad");
        assert_eq!(json["deck"][0], "Bash+");
        assert!(json.get("combat").is_none());

        let back: GameSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
