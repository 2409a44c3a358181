use crate::model::game_state::{
    CardRef, CombatSnapshot, EnemySnapshot, GameSnapshot, PlayerSnapshot,
};

pub const COACH_PREAMBLE: &str =
    "You are an expert Slay the Spire coach. Analyze the current game state and provide concise, actionable advice.";

pub const COMBAT_INSTRUCTION: &str =
    "Provide specific advice for this combat turn. What cards should be played and in what order?";

pub const GENERAL_INSTRUCTION: &str =
    "Not currently in combat. Provide general strategy advice for the current run.";

/// Builds the user prompt sent to the LLM from a snapshot.
/// Only formats text: no I/O, no hidden state. Equal snapshots give
/// byte-identical prompts.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(snapshot: &GameSnapshot) -> String {
        let mut prompt = String::new();

        prompt.push_str(COACH_PREAMBLE);
        prompt.push_str("\n\n");
        prompt.push_str("Game State:\n");

        if let Some(player) = &snapshot.player {
            push_player_section(&mut prompt, player);
        }

        if let (Some(floor), Some(act)) = (snapshot.floor, snapshot.act) {
            prompt.push_str(&format!("Floor: {} (Act {})\n", floor, act));
        }

        if let Some(deck) = &snapshot.deck {
            prompt.push_str(&format!("\nDeck ({} cards):\n", deck.len()));
            prompt.push_str(&join_cards(deck));
            prompt.push('\n');
        }

        if let Some(relics) = &snapshot.relics {
            prompt.push_str("\nRelics:\n");
            prompt.push_str(&relics.join(", "));
            prompt.push('\n');
        }

        match &snapshot.combat {
            Some(combat) => push_combat_section(&mut prompt, combat),
            None => {
                prompt.push('\n');
                prompt.push_str(GENERAL_INSTRUCTION);
                prompt.push('\n');
            }
        }

        prompt
    }
}

fn push_player_section(prompt: &mut String, player: &PlayerSnapshot) {
    if let Some(name) = &player.character_name {
        prompt.push_str(&format!("Character: {}\n", name));
    }
    if let (Some(current), Some(max)) = (player.current_hp, player.max_hp) {
        prompt.push_str(&format!("HP: {}/{}\n", current, max));
    }
    if let Some(energy) = player.energy {
        prompt.push_str(&format!("Energy: {}\n", energy));
    }
    if let Some(gold) = player.gold {
        prompt.push_str(&format!("Gold: {}\n", gold));
    }
}

fn push_combat_section(prompt: &mut String, combat: &CombatSnapshot) {
    prompt.push_str("\n=== COMBAT ===\n");

    if !combat.hand.is_empty() {
        prompt.push_str("Hand: ");
        prompt.push_str(&join_cards(&combat.hand));
        prompt.push('\n');
    }

    if !combat.enemies.is_empty() {
        prompt.push_str("\nEnemies:\n");
        for enemy in &combat.enemies {
            push_enemy_line(prompt, enemy);
        }
    }

    prompt.push('\n');
    prompt.push_str(COMBAT_INSTRUCTION);
    prompt.push('\n');
}

fn push_enemy_line(prompt: &mut String, enemy: &EnemySnapshot) {
    prompt.push_str(&format!(
        "  - {}: HP {}/{}",
        enemy.name, enemy.current_hp, enemy.max_hp
    ));

    if let Some(intent) = &enemy.intent {
        prompt.push_str(&format!(", Intent: {}", intent));
        if let Some(damage) = enemy.intent_damage.filter(|d| *d > 0) {
            prompt.push_str(&format!(" (Damage: {})", damage));
        }
    }

    prompt.push('\n');
}

fn join_cards(cards: &[CardRef]) -> String {
    cards
        .iter()
        .map(CardRef::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ironclad() -> GameSnapshot {
        GameSnapshot {
            player: Some(PlayerSnapshot {
                current_hp: Some(42),
                max_hp: Some(70),
                energy: Some(3),
                gold: Some(120),
                character_name: Some("Ironclad".into()),
            }),
            deck: Some(vec![CardRef::new("Strike", false), CardRef::new("Strike", true)]),
            relics: Some(vec!["Burning Blood".into()]),
            floor: Some(5),
            act: Some(1),
            combat: None,
            error: None,
        }
    }

    fn in_combat() -> GameSnapshot {
        GameSnapshot {
            combat: Some(CombatSnapshot {
                hand: vec![CardRef::new("Bash", true), CardRef::new("Defend", false)],
                draw_pile_size: Some(5),
                discard_pile_size: Some(0),
                enemies: vec![
                    EnemySnapshot {
                        name: "Jaw Worm".into(),
                        current_hp: 40,
                        max_hp: 44,
                        intent: Some("ATTACK".into()),
                        intent_damage: Some(11),
                    },
                    EnemySnapshot {
                        name: "Cultist".into(),
                        current_hp: 50,
                        max_hp: 50,
                        intent: Some("BUFF".into()),
                        intent_damage: None,
                    },
                    EnemySnapshot {
                        name: "Louse".into(),
                        current_hp: 3,
                        max_hp: 12,
                        intent: None,
                        intent_damage: None,
                    },
                ],
            }),
            ..ironclad()
        }
    }

    #[test]
    fn out_of_combat_prompt() {
        let prompt = PromptBuilder::build(&ironclad());
        let lines: Vec<&str> = prompt.lines().collect();

        assert!(prompt.starts_with(COACH_PREAMBLE));
        assert!(lines.contains(&"Character: Ironclad"));
        assert!(lines.contains(&"HP: 42/70"));
        assert!(lines.contains(&"Energy: 3"));
        assert!(lines.contains(&"Gold: 120"));
        assert!(lines.contains(&"Floor: 5 (Act 1)"));

        let deck_at = lines.iter().position(|l| *l == "Deck (2 cards):").unwrap();
        assert_eq!(lines[deck_at + 1], "Strike, Strike+");

        let relics_at = lines.iter().position(|l| *l == "Relics:").unwrap();
        assert_eq!(lines[relics_at + 1], "Burning Blood");

        assert!(prompt.trim_end().ends_with(GENERAL_INSTRUCTION));
        assert!(!prompt.contains(COMBAT_INSTRUCTION));
        assert!(!prompt.contains("=== COMBAT ==="));
    }

    #[test]
    fn combat_prompt() {
        let prompt = PromptBuilder::build(&in_combat());

        assert!(prompt.contains("\n=== COMBAT ===\nHand: Bash+, Defend\n"));
        assert!(prompt.contains("\nEnemies:\n"));
        assert!(prompt.contains("  - Jaw Worm: HP 40/44, Intent: ATTACK (Damage: 11)\n"));
        assert!(prompt.contains("  - Cultist: HP 50/50, Intent: BUFF\n"));
        assert!(prompt.contains("  - Louse: HP 3/12\n"));
        assert!(prompt.trim_end().ends_with(COMBAT_INSTRUCTION));
        assert!(!prompt.contains(GENERAL_INSTRUCTION));
    }

    #[test]
    fn non_positive_damage_is_hidden() {
        let mut snapshot = in_combat();
        if let Some(combat) = snapshot.combat.as_mut() {
            combat.enemies[0].intent_damage = Some(0);
        }

        let prompt = PromptBuilder::build(&snapshot);

        assert!(prompt.contains("  - Jaw Worm: HP 40/44, Intent: ATTACK\n"));
        assert!(!prompt.contains("Damage"));
    }

    #[test]
    fn same_snapshot_same_prompt() {
        let a = PromptBuilder::build(&in_combat());
        let b = PromptBuilder::build(&in_combat().clone());

        assert_eq!(a, b);
    }

    #[test]
    fn error_snapshot_formats_without_sections() {
        let prompt = PromptBuilder::build(&GameSnapshot::no_active_run("No active game"));

        assert_eq!(
            prompt,
            format!("{}\n\nGame State:\n\n{}\n", COACH_PREAMBLE, GENERAL_INSTRUCTION)
        );
    }

    #[test]
    fn hp_needs_both_values() {
        let mut snapshot = ironclad();
        if let Some(player) = snapshot.player.as_mut() {
            player.max_hp = None;
        }
        snapshot.act = None;

        let prompt = PromptBuilder::build(&snapshot);

        assert!(!prompt.contains("HP:"));
        assert!(!prompt.contains("Floor:"));
        assert!(prompt.contains("Character: Ironclad\n"));
    }

    #[test]
    fn empty_hand_and_enemies_still_close_with_turn_instruction() {
        let snapshot = GameSnapshot {
            combat: Some(CombatSnapshot::default()),
            ..ironclad()
        };

        let prompt = PromptBuilder::build(&snapshot);

        assert!(!prompt.contains("Hand:"));
        assert!(!prompt.contains("Enemies:"));
        assert!(prompt.ends_with(&format!("=== COMBAT ===\n\n{}\n", COMBAT_INSTRUCTION)));
    }
}
