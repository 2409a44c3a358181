use tracing::debug;

use crate::model::game_state::{
    CardRef,
    CombatSnapshot,
    EnemySnapshot,
    GameSnapshot,
    PlayerSnapshot,
};
use crate::model::host_state::{HostGame, LiveCard, LiveCombat, LiveMonster};

pub const NO_ACTIVE_RUN: &str = "No active game";

/// Reads the host and captures the minimal state the coach needs.
/// Never fails: anything the host can't report is left out.
pub fn extract<H: HostGame + ?Sized>(host: &H) -> GameSnapshot {
    if !host.is_run_active() {
        debug!("No active run, returning error snapshot");
        return GameSnapshot::no_active_run(NO_ACTIVE_RUN);
    }

    let snapshot = GameSnapshot {
        player: host.player().map(|p| PlayerSnapshot {
            current_hp: Some(p.current_hp),
            max_hp: Some(p.max_hp),
            energy: Some(p.energy),
            gold: Some(p.gold),
            character_name: Some(p.name),
        }),
        deck: host.master_deck().map(|cards| card_list(&cards)),
        relics: host.relics(),
        floor: host.floor(),
        act: host.act(),
        combat: host.combat().map(combat_snapshot),
        error: None,
    };

    debug!(
        deck = snapshot.deck.as_ref().map_or(0, Vec::len),
        in_combat = snapshot.in_combat(),
        "Extracted game snapshot"
    );

    snapshot
}

fn card_list(cards: &[LiveCard]) -> Vec<CardRef> {
    cards
        .iter()
        .map(|card| CardRef::new(&card.name, card.upgraded))
        .collect()
}

fn combat_snapshot(combat: LiveCombat) -> CombatSnapshot {
    CombatSnapshot {
        hand: combat.hand.as_deref().map(card_list).unwrap_or_default(),
        draw_pile_size: combat.draw_pile_size,
        discard_pile_size: combat.discard_pile_size,
        enemies: combat
            .monsters
            .unwrap_or_default()
            .into_iter()
            .filter(|m| !m.is_dead && !m.escaped)
            .map(enemy_snapshot)
            .collect(),
    }
}

fn enemy_snapshot(monster: LiveMonster) -> EnemySnapshot {
    // damage only means something alongside an intent
    let intent_damage = monster
        .intent
        .as_ref()
        .and(Some(monster.intent_damage))
        .filter(|dmg| *dmg > 0);

    EnemySnapshot {
        name: monster.name,
        current_hp: monster.current_hp,
        max_hp: monster.max_hp,
        intent: monster.intent,
        intent_damage,
    }
}
