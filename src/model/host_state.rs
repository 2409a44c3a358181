use serde::{Deserialize, Serialize};

/// Read-only view of the live game the coach is attached to.
///
/// Every method takes `&self`; implementations must not change host state
/// when queried. Accessors that can fail to produce a value return `None`,
/// which the snapshot builder records as an absent field.
pub trait HostGame {
    fn is_run_active(&self) -> bool;

    fn player(&self) -> Option<LivePlayer>;

    fn master_deck(&self) -> Option<Vec<LiveCard>>;

    fn relics(&self) -> Option<Vec<String>>;

    fn floor(&self) -> Option<i32>;

    fn act(&self) -> Option<i32>;

    /// `None` when the player is not currently in a combat room.
    fn combat(&self) -> Option<LiveCombat>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivePlayer {
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    pub energy: i32,
    pub gold: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCard {
    pub name: String,
    #[serde(default)]
    pub upgraded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCombat {
    #[serde(default)]
    pub hand: Option<Vec<LiveCard>>,
    #[serde(default)]
    pub draw_pile_size: Option<usize>,
    #[serde(default)]
    pub discard_pile_size: Option<usize>,
    #[serde(default)]
    pub monsters: Option<Vec<LiveMonster>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMonster {
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub escaped: bool,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub intent_damage: i32,
}

/// A plain-data host: the whole run as a value. Loaded from JSON by the CLI
/// and used by tests in place of a live game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    #[serde(default)]
    pub run: Option<ActiveRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRun {
    pub player: LivePlayer,
    #[serde(default)]
    pub deck: Vec<LiveCard>,
    #[serde(default)]
    pub relics: Vec<String>,
    pub floor: i32,
    pub act: i32,
    #[serde(default)]
    pub combat: Option<LiveCombat>,
}

impl RunState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn active(run: ActiveRun) -> Self {
        Self { run: Some(run) }
    }
}

impl HostGame for RunState {
    fn is_run_active(&self) -> bool {
        self.run.is_some()
    }

    fn player(&self) -> Option<LivePlayer> {
        self.run.as_ref().map(|r| r.player.clone())
    }

    fn master_deck(&self) -> Option<Vec<LiveCard>> {
        self.run.as_ref().map(|r| r.deck.clone())
    }

    fn relics(&self) -> Option<Vec<String>> {
        self.run.as_ref().map(|r| r.relics.clone())
    }

    fn floor(&self) -> Option<i32> {
        self.run.as_ref().map(|r| r.floor)
    }

    fn act(&self) -> Option<i32> {
        self.run.as_ref().map(|r| r.act)
    }

    fn combat(&self) -> Option<LiveCombat> {
        self.run.as_ref().and_then(|r| r.combat.clone())
    }
}
