//! Battle configuration.

/// Card-pool policy for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleConfig {
    /// Mark an ally's card as used when the round it was played in ends.
    pub consume_cards: bool,
    /// Reset an ally's pool as soon as every owned card has been used,
    /// making the cards selectable again within the same session.
    pub auto_reset_pool: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            consume_cards: true,
            auto_reset_pool: true,
        }
    }
}
