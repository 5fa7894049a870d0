//! Top-surface landing test between the player and platforms.
//!
//! Platforms are one-way: only a player falling onto a platform's top edge is
//! stopped. There is no side or ceiling collision, and the player may pass
//! upward through a platform.

use crate::entities::Platform;
use crate::player::Player;

/// Whether `player` lands on `platform` this tick: its bottom is at or above
/// the top edge now, will be at or below it after moving, and the horizontal
/// extents overlap (touching edges count).
pub fn lands_on(player: &Player, platform: &Platform) -> bool {
    let bottom = player.bottom();
    bottom <= platform.top()
        && bottom + player.velocity.y >= platform.top()
        && player.right() >= platform.left()
        && player.position.x <= platform.right()
}

/// Zero the player's vertical velocity if it is about to land on any
/// platform. Returns whether a landing happened.
pub fn resolve_platform_landing(player: &mut Player, platforms: &[Platform]) -> bool {
    let mut landed = false;
    for platform in platforms {
        if lands_on(player, platform) {
            player.velocity.y = 0.0;
            landed = true;
        }
    }
    landed
}
