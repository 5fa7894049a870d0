//! Everything that changes during a play session, and how it is reset.

use ssp_core::input::{Key, KeyAction, KeyEvent, KeyState};

use crate::assets::GameImages;
use crate::config::PhysicsConfig;
use crate::entities::{BackgroundElement, Platform};
use crate::level;
use crate::player::Player;

pub struct World {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub background: Vec<BackgroundElement>,
    /// How far the level has been scrolled to the right. Never negative.
    pub scroll_offset: f32,
    pub keys: KeyState,
    pub physics: PhysicsConfig,
    /// Number of times `init` ran, including the first.
    pub resets: u64,
    images: GameImages,
}

impl World {
    pub fn new(images: GameImages, physics: PhysicsConfig) -> Self {
        let mut world = Self {
            player: Player::new(images.sprites.clone(), &physics),
            platforms: Vec::new(),
            background: Vec::new(),
            scroll_offset: 0.0,
            keys: KeyState::new(),
            physics,
            resets: 0,
            images,
        };
        world.init();
        world
    }

    /// Rebuild the player, the level and the scroll offset from scratch.
    ///
    /// Key state is left alone: it mirrors the physical keyboard, and a key
    /// held through a reset is still held afterwards.
    pub fn init(&mut self) {
        self.player = Player::new(self.images.sprites.clone(), &self.physics);
        self.platforms = level::build_platforms(&self.images);
        self.background = level::build_background(&self.images);
        self.scroll_offset = 0.0;
        self.resets += 1;
        log::debug!(
            "World initialised: {} platforms, {} background layers",
            self.platforms.len(),
            self.background.len()
        );
    }

    /// Apply one keyboard transition.
    pub fn handle_key(&mut self, event: KeyEvent) {
        self.track_key(event);
        if event.key == Key::W && event.action == KeyAction::Down {
            self.player.jump();
        }
    }

    /// Replace physics tuning. Takes effect at the next `init`.
    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    pub fn win_threshold(&self) -> f32 {
        level::win_threshold(self.images.platform.width())
    }

    /// Scroll the level by `dx` (positive moves the view to the right).
    ///
    /// A leftward scroll stops exactly at offset 0. Entities are placed from
    /// the new total offset rather than nudged by `dx`.
    pub fn scroll_by(&mut self, dx: f32) {
        let dx = dx.max(-self.scroll_offset);
        if dx == 0.0 {
            return;
        }
        self.scroll_offset += dx;
        for platform in &mut self.platforms {
            platform.follow_scroll(self.scroll_offset);
        }
        for layer in &mut self.background {
            layer.follow_scroll(self.scroll_offset, self.physics.parallax);
        }
    }

    /// Track a key transition without acting on it: held flags and last
    /// direction update, a jump press is dropped.
    pub fn track_key(&mut self, event: KeyEvent) {
        self.keys.apply(event);
    }
}
