//! One simulation tick.
//!
//! Order within a tick is fixed and observable:
//!
//!   1. clear the canvas to white
//!   2. draw background layers, then platforms
//!   3. player update (frame advance, self-draw, integrate, gravity)
//!   4. horizontal input: walk inside the central band, otherwise scroll
//!   5. platform landing
//!   6. sprite-state transitions
//!   7. win / fall-off checks
//!
//! The player draws before anything after step 3 runs, so a frame shows the
//! position from before this tick's movement and input.

use ssp_core::animation::AnimationState;
use ssp_core::input::Direction;
use ssp_core::surface::{Canvas, Color, Rect};

use crate::collision::resolve_platform_landing;
use crate::world::World;

/// The player walks right only while left of this x; beyond it the level scrolls.
pub const RIGHT_WALK_LIMIT: f32 = 400.0;
/// The player walks left only while right of this x (unless at the level start).
pub const LEFT_WALK_LIMIT: f32 = 100.0;

/// What happened during a tick that the host may want to react to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Scroll offset is past the end of the level. Reported every tick it holds.
    pub won: bool,
    /// The player fell off the canvas and the world was re-initialised.
    pub reset: bool,
}

pub fn tick(world: &mut World, canvas: &mut dyn Canvas) -> TickReport {
    let size = canvas.size();
    canvas.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), Color::WHITE);

    for layer in &world.background {
        layer.draw(canvas);
    }
    for platform in &world.platforms {
        platform.draw(canvas);
    }

    world.player.update(canvas);

    resolve_horizontal_input(world);
    resolve_platform_landing(&mut world.player, &world.platforms);
    resolve_sprite_state(world);
    check_terminal_conditions(world, size.y)
}

/// Set the player's horizontal velocity from the held keys, or scroll the
/// level when the player is at the edge of the walkable band.
pub fn resolve_horizontal_input(world: &mut World) {
    let keys = world.keys;
    let player = &mut world.player;
    let speed = player.speed;
    let x = player.position.x;

    if keys.right.pressed && x < RIGHT_WALK_LIMIT {
        player.velocity.x = speed;
    } else if (keys.left.pressed && x > LEFT_WALK_LIMIT)
        || (keys.left.pressed && world.scroll_offset == 0.0 && x < 0.0)
    {
        player.velocity.x = -speed;
    } else {
        player.velocity.x = 0.0;

        if keys.right.pressed {
            world.scroll_by(speed);
        } else if keys.left.pressed && world.scroll_offset > 0.0 {
            world.scroll_by(-speed);
        }
    }
}

/// Drive the run/stand clip from the last pressed direction.
///
/// The run check looks only at the last direction, so it fires again on the
/// tick after a key is released; the stand check then reverts it in the same
/// tick. A released player therefore shows the stand sheet at frame 1.
pub fn resolve_sprite_state(world: &mut World) {
    let keys = world.keys;
    let player = &mut world.player;

    match keys.last_direction {
        Some(Direction::Right) if player.animation != AnimationState::RunRight => {
            player.set_animation(AnimationState::RunRight);
        }
        Some(Direction::Left) if player.animation != AnimationState::RunLeft => {
            player.set_animation(AnimationState::RunLeft);
        }
        _ => {}
    }

    if !keys.right.pressed
        && keys.last_direction == Some(Direction::Right)
        && player.animation == AnimationState::RunRight
    {
        player.set_animation(AnimationState::StandRight);
    } else if !keys.left.pressed
        && keys.last_direction == Some(Direction::Left)
        && player.animation == AnimationState::RunLeft
    {
        player.set_animation(AnimationState::StandLeft);
    }
}

fn check_terminal_conditions(world: &mut World, canvas_height: f32) -> TickReport {
    let mut report = TickReport::default();

    if world.scroll_offset > world.win_threshold() {
        report.won = true;
        log::trace!("Win condition holds at scroll {}", world.scroll_offset);
    }

    if world.player.position.y > canvas_height {
        log::info!(
            "Player fell off at x={:.1}, scroll={:.1}; restarting",
            world.player.position.x,
            world.scroll_offset
        );
        world.init();
        report.reset = true;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;
    use crate::config::PhysicsConfig;
    use crate::test_support::{
        sample_images, sample_world, sample_world_with_platform_width, DrawCommand,
        RecordingCanvas,
    };
    use glam::Vec2;
    use ssp_core::input::{Key, KeyEvent};

    fn run_ticks(world: &mut World, ticks: usize) -> TickReport {
        let mut canvas = RecordingCanvas::default();
        let mut last = TickReport::default();
        for _ in 0..ticks {
            canvas.commands.clear();
            last = tick(world, &mut canvas);
        }
        last
    }

    #[test]
    fn draw_order_is_fill_background_platforms_player() {
        let mut world = sample_world();
        let mut canvas = RecordingCanvas::default();
        tick(&mut world, &mut canvas);

        assert_eq!(canvas.commands.len(), 1 + 2 + 7 + 1);
        assert_eq!(
            canvas.commands[0],
            DrawCommand::Fill {
                rect: Rect::new(0.0, 0.0, 1024.0, 576.0),
                color: Color::WHITE,
            }
        );
        let keys: Vec<&str> = canvas.commands[1..].iter().map(|c| c.key()).collect();
        assert_eq!(keys[0], assets::BACKGROUND);
        assert_eq!(keys[1], assets::HILLS);
        assert_eq!(keys[2], assets::PLATFORM_SMALL_TALL);
        assert!(keys[3..9].iter().all(|k| *k == assets::PLATFORM));
        assert_eq!(keys[9], assets::SPRITE_STAND_RIGHT);
    }

    #[test]
    fn idle_player_falls_and_rests_on_ground() {
        let mut world = sample_world();
        run_ticks(&mut world, 17);
        // Tick 17 is the first landing: bottom 454 with 25.5 pending.
        assert_eq!(world.player.position.y, 304.0);
        assert_eq!(world.player.velocity.y, 0.0);

        run_ticks(&mut world, 43);
        assert_eq!(world.player.position.y, 319.0);
        assert_eq!(world.player.bottom(), 469.0);
        assert_eq!(world.player.velocity.y, 0.0);
    }

    #[test]
    fn right_walks_until_band_edge_then_scrolls() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));

        run_ticks(&mut world, 30);
        assert_eq!(world.player.position.x, 390.0);
        assert_eq!(world.player.velocity.x, 10.0);
        assert_eq!(world.scroll_offset, 0.0);

        run_ticks(&mut world, 1);
        assert_eq!(world.player.position.x, 400.0);
        assert_eq!(world.player.velocity.x, 0.0);
        assert_eq!(world.scroll_offset, 10.0);
        assert_eq!(world.platforms[1].position.x, -11.0);

        run_ticks(&mut world, 29);
        assert_eq!(world.player.position.x, 400.0);
        assert_eq!(world.scroll_offset, 300.0);
        assert_eq!(world.platforms[1].position.x, -301.0);
        assert_eq!(world.background[0].position.x, -1.0 - 300.0 * 0.66);
    }

    #[test]
    fn left_walks_back_then_scrolls_back_to_zero() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 40);
        assert_eq!(world.scroll_offset, 100.0);
        world.handle_key(KeyEvent::up(Key::D));
        world.handle_key(KeyEvent::down(Key::A));

        // The first tick only sets velocity, so 29 steps reach 110.
        run_ticks(&mut world, 30);
        assert_eq!(world.player.position.x, 110.0);
        assert_eq!(world.scroll_offset, 100.0);

        // Arriving at the band edge scrolls in the same tick.
        run_ticks(&mut world, 1);
        assert_eq!(world.player.position.x, 100.0);
        assert_eq!(world.scroll_offset, 90.0);

        run_ticks(&mut world, 9);
        assert_eq!(world.scroll_offset, 0.0);
        assert_eq!(world.platforms[1].position.x, -1.0);

        run_ticks(&mut world, 10);
        assert_eq!(world.scroll_offset, 0.0);
        assert_eq!(world.player.position.x, 100.0);
        assert_eq!(world.player.velocity.x, 0.0);
    }

    #[test]
    fn left_at_level_start_lets_player_walk_past_zero() {
        let mut world = sample_world();
        world.player.position.x = -5.0;
        world.handle_key(KeyEvent::down(Key::A));

        run_ticks(&mut world, 1);
        assert_eq!(world.player.velocity.x, -10.0);
        assert_eq!(world.scroll_offset, 0.0);

        run_ticks(&mut world, 1);
        assert_eq!(world.player.position.x, -15.0);
        assert_eq!(world.scroll_offset, 0.0);
    }

    #[test]
    fn scroll_offset_never_goes_negative() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::A));
        for _ in 0..120 {
            run_ticks(&mut world, 1);
            assert!(world.scroll_offset >= 0.0);
        }
    }

    #[test]
    fn fractional_speed_scrolls_back_to_exactly_zero() {
        let physics = PhysicsConfig {
            speed: 0.3,
            ..PhysicsConfig::default()
        };
        let mut world = World::new(sample_images(), physics);
        world.player.position.x = RIGHT_WALK_LIMIT;
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 10);
        assert!(world.scroll_offset > 2.9);

        world.handle_key(KeyEvent::up(Key::D));
        world.handle_key(KeyEvent::down(Key::A));
        world.player.position.x = LEFT_WALK_LIMIT;
        for _ in 0..20 {
            run_ticks(&mut world, 1);
            assert!(world.scroll_offset >= 0.0);
        }
        assert_eq!(world.scroll_offset, 0.0);
        assert_eq!(world.player.position.x, LEFT_WALK_LIMIT);
        assert_eq!(world.platforms[1].position.x, -1.0);
        assert_eq!(world.background[0].position.x, -1.0);
    }

    #[test]
    fn holding_right_switches_to_run_right() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 1);
        assert_eq!(world.player.animation, AnimationState::RunRight);
        assert_eq!(world.player.frames, 1);
        assert_eq!(world.player.width, 127.875);

        run_ticks(&mut world, 5);
        assert_eq!(world.player.animation, AnimationState::RunRight);
        assert_eq!(world.player.frames, 6);
    }

    #[test]
    fn releasing_right_reverts_to_stand_right() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 10);
        world.handle_key(KeyEvent::up(Key::D));

        // The first tick keeps the run counter; later ticks flip through run
        // and land on stand at frame 1.
        run_ticks(&mut world, 1);
        assert_eq!(world.player.animation, AnimationState::StandRight);
        assert_eq!(world.player.frames, 11);

        for _ in 0..4 {
            run_ticks(&mut world, 1);
            assert_eq!(world.player.animation, AnimationState::StandRight);
            assert_eq!(world.player.width, 66.0);
            assert_eq!(world.player.current_crop_width, 177.0);
            assert_eq!(world.player.frames, 1);
        }
    }

    #[test]
    fn pressing_left_while_right_held_runs_left() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 3);
        world.handle_key(KeyEvent::down(Key::A));
        run_ticks(&mut world, 1);
        assert_eq!(world.player.animation, AnimationState::RunLeft);
        // Right still wins the movement check.
        assert_eq!(world.player.velocity.x, 10.0);
    }

    #[test]
    fn releasing_left_reverts_to_stand_left() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::A));
        run_ticks(&mut world, 2);
        assert_eq!(world.player.animation, AnimationState::RunLeft);
        world.handle_key(KeyEvent::up(Key::A));
        run_ticks(&mut world, 1);
        assert_eq!(world.player.animation, AnimationState::StandLeft);
    }

    #[test]
    fn no_input_keeps_initial_stand_clip() {
        let mut world = sample_world();
        run_ticks(&mut world, 90);
        assert_eq!(world.player.animation, AnimationState::StandRight);
        assert_eq!(world.player.frames, 90 - 60);
    }

    #[test]
    fn landing_zeroes_vertical_velocity_on_ground_top() {
        let mut world = sample_world();
        world.player.position = Vec2::new(200.0, 316.0);
        world.player.velocity.y = 4.0;
        // After integration the bottom sits exactly on 470 with 5.5 pending.
        run_ticks(&mut world, 1);
        assert_eq!(world.player.bottom(), 470.0);
        assert_eq!(world.player.velocity.y, 0.0);
    }

    #[test]
    fn win_fires_only_past_threshold() {
        let mut world = sample_world_with_platform_width(576);
        world.scroll_offset = 3178.0;
        assert!(!run_ticks(&mut world, 1).won);

        world.scroll_offset = 3178.5;
        assert!(run_ticks(&mut world, 1).won);
    }

    #[test]
    fn walking_past_level_end_wins() {
        let mut world = sample_world_with_platform_width(576);
        world.handle_key(KeyEvent::down(Key::D));
        let mut canvas = RecordingCanvas::default();
        let mut first_win_scroll = None;
        for _ in 0..400 {
            // Pin the player above the ground so the gaps cannot end the run.
            world.player.position.y = 300.0;
            world.player.velocity.y = 0.0;
            let report = tick(&mut world, &mut canvas);
            if report.won {
                first_win_scroll = Some(world.scroll_offset);
                break;
            }
        }
        assert_eq!(first_win_scroll, Some(3180.0));
    }

    #[test]
    fn falling_below_canvas_resets_world() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        run_ticks(&mut world, 45);
        assert!(world.scroll_offset > 0.0);

        world.player.position.y = 577.0;
        let report = run_ticks(&mut world, 1);

        assert!(report.reset);
        assert_eq!(world.player.position, Vec2::new(100.0, 100.0));
        assert_eq!(world.scroll_offset, 0.0);
        assert_eq!(world.platforms.len(), 7);
        assert_eq!(world.background.len(), 2);
        assert_eq!(world.resets, 2);
    }

    #[test]
    fn walking_into_first_gap_falls_and_resets() {
        let mut world = sample_world();
        world.handle_key(KeyEvent::down(Key::D));
        let mut canvas = RecordingCanvas::default();
        let mut reset_seen = false;
        for _ in 0..600 {
            if tick(&mut world, &mut canvas).reset {
                reset_seen = true;
                break;
            }
        }
        assert!(reset_seen, "running right without jumping should fall into a gap");
        assert_eq!(world.scroll_offset, 0.0);
    }
}
