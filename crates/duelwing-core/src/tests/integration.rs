//! Integration tests for whole-frame gameplay.
//!
//! These drive `World::step` and `Game::frame` end to end:
//! - Ship/crate collision and respawn
//! - Enemy volley cadence on the wall clock
//! - Off-screen projectile retirement
//! - Explosion sequence, life loss and death
//! - Save and load through the keyboard
//! - Score monotonicity under arbitrary input

use std::time::Duration;

use glam::Vec2;
use proptest::prelude::*;

use crate::collision::{CollisionEvent, Pairing, ENEMY_POINTS};
use crate::config::GameConfig;
use crate::entity::{Drifter, Entity, ExplosionState, ShipId};
use crate::input::{InputSnapshot, Keys};
use crate::platform::headless::{DrawCommand, MemorySaveStore};

use super::helpers::{
    bare_config, bare_world, classic_world, run_frames, still_crate, upward_bullet, GameHarness, FRAME,
};

// =============================================================================
// Collisions
// =============================================================================

#[test]
fn ship_flying_into_crate_explodes_and_crate_respawns_at_band_top() {
    let mut world = bare_world();
    let handle = world.obstacles_mut().spawn(still_crate(Vec2::new(100.0, 400.0)));

    let reports = run_frames(&mut world, 1, FRAME, Duration::ZERO, &InputSnapshot::default());

    assert_eq!(
        reports[0].collisions,
        vec![CollisionEvent::ShipHitObstacle {
            ship: ShipId::Player1,
            obstacle: handle
        }]
    );
    assert_eq!(
        world.ship(ShipId::Player1).explosion(),
        ExplosionState::Exploding { frame: 0 }
    );
    let respawned = world.obstacles().get(handle).unwrap().position();
    assert!((0.0..800.0).contains(&respawned.x));
    assert_eq!(respawned.y, 16.0);
}

#[test]
fn fired_bullet_scores_on_enemy_for_the_shooter() {
    let mut config = bare_config();
    config.enemy.count = 1;
    config.enemy.speed = 0.0;
    let mut harness = GameHarness::new(config);
    // A motionless sweeper parks against the right edge at x = 780.
    harness
        .game
        .world_mut()
        .ship_mut(ShipId::Player2)
        .set_position(Vec2::new(780.0, 300.0));

    harness.frame_with(InputSnapshot::holding(Keys::C), FRAME);
    let mut scored = false;
    for _ in 0..40 {
        let report = harness.frame_with(InputSnapshot::default(), FRAME).unwrap();
        scored = report
            .collisions
            .iter()
            .any(|event| event.pairing() == Pairing::EnemyBullet);
        if scored {
            break;
        }
    }

    assert!(scored);
    let world = harness.game.world();
    assert_eq!(world.ship(ShipId::Player2).score(), ENEMY_POINTS);
    assert_eq!(world.ship(ShipId::Player1).score(), 0);
}

#[test]
fn pickups_add_lives_up_to_the_cap() {
    let mut world = bare_world();
    for _ in 0..5 {
        world.pickups_mut().spawn(Drifter::pickup(
            Vec2::new(400.0, 300.0),
            Vec2::splat(12.0),
            Vec2::ZERO,
        ));
    }

    run_frames(&mut world, 1, FRAME, Duration::ZERO, &InputSnapshot::default());

    assert_eq!(world.ship(ShipId::Player2).lives(), 5);
}

// =============================================================================
// Timing
// =============================================================================

#[test]
fn enemy_fires_once_every_125_frames_of_16ms() {
    let mut config = bare_config();
    config.enemy.count = 1;
    let mut world = crate::world::World::new(config, Duration::ZERO);

    let reports = run_frames(&mut world, 500, FRAME, Duration::ZERO, &InputSnapshot::default());

    let volleys: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, report)| report.enemy_shots > 0)
        .map(|(index, _)| index + 1)
        .collect();
    assert_eq!(volleys, vec![125, 250, 375, 500]);
}

#[test]
fn enemy_cadence_ignores_frame_delta() {
    let mut config = bare_config();
    config.enemy.count = 1;
    let mut world = crate::world::World::new(config, Duration::ZERO);

    // Huge frame deltas, tiny wall-clock advance.
    let mut shots = 0;
    for tick in 1..=10u64 {
        shots += world.step(1.0, Duration::from_millis(tick * 100)).enemy_shots;
    }
    assert_eq!(shots, 0);
}

#[test]
fn full_explosion_costs_one_life_and_three_kill_the_ship() {
    let mut world = bare_world();
    let mut now = Duration::ZERO;

    for expected_lives in [2, 1, 0] {
        world.ship_mut(ShipId::Player1).explode();
        world.step(0.0, now);
        for _ in 0..4 {
            now += Duration::from_millis(100);
            world.step(0.0, now);
        }
        assert_eq!(world.ship(ShipId::Player1).lives(), expected_lives);
    }

    let ship = world.ship(ShipId::Player1);
    assert_eq!(ship.explosion(), ExplosionState::Dead);
    assert!(ship.sprite().is_none());

    let before = ship.position();
    run_frames(&mut world, 10, FRAME, now, &InputSnapshot::holding(Keys::RIGHT | Keys::SPACE));
    assert_eq!(world.ship(ShipId::Player1).position(), before);
    assert!(world.bullets().is_empty());
}

// =============================================================================
// Projectiles
// =============================================================================

#[test]
fn offscreen_bullet_is_removed_and_never_collides() {
    let mut world = bare_world();
    let crate_handle = world.obstacles_mut().spawn(still_crate(Vec2::new(300.0, -30.0)));
    let bullet = world
        .bullets_mut()
        .spawn(upward_bullet(Vec2::new(300.0, 2.0), ShipId::Player1));

    // 400 px/s * 0.08 s carries the bullet to y = -30, onto the crate.
    let report = world.step(0.08, Duration::ZERO);

    assert!(report.collisions.is_empty());
    assert_eq!(report.retired, 1);
    assert!(!world.bullets().contains(bullet));
    assert_eq!(
        world.obstacles().get(crate_handle).unwrap().position(),
        Vec2::new(300.0, -30.0)
    );
    assert_eq!(world.ship(ShipId::Player1).score(), 0);
}

#[test]
fn held_fire_shoots_every_frame_by_default() {
    let mut world = bare_world();
    run_frames(&mut world, 3, FRAME, Duration::ZERO, &InputSnapshot::holding(Keys::SPACE));
    assert_eq!(world.bullets().len(), 3);
}

#[test]
fn fire_cooldown_limits_rate() {
    let mut config = bare_config();
    config.ship.fire_cooldown = 0.1;
    let mut world = crate::world::World::new(config, Duration::ZERO);
    run_frames(&mut world, 10, FRAME, Duration::ZERO, &InputSnapshot::holding(Keys::SPACE));
    assert_eq!(world.bullets().len(), 2);
}

// =============================================================================
// Game loop
// =============================================================================

#[test]
fn save_move_load_restores_positions() {
    let mut harness = GameHarness::with_saves(GameConfig::default(), MemorySaveStore::new());
    harness.frame_with(InputSnapshot::pressing(Keys::K), FRAME);
    for _ in 0..10 {
        harness.frame_with(InputSnapshot::holding(Keys::LEFT | Keys::D), FRAME);
    }
    let moved = harness.game.world().ship(ShipId::Player1).position();
    assert!(moved.x < 100.0);

    harness.frame_with(InputSnapshot::pressing(Keys::L), FRAME);

    let world = harness.game.world();
    assert_eq!(world.ship(ShipId::Player1).position(), Vec2::new(100.0, 400.0));
    assert_eq!(world.ship(ShipId::Player2).position(), Vec2::new(400.0, 300.0));
}

#[test]
fn frames_paint_hud_with_score_and_lives() {
    let mut harness = GameHarness::new(GameConfig::default());
    harness.game.world_mut().ship_mut(ShipId::Player1).increment_score(12);
    harness.frame_with(InputSnapshot::default(), FRAME);

    let texts: Vec<&str> = harness
        .game
        .platform()
        .surface
        .last_frame()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Blit { .. } => None,
        })
        .collect();
    assert_eq!(texts, vec!["P1  score 12  lives 3", "P2  score 0  lives 3"]);
}

#[test]
fn background_scrolls_on_the_wall_clock() {
    let mut harness = GameHarness::new(GameConfig::default());
    let first_background_y = |harness: &GameHarness| match harness.game.platform().surface.last_frame().first() {
        Some(DrawCommand::Blit { y, .. }) => *y,
        other => panic!("expected background blit, got {other:?}"),
    };

    harness.frame_with(InputSnapshot::default(), Duration::from_millis(10));
    assert_eq!(first_background_y(&harness), -600);
    harness.frame_with(InputSnapshot::default(), Duration::from_millis(10));
    assert_eq!(first_background_y(&harness), -599);
}

// =============================================================================
// Properties
// =============================================================================

fn snapshot_strategy() -> impl Strategy<Value = InputSnapshot> {
    (any::<u32>(), any::<u32>()).prop_map(|(held, pressed)| {
        let mask = Keys::all() - Keys::ESCAPE - Keys::K - Keys::L;
        InputSnapshot {
            held: Keys::from_bits_truncate(held) & mask,
            pressed: Keys::from_bits_truncate(pressed) & mask,
            pointer_delta: None,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn scores_never_decrease(
        inputs in prop::collection::vec(snapshot_strategy(), 1..120),
        seed in any::<u64>(),
    ) {
        let mut config = GameConfig::default();
        config.seed = seed;
        let mut world = crate::world::World::new(config, Duration::ZERO);
        let mut now = Duration::ZERO;
        let mut last = [0u32; 2];

        for snapshot in &inputs {
            now += FRAME;
            run_frames(&mut world, 1, FRAME, now, snapshot);
            for id in ShipId::ALL {
                let score = world.ship(id).score();
                prop_assert!(score >= last[id.index()]);
                last[id.index()] = score;
            }
        }
    }

    #[test]
    fn lives_stay_within_bounds(
        inputs in prop::collection::vec(snapshot_strategy(), 1..120),
        seed in any::<u64>(),
    ) {
        let mut config = GameConfig::default();
        config.seed = seed;
        let max_lives = config.ship.max_lives;
        let mut world = crate::world::World::new(config, Duration::ZERO);
        let mut now = Duration::ZERO;

        for snapshot in &inputs {
            now += FRAME;
            run_frames(&mut world, 1, FRAME, now, snapshot);
            for ship in world.ships() {
                prop_assert!(ship.lives() <= max_lives);
                prop_assert_eq!(ship.lives() == 0, !ship.is_alive());
            }
        }
    }
}

#[test]
fn classic_world_runs_a_minute_without_losing_drifters() {
    let mut world = classic_world();
    run_frames(&mut world, 3750, FRAME, Duration::ZERO, &InputSnapshot::default());
    assert_eq!(world.obstacles().len(), 6);
    assert_eq!(world.pickups().len(), 1);
    assert_eq!(world.enemies().len(), 2);
    for drifter in world.obstacles().values() {
        let y = drifter.position().y;
        assert!((-16.0..=616.0).contains(&y), "crate escaped the band: {y}");
    }
}
