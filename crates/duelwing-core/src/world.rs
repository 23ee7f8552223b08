//! The simulation state and its per-frame step.
//!
//! [`World`] owns every entity collection, the seeded random source and the
//! collision engine. A frame is:
//!
//! 1. [`World::apply_intent`] for each ship (rotate, fire, move)
//! 2. [`World::step`]: update every entity, enemy volleys, explosion
//!    animation, collision resolution, then retiring off-screen bullets
//!
//! Movement is scaled by the frame delta; volleys and explosion frames follow
//! the wall clock.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::arena::{Arena, Handle};
use crate::collision::{CollisionEngine, CollisionEvent, Scene};
use crate::config::{GameConfig, Viewport};
use crate::entity::{Drifter, Enemy, Entity, MotionPattern, PlayerShip, Projectile, ShipId};
use crate::input::ShipIntent;
use crate::save::SavedPositions;
use crate::time::Cadence;

/// What happened during one [`World::step`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Collisions that had an effect, in resolution order
    pub collisions: Vec<CollisionEvent>,
    /// Bullets fired by enemies
    pub enemy_shots: usize,
    /// Off-screen bullets removed, player and enemy combined
    pub retired: usize,
}

/// Serializable copy of the world state, for debugging and replay checks.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    /// Frames stepped so far
    pub frame: u64,
    /// Both ships
    pub ships: [PlayerShip; 2],
    /// Crates in slot order
    pub obstacles: Vec<Drifter>,
    /// Pickups in slot order
    pub pickups: Vec<Drifter>,
    /// Enemies in slot order, with their bullets
    pub enemies: Vec<Enemy>,
    /// Player bullets in slot order
    pub bullets: Vec<Projectile>,
}

/// All simulation state.
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    viewport: Viewport,
    ships: [PlayerShip; 2],
    explosion_timers: [Option<Cadence>; 2],
    obstacles: Arena<Drifter>,
    pickups: Arena<Drifter>,
    enemies: Arena<Enemy>,
    bullets: Arena<Projectile>,
    collision: CollisionEngine,
    rng: ChaCha8Rng,
    frame: u64,
}

impl World {
    /// Builds the initial layout.
    ///
    /// Ships spawn at their configured positions; crates and pickups at a
    /// random column in `[0, spawn_x_range)` at the top of the band; enemies
    /// at `x = width / k` for `k = 1, 2, ...` on the enemy row. Enemy volleys
    /// are timed from `now` on the wall clock.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(config: GameConfig, now: Duration) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let viewport = config.viewport;

        let ships = ShipId::ALL.map(|id| PlayerShip::new(id, config.ship.spawn[id.index()], &config.ship));

        let drifters = &config.drifter;
        let spawn_range = drifters.spawn_x_range.max(1);
        let mut obstacles = Arena::with_capacity(drifters.obstacle_count);
        for _ in 0..drifters.obstacle_count {
            let x = rng.gen_range(0..spawn_range) as f32;
            let half = drifters.obstacle_half_extents;
            obstacles.spawn(Drifter::obstacle(Vec2::new(x, half.y), half, drifters.velocity));
        }
        let mut pickups = Arena::with_capacity(drifters.pickup_count);
        for _ in 0..drifters.pickup_count {
            let x = rng.gen_range(0..spawn_range) as f32;
            let half = drifters.pickup_half_extents;
            pickups.spawn(Drifter::pickup(Vec2::new(x, half.y), half, drifters.velocity));
        }

        let mut enemies = Arena::with_capacity(config.enemy.count);
        for k in 1..=config.enemy.count {
            let x = viewport.width as f32 / k as f32;
            enemies.spawn(Enemy::new(
                Vec2::new(x, config.enemy.row_y),
                config.enemy.half_extents,
                MotionPattern::Sweep {
                    speed: config.enemy.speed,
                },
                config.enemy.shoot_interval(),
                now,
            ));
        }

        tracing::info!(
            seed = config.seed,
            width = viewport.width,
            height = viewport.height,
            obstacles = obstacles.len(),
            pickups = pickups.len(),
            enemies = enemies.len(),
            "world set up"
        );

        Self {
            collision: CollisionEngine::new(&config.collision),
            viewport,
            ships,
            explosion_timers: [None, None],
            obstacles,
            pickups,
            enemies,
            bullets: Arena::new(),
            rng,
            frame: 0,
            config,
        }
    }

    /// Configuration the world was built from.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopts a new viewport size. Projectiles test against it from the next
    /// update on.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            tracing::info!(width = viewport.width, height = viewport.height, "viewport resized");
            self.viewport = viewport;
        }
    }

    /// Frames stepped so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Both ships, indexed by [`ShipId::index`].
    #[must_use]
    pub const fn ships(&self) -> &[PlayerShip; 2] {
        &self.ships
    }

    /// One ship.
    #[must_use]
    pub const fn ship(&self, id: ShipId) -> &PlayerShip {
        &self.ships[id.index()]
    }

    /// Mutable access to one ship.
    pub fn ship_mut(&mut self, id: ShipId) -> &mut PlayerShip {
        &mut self.ships[id.index()]
    }

    /// Crates.
    #[must_use]
    pub const fn obstacles(&self) -> &Arena<Drifter> {
        &self.obstacles
    }

    /// Mutable access to the crates.
    pub fn obstacles_mut(&mut self) -> &mut Arena<Drifter> {
        &mut self.obstacles
    }

    /// Bonus-life pickups.
    #[must_use]
    pub const fn pickups(&self) -> &Arena<Drifter> {
        &self.pickups
    }

    /// Mutable access to the pickups.
    pub fn pickups_mut(&mut self) -> &mut Arena<Drifter> {
        &mut self.pickups
    }

    /// Enemies.
    #[must_use]
    pub const fn enemies(&self) -> &Arena<Enemy> {
        &self.enemies
    }

    /// Mutable access to the enemies.
    pub fn enemies_mut(&mut self) -> &mut Arena<Enemy> {
        &mut self.enemies
    }

    /// Player bullets.
    #[must_use]
    pub const fn bullets(&self) -> &Arena<Projectile> {
        &self.bullets
    }

    /// Mutable access to the player bullets.
    pub fn bullets_mut(&mut self) -> &mut Arena<Projectile> {
        &mut self.bullets
    }

    /// Applies one player's intent: rotation, then fire, then movement.
    ///
    /// A move that would bring the ship into contact with the other living
    /// ship is cancelled. Ships that already touch may move apart.
    pub fn apply_intent(&mut self, id: ShipId, intent: &ShipIntent, elapsed: f32) -> Option<Handle<Projectile>> {
        let index = id.index();
        let ship = &mut self.ships[index];
        if intent.rotate_left {
            ship.rotate_left();
        }
        if intent.rotate_right {
            ship.rotate_right();
        }
        let fired = intent
            .fire
            .then(|| ship.fire_bullet(&self.config.projectile))
            .flatten()
            .map(|bullet| self.bullets.spawn(bullet));

        if !intent.directions.is_empty() {
            self.steer(id, intent, elapsed);
        }
        fired
    }

    fn steer(&mut self, id: ShipId, intent: &ShipIntent, elapsed: f32) {
        let [first, second] = &mut self.ships;
        let (ship, other) = match id {
            ShipId::Player1 => (first, &*second),
            ShipId::Player2 => (second, &*first),
        };
        let blocker = other.is_alive().then(|| other.aabb());
        let touching_before = blocker.is_some_and(|b| ship.aabb().overlaps(&b));
        let before = ship.position();

        ship.move_in(intent.directions, elapsed);
        ship.clamp_to(self.viewport);

        if let Some(blocker) = blocker {
            if !touching_before && ship.aabb().overlaps(&blocker) {
                tracing::trace!(ship = %id, "move blocked by other ship");
                ship.set_position(before);
            }
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// `elapsed` is the frame delta in seconds; `wall_now` is the wall-clock
    /// reading that times enemy volleys and explosion frames.
    pub fn step(&mut self, elapsed: f32, wall_now: Duration) -> StepReport {
        let viewport = self.viewport;
        let band = self.config.drifter.band();

        for ship in &mut self.ships {
            ship.update(elapsed);
        }
        for bullet in self.bullets.values_mut() {
            bullet.update(elapsed, viewport);
        }
        for drifter in self.obstacles.values_mut().chain(self.pickups.values_mut()) {
            drifter.update(elapsed, band);
        }
        for enemy in self.enemies.values_mut() {
            enemy.update(elapsed, viewport);
        }

        let mut enemy_shots = 0;
        for enemy in self.enemies.values_mut() {
            if enemy.try_shoot(wall_now, &self.config.projectile).is_some() {
                enemy_shots += 1;
            }
        }

        self.advance_explosions(wall_now);

        let collisions = self.collision.resolve(Scene {
            ships: &mut self.ships,
            obstacles: &mut self.obstacles,
            pickups: &mut self.pickups,
            enemies: &mut self.enemies,
            bullets: &mut self.bullets,
            band,
            enemy_row_y: self.config.enemy.row_y,
            rng: &mut self.rng,
        });

        self.arm_explosions(wall_now);

        let mut retired = self.bullets.retain(|_, bullet| !bullet.outside_screen());
        for enemy in self.enemies.values_mut() {
            retired += enemy.retire_bullets();
        }

        self.frame += 1;
        tracing::trace!(
            frame = self.frame,
            elapsed,
            collisions = collisions.len(),
            enemy_shots,
            retired,
            "world stepped"
        );

        StepReport {
            collisions,
            enemy_shots,
            retired,
        }
    }

    /// Fires each armed explosion timer that is due and disarms it once the
    /// sequence completes.
    fn advance_explosions(&mut self, wall_now: Duration) {
        for (ship, timer) in self.ships.iter_mut().zip(&mut self.explosion_timers) {
            let Some(cadence) = timer.as_mut() else {
                continue;
            };
            if cadence.ready(wall_now) && !ship.advance_explosion() {
                *timer = None;
            }
        }
    }

    /// Starts a timer for every ship that began exploding and has none.
    fn arm_explosions(&mut self, wall_now: Duration) {
        let interval = self.config.ship.explosion_interval();
        for (ship, timer) in self.ships.iter().zip(&mut self.explosion_timers) {
            if ship.currently_exploding() && timer.is_none() {
                *timer = Some(Cadence::new(interval, wall_now));
            }
        }
    }

    /// Captures both ship positions for saving.
    #[must_use]
    pub fn save_positions(&self) -> SavedPositions {
        SavedPositions::from_positions(ShipId::ALL.map(|id| self.ship(id).position()))
    }

    /// Moves both ships to saved positions. Nothing else changes.
    pub fn load_positions(&mut self, saved: &SavedPositions) {
        for ship in &mut self.ships {
            ship.set_position(saved.position(ship.id()));
        }
    }

    /// Serializable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame: self.frame,
            ships: self.ships.clone(),
            obstacles: self.obstacles.values().cloned().collect(),
            pickups: self.pickups.values().cloned().collect(),
            enemies: self.enemies.values().cloned().collect(),
            bullets: self.bullets.values().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Direction, ExplosionState, Facing};
    use crate::entity::projectile::Owner;

    fn world() -> World {
        World::new(GameConfig::default(), Duration::ZERO)
    }

    /// A world with nothing but the two ships.
    fn empty_world() -> World {
        let mut config = GameConfig::default();
        config.drifter.obstacle_count = 0;
        config.drifter.pickup_count = 0;
        config.enemy.count = 0;
        World::new(config, Duration::ZERO)
    }

    fn moving(directions: Direction) -> ShipIntent {
        ShipIntent {
            directions,
            ..ShipIntent::default()
        }
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn classic_layout() {
            let w = world();
            assert_eq!(w.ship(ShipId::Player1).position(), Vec2::new(100.0, 400.0));
            assert_eq!(w.ship(ShipId::Player2).position(), Vec2::new(400.0, 300.0));
            assert_eq!(w.obstacles().len(), 6);
            assert_eq!(w.pickups().len(), 1);
            assert_eq!(w.enemies().len(), 2);
            assert!(w.bullets().is_empty());
        }

        #[test]
        fn drifters_start_at_top_within_spawn_range() {
            let w = world();
            for drifter in w.obstacles().values().chain(w.pickups().values()) {
                assert!((0.0..400.0).contains(&drifter.position().x));
                assert_eq!(drifter.position().y, drifter.body().half_extents.y);
            }
        }

        #[test]
        fn enemies_start_at_full_and_half_width() {
            let w = world();
            let xs: Vec<f32> = w.enemies().values().map(|e| e.position().x).collect();
            assert_eq!(xs, vec![800.0, 400.0]);
            assert!(w.enemies().values().all(|e| e.position().y == 100.0));
        }

        #[test]
        fn same_seed_same_layout() {
            let a = serde_json::to_string(&world().snapshot()).unwrap();
            let b = serde_json::to_string(&world().snapshot()).unwrap();
            assert_eq!(a, b);
        }
    }

    mod intent_tests {
        use super::*;

        #[test]
        fn fire_spawns_bullet_along_facing() {
            let mut w = empty_world();
            let intent = ShipIntent {
                rotate_left: true,
                fire: true,
                ..ShipIntent::default()
            };
            let handle = w.apply_intent(ShipId::Player2, &intent, 0.016).unwrap();
            let bullet = w.bullets().get(handle).unwrap();
            assert_eq!(bullet.owner(), Owner::Ship(ShipId::Player2));
            assert_eq!(w.ship(ShipId::Player2).facing(), Facing::Left);
            assert!(bullet.velocity().x < 0.0);
        }

        #[test]
        fn movement_is_clamped_to_viewport() {
            let mut w = empty_world();
            w.apply_intent(ShipId::Player1, &moving(Direction::LEFT), 10.0);
            assert_eq!(w.ship(ShipId::Player1).position().x, 16.0);
        }

        #[test]
        fn ships_block_each_other() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).set_position(Vec2::new(100.0, 300.0));
            w.ship_mut(ShipId::Player2).set_position(Vec2::new(140.0, 300.0));

            w.apply_intent(ShipId::Player1, &moving(Direction::RIGHT), 0.1);

            assert_eq!(w.ship(ShipId::Player1).position(), Vec2::new(100.0, 300.0));
        }

        #[test]
        fn touching_ships_can_separate() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).set_position(Vec2::new(100.0, 300.0));
            w.ship_mut(ShipId::Player2).set_position(Vec2::new(110.0, 300.0));

            w.apply_intent(ShipId::Player1, &moving(Direction::LEFT), 0.1);

            assert_eq!(w.ship(ShipId::Player1).position(), Vec2::new(80.0, 300.0));
        }
    }

    mod step_tests {
        use super::*;

        #[test]
        fn ship_on_crate_explodes_and_crate_respawns() {
            let mut w = empty_world();
            let handle = w.obstacles_mut().spawn(Drifter::obstacle(
                Vec2::new(100.0, 400.0),
                Vec2::splat(16.0),
                Vec2::ZERO,
            ));

            let report = w.step(0.0, Duration::ZERO);

            assert_eq!(report.collisions.len(), 1);
            assert!(w.ship(ShipId::Player1).currently_exploding());
            let moved = w.obstacles().get(handle).unwrap().position();
            assert!((0.0..800.0).contains(&moved.x));
            assert_eq!(moved.y, 16.0);
        }

        #[test]
        fn explosion_runs_on_wall_clock_and_costs_one_life() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).explode();

            let mut now = Duration::ZERO;
            w.step(0.0, now);
            for _ in 0..3 {
                now += Duration::from_millis(100);
                w.step(0.0, now);
                assert!(w.ship(ShipId::Player1).currently_exploding());
            }
            now += Duration::from_millis(100);
            w.step(0.0, now);

            let ship = w.ship(ShipId::Player1);
            assert_eq!(ship.explosion(), ExplosionState::Alive);
            assert_eq!(ship.lives(), 2);
        }

        #[test]
        fn explosion_frames_ignore_frame_delta() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).explode();
            w.step(10.0, Duration::ZERO);
            w.step(10.0, Duration::from_millis(50));
            assert_eq!(w.ship(ShipId::Player1).explosion(), ExplosionState::Exploding { frame: 0 });
        }

        #[test]
        fn enemies_fire_every_two_seconds_of_wall_time() {
            let mut w = world();
            assert_eq!(w.step(0.016, Duration::from_millis(1999)).enemy_shots, 0);
            assert_eq!(w.step(0.016, Duration::from_secs(2)).enemy_shots, 2);
            assert_eq!(w.step(0.016, Duration::from_millis(2016)).enemy_shots, 0);
            assert!(w.enemies().values().all(|e| e.bullets().len() == 1));
        }

        #[test]
        fn offscreen_bullets_are_retired() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).set_position(Vec2::new(100.0, 20.0));
            let fire = ShipIntent {
                fire: true,
                ..ShipIntent::default()
            };
            let handle = w.apply_intent(ShipId::Player1, &fire, 0.0).unwrap();

            let report = w.step(0.1, Duration::ZERO);

            assert_eq!(report.retired, 1);
            assert!(w.bullets().get(handle).is_none());
        }

        #[test]
        fn frame_counter_advances() {
            let mut w = empty_world();
            w.step(0.016, Duration::ZERO);
            w.step(0.016, Duration::ZERO);
            assert_eq!(w.frame(), 2);
        }

        #[test]
        fn resize_changes_offscreen_test() {
            let mut w = empty_world();
            w.set_viewport(Viewport::new(200, 200));
            w.bullets_mut().spawn(Projectile::new(
                Vec2::new(100.0, 190.0),
                Vec2::new(0.0, 400.0),
                Vec2::new(3.0, 6.0),
                Owner::Ship(ShipId::Player1),
            ));
            assert_eq!(w.step(0.1, Duration::ZERO).retired, 1);
        }
    }

    mod save_tests {
        use super::*;

        #[test]
        fn save_then_load_restores_truncated_positions() {
            let mut w = empty_world();
            w.ship_mut(ShipId::Player1).set_position(Vec2::new(120.7, 333.3));
            let saved = w.save_positions();
            assert_eq!(saved.encode(), "120 333\n400 300\n");

            w.ship_mut(ShipId::Player1).set_position(Vec2::new(500.0, 500.0));
            w.ship_mut(ShipId::Player1).increment_score(7);
            w.load_positions(&saved);

            assert_eq!(w.ship(ShipId::Player1).position(), Vec2::new(120.0, 333.0));
            assert_eq!(w.ship(ShipId::Player1).score(), 7);
        }
    }
}
