//! Collision detection and the interaction policy table.
//!
//! Collision is a pure AABB overlap test ([`overlap`]). What happens on a
//! hit is decided by a table of [`Policy`] rows, one per [`Pairing`], walked
//! in [`Pairing::ORDER`] every frame:
//!
//! | Pairing            | Gate              | Target      | Ship effect          |
//! |--------------------|-------------------|-------------|----------------------|
//! | ship × obstacle    | ship vulnerable   | repositions | explodes             |
//! | ship × pickup      | ship vulnerable   | repositions | gains a life         |
//! | obstacle × bullet  | bullet on screen  | repositions | shooter scores 1     |
//! | ship × enemy       | ship vulnerable   | repositions | explodes             |
//! | ship × enemy bullet| ship vulnerable   | stays       | explodes             |
//! | enemy × bullet     | bullet on screen  | repositions | shooter scores 10    |
//!
//! Effects apply immediately, so a later check in the same frame sees the
//! mutations of an earlier one: a ship exploded by a crate is no longer
//! vulnerable to an enemy bullet, and a repositioned crate is tested against
//! the remaining bullets at its new position.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::{Arena, Handle};
use crate::config::CollisionConfig;
use crate::entity::drifter::Band;
use crate::entity::{Drifter, Enemy, Entity, EntityKind, Owner, PlayerShip, Projectile, ShipId};

/// Returns `true` if the bounding boxes of `a` and `b` overlap.
///
/// Symmetric, and touching edges count as overlapping.
#[must_use]
pub fn overlap(a: &impl Entity, b: &impl Entity) -> bool {
    a.aabb().overlaps(&b.aabb())
}

// =============================================================================
// Policy table
// =============================================================================

/// A pair of entity categories the engine checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pairing {
    /// Player ship against crate
    ShipObstacle,
    /// Player ship against bonus-life pickup
    ShipPickup,
    /// Crate against player bullet
    ObstacleBullet,
    /// Player ship against enemy ship
    ShipEnemy,
    /// Player ship against enemy bullet
    ShipEnemyBullet,
    /// Enemy ship against player bullet
    EnemyBullet,
}

impl Pairing {
    /// Order pairings are resolved in each frame.
    pub const ORDER: [Self; 6] = [
        Self::ShipObstacle,
        Self::ShipPickup,
        Self::ObstacleBullet,
        Self::ShipEnemy,
        Self::ShipEnemyBullet,
        Self::EnemyBullet,
    ];

    /// Entity kinds on each side of the pairing.
    #[must_use]
    pub const fn kinds(self) -> (EntityKind, EntityKind) {
        match self {
            Self::ShipObstacle => (EntityKind::Ship, EntityKind::Obstacle),
            Self::ShipPickup => (EntityKind::Ship, EntityKind::Pickup),
            Self::ObstacleBullet => (EntityKind::Obstacle, EntityKind::Projectile),
            Self::ShipEnemy => (EntityKind::Ship, EntityKind::Enemy),
            Self::ShipEnemyBullet => (EntityKind::Ship, EntityKind::Projectile),
            Self::EnemyBullet => (EntityKind::Enemy, EntityKind::Projectile),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::ShipObstacle => 0,
            Self::ShipPickup => 1,
            Self::ObstacleBullet => 2,
            Self::ShipEnemy => 3,
            Self::ShipEnemyBullet => 4,
            Self::EnemyBullet => 5,
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.kinds();
        write!(f, "{a} x {b}")
    }
}

/// What a hit does to the ship involved.
///
/// For bullet pairings the ship is the one that fired the bullet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipEffect {
    /// Start the explosion sequence
    Explode,
    /// Gain one life, capped
    GainLife,
    /// Add points to the score
    Score(u32),
}

impl ShipEffect {
    fn apply(self, ship: &mut PlayerShip) {
        match self {
            Self::Explode => {
                ship.explode();
            }
            Self::GainLife => ship.add_life(),
            Self::Score(points) => ship.increment_score(points),
        }
    }
}

/// One row of the policy table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Pairing this row governs
    pub pairing: Pairing,
    /// Move the non-ship, non-bullet participant to a random respawn point
    pub reposition_target: bool,
    /// Effect on the ship involved
    pub effect: ShipEffect,
    /// Remove the bullet involved from its arena
    pub consume_bullet: bool,
}

/// Points for shooting a crate.
pub const OBSTACLE_POINTS: u32 = 1;
/// Points for shooting an enemy.
pub const ENEMY_POINTS: u32 = 10;

/// The classic interaction table, in resolution order.
pub const CLASSIC_POLICY: [Policy; 6] = [
    Policy {
        pairing: Pairing::ShipObstacle,
        reposition_target: true,
        effect: ShipEffect::Explode,
        consume_bullet: false,
    },
    Policy {
        pairing: Pairing::ShipPickup,
        reposition_target: true,
        effect: ShipEffect::GainLife,
        consume_bullet: false,
    },
    Policy {
        pairing: Pairing::ObstacleBullet,
        reposition_target: true,
        effect: ShipEffect::Score(OBSTACLE_POINTS),
        consume_bullet: false,
    },
    Policy {
        pairing: Pairing::ShipEnemy,
        reposition_target: true,
        effect: ShipEffect::Explode,
        consume_bullet: false,
    },
    Policy {
        pairing: Pairing::ShipEnemyBullet,
        reposition_target: false,
        effect: ShipEffect::Explode,
        consume_bullet: false,
    },
    Policy {
        pairing: Pairing::EnemyBullet,
        reposition_target: true,
        effect: ShipEffect::Score(ENEMY_POINTS),
        consume_bullet: false,
    },
];

// =============================================================================
// Events
// =============================================================================

/// A collision that had an effect this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// A ship flew into a crate
    ShipHitObstacle {
        /// Ship that exploded
        ship: ShipId,
        /// Crate that repositioned
        obstacle: Handle<Drifter>,
    },
    /// A ship collected a bonus life
    ShipCollectedPickup {
        /// Ship that gained a life
        ship: ShipId,
        /// Pickup that repositioned
        pickup: Handle<Drifter>,
    },
    /// A player bullet hit a crate
    ObstacleShot {
        /// Crate that repositioned
        obstacle: Handle<Drifter>,
        /// Bullet that hit it
        bullet: Handle<Projectile>,
        /// Ship credited with the points
        shooter: ShipId,
    },
    /// A ship flew into an enemy
    ShipRammedEnemy {
        /// Ship that exploded
        ship: ShipId,
        /// Enemy that repositioned
        enemy: Handle<Enemy>,
    },
    /// An enemy bullet hit a ship
    ShipShot {
        /// Ship that exploded
        ship: ShipId,
        /// Enemy that fired
        enemy: Handle<Enemy>,
        /// Bullet, a handle into the enemy's own arena
        bullet: Handle<Projectile>,
    },
    /// A player bullet hit an enemy
    EnemyShot {
        /// Enemy that repositioned
        enemy: Handle<Enemy>,
        /// Bullet that hit it
        bullet: Handle<Projectile>,
        /// Ship credited with the points
        shooter: ShipId,
    },
}

impl CollisionEvent {
    /// Pairing that produced the event.
    #[must_use]
    pub const fn pairing(&self) -> Pairing {
        match self {
            Self::ShipHitObstacle { .. } => Pairing::ShipObstacle,
            Self::ShipCollectedPickup { .. } => Pairing::ShipPickup,
            Self::ObstacleShot { .. } => Pairing::ObstacleBullet,
            Self::ShipRammedEnemy { .. } => Pairing::ShipEnemy,
            Self::ShipShot { .. } => Pairing::ShipEnemyBullet,
            Self::EnemyShot { .. } => Pairing::EnemyBullet,
        }
    }

    /// Ship affected by the event.
    #[must_use]
    pub const fn ship(&self) -> ShipId {
        match *self {
            Self::ShipHitObstacle { ship, .. }
            | Self::ShipCollectedPickup { ship, .. }
            | Self::ShipRammedEnemy { ship, .. }
            | Self::ShipShot { ship, .. } => ship,
            Self::ObstacleShot { shooter, .. } | Self::EnemyShot { shooter, .. } => shooter,
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Mutable view of every collection the engine touches.
pub struct Scene<'a, R> {
    /// Both player ships, indexed by [`ShipId::index`]
    pub ships: &'a mut [PlayerShip; 2],
    /// Crates
    pub obstacles: &'a mut Arena<Drifter>,
    /// Bonus-life pickups
    pub pickups: &'a mut Arena<Drifter>,
    /// Enemies, each owning its bullets
    pub enemies: &'a mut Arena<Enemy>,
    /// Player bullets
    pub bullets: &'a mut Arena<Projectile>,
    /// Band drifters respawn in; enemies reuse its width
    pub band: Band,
    /// Row enemies respawn on
    pub enemy_row_y: f32,
    /// Random source for respawn columns
    pub rng: &'a mut R,
}

/// Walks the policy table over a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionEngine {
    policies: [Policy; 6],
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self {
            policies: CLASSIC_POLICY,
        }
    }
}

impl CollisionEngine {
    /// Builds the classic table adjusted by `config`.
    #[must_use]
    pub fn new(config: &CollisionConfig) -> Self {
        let mut engine = Self::default();
        engine.policies[Pairing::ShipEnemyBullet.slot()].consume_bullet =
            config.consume_enemy_bullet_on_hit;
        engine
    }

    /// Table row for `pairing`.
    #[must_use]
    pub const fn policy(&self, pairing: Pairing) -> &Policy {
        &self.policies[pairing.slot()]
    }

    /// Runs every pairing in order and applies the effects.
    ///
    /// Returns the collisions that had an effect, in the order they were
    /// applied. Off-screen bullets never collide.
    pub fn resolve<R: Rng>(&self, scene: Scene<'_, R>) -> Vec<CollisionEvent> {
        let Scene {
            ships,
            obstacles,
            pickups,
            enemies,
            bullets,
            band,
            enemy_row_y,
            rng,
        } = scene;
        let mut events = Vec::new();

        for pairing in Pairing::ORDER {
            let policy = *self.policy(pairing);
            let before = events.len();
            match pairing {
                Pairing::ShipObstacle | Pairing::ShipPickup => {
                    let drifters = if pairing == Pairing::ShipObstacle {
                        &mut *obstacles
                    } else {
                        &mut *pickups
                    };
                    for (handle, drifter) in drifters.iter_mut() {
                        for ship in ships.iter_mut() {
                            if !ship.is_vulnerable() || !overlap(ship, drifter) {
                                continue;
                            }
                            if policy.reposition_target {
                                drifter.reposition(band, rng);
                            }
                            policy.effect.apply(ship);
                            events.push(if pairing == Pairing::ShipObstacle {
                                CollisionEvent::ShipHitObstacle {
                                    ship: ship.id(),
                                    obstacle: handle,
                                }
                            } else {
                                CollisionEvent::ShipCollectedPickup {
                                    ship: ship.id(),
                                    pickup: handle,
                                }
                            });
                        }
                    }
                }
                Pairing::ObstacleBullet => {
                    let mut spent = Vec::new();
                    for (handle, obstacle) in obstacles.iter_mut() {
                        for (bullet_handle, bullet) in bullets.iter() {
                            let Some(shooter) = live_player_bullet(bullet, &spent, bullet_handle) else {
                                continue;
                            };
                            if !overlap(obstacle, bullet) {
                                continue;
                            }
                            if policy.reposition_target {
                                obstacle.reposition(band, rng);
                            }
                            policy.effect.apply(&mut ships[shooter.index()]);
                            if policy.consume_bullet {
                                spent.push(bullet_handle);
                            }
                            events.push(CollisionEvent::ObstacleShot {
                                obstacle: handle,
                                bullet: bullet_handle,
                                shooter,
                            });
                        }
                    }
                    for handle in spent {
                        bullets.despawn(handle);
                    }
                }
                Pairing::ShipEnemy => {
                    for (handle, enemy) in enemies.iter_mut() {
                        for ship in ships.iter_mut() {
                            if !ship.is_vulnerable() || !overlap(ship, enemy) {
                                continue;
                            }
                            if policy.reposition_target {
                                enemy.reposition(band.width, enemy_row_y, rng);
                            }
                            policy.effect.apply(ship);
                            events.push(CollisionEvent::ShipRammedEnemy {
                                ship: ship.id(),
                                enemy: handle,
                            });
                        }
                    }
                }
                Pairing::ShipEnemyBullet => {
                    for (handle, enemy) in enemies.iter_mut() {
                        let mut spent = Vec::new();
                        for (bullet_handle, bullet) in enemy.bullets().iter() {
                            if bullet.outside_screen() {
                                continue;
                            }
                            for ship in ships.iter_mut() {
                                if !ship.is_vulnerable() || !overlap(ship, bullet) {
                                    continue;
                                }
                                policy.effect.apply(ship);
                                events.push(CollisionEvent::ShipShot {
                                    ship: ship.id(),
                                    enemy: handle,
                                    bullet: bullet_handle,
                                });
                                if policy.consume_bullet {
                                    spent.push(bullet_handle);
                                    break;
                                }
                            }
                        }
                        for bullet_handle in spent {
                            enemy.bullets_mut().despawn(bullet_handle);
                        }
                    }
                }
                Pairing::EnemyBullet => {
                    let mut spent = Vec::new();
                    for (handle, enemy) in enemies.iter_mut() {
                        for (bullet_handle, bullet) in bullets.iter() {
                            let Some(shooter) = live_player_bullet(bullet, &spent, bullet_handle) else {
                                continue;
                            };
                            if !overlap(enemy, bullet) {
                                continue;
                            }
                            if policy.reposition_target {
                                enemy.reposition(band.width, enemy_row_y, rng);
                            }
                            policy.effect.apply(&mut ships[shooter.index()]);
                            if policy.consume_bullet {
                                spent.push(bullet_handle);
                            }
                            events.push(CollisionEvent::EnemyShot {
                                enemy: handle,
                                bullet: bullet_handle,
                                shooter,
                            });
                        }
                    }
                    for handle in spent {
                        bullets.despawn(handle);
                    }
                }
            }

            for event in &events[before..] {
                tracing::debug!(pairing = %pairing, ship = %event.ship(), ?event, "collision");
            }
        }

        events
    }
}

/// Shooter of an on-screen player bullet that has not been consumed yet.
fn live_player_bullet(
    bullet: &Projectile,
    spent: &[Handle<Projectile>],
    handle: Handle<Projectile>,
) -> Option<ShipId> {
    if bullet.outside_screen() || spent.contains(&handle) {
        return None;
    }
    match bullet.owner() {
        Owner::Ship(shooter) => Some(shooter),
        Owner::Enemy => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::{ProjectileConfig, ShipConfig, Viewport};
    use crate::entity::{ExplosionState, MotionPattern};

    const BAND: Band = Band {
        width: 800,
        height: 600,
    };

    /// Owned collections a test can wrap in a [`Scene`].
    struct Fixture {
        ships: [PlayerShip; 2],
        obstacles: Arena<Drifter>,
        pickups: Arena<Drifter>,
        enemies: Arena<Enemy>,
        bullets: Arena<Projectile>,
        rng: ChaCha8Rng,
    }

    impl Fixture {
        fn new() -> Self {
            let config = ShipConfig::default();
            Self {
                ships: [
                    PlayerShip::new(ShipId::Player1, Vec2::new(100.0, 400.0), &config),
                    PlayerShip::new(ShipId::Player2, Vec2::new(600.0, 300.0), &config),
                ],
                obstacles: Arena::new(),
                pickups: Arena::new(),
                enemies: Arena::new(),
                bullets: Arena::new(),
                rng: ChaCha8Rng::seed_from_u64(1),
            }
        }

        fn resolve(&mut self, engine: &CollisionEngine) -> Vec<CollisionEvent> {
            engine.resolve(Scene {
                ships: &mut self.ships,
                obstacles: &mut self.obstacles,
                pickups: &mut self.pickups,
                enemies: &mut self.enemies,
                bullets: &mut self.bullets,
                band: BAND,
                enemy_row_y: 100.0,
                rng: &mut self.rng,
            })
        }

        fn ship(&self, id: ShipId) -> &PlayerShip {
            &self.ships[id.index()]
        }
    }

    fn crate_at(position: Vec2) -> Drifter {
        Drifter::obstacle(position, Vec2::splat(16.0), Vec2::new(0.0, 60.0))
    }

    fn enemy_at(position: Vec2) -> Enemy {
        Enemy::new(
            position,
            Vec2::new(20.0, 16.0),
            MotionPattern::Hover,
            Duration::from_secs(2),
            Duration::ZERO,
        )
    }

    fn player_bullet(position: Vec2, shooter: ShipId) -> Projectile {
        Projectile::new(position, Vec2::new(0.0, -400.0), Vec2::new(3.0, 6.0), Owner::Ship(shooter))
    }

    mod table_tests {
        use super::*;

        #[test]
        fn classic_table_follows_resolution_order() {
            for (row, pairing) in CLASSIC_POLICY.iter().zip(Pairing::ORDER) {
                assert_eq!(row.pairing, pairing);
            }
        }

        #[test]
        fn config_switches_enemy_bullet_consumption() {
            let engine = CollisionEngine::new(&CollisionConfig {
                consume_enemy_bullet_on_hit: true,
            });
            assert!(engine.policy(Pairing::ShipEnemyBullet).consume_bullet);
            assert!(!engine.policy(Pairing::EnemyBullet).consume_bullet);
            assert!(!CollisionEngine::default().policy(Pairing::ShipEnemyBullet).consume_bullet);
        }

        #[test]
        fn pairing_display_names_both_kinds() {
            assert_eq!(Pairing::ShipEnemyBullet.to_string(), "Ship x Projectile");
        }
    }

    mod overlap_tests {
        use super::*;

        #[test]
        fn touching_edges_overlap() {
            let a = crate_at(Vec2::new(0.0, 0.0));
            let b = crate_at(Vec2::new(32.0, 0.0));
            assert!(overlap(&a, &b));
        }

        #[test]
        fn separated_boxes_do_not_overlap() {
            let a = crate_at(Vec2::new(0.0, 0.0));
            let b = crate_at(Vec2::new(32.5, 0.0));
            assert!(!overlap(&a, &b));
        }

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                ah in 0.5f32..64.0, bh in 0.5f32..64.0,
            ) {
                let a = Drifter::obstacle(Vec2::new(ax, ay), Vec2::splat(ah), Vec2::ZERO);
                let b = Drifter::pickup(Vec2::new(bx, by), Vec2::splat(bh), Vec2::ZERO);
                prop_assert_eq!(overlap(&a, &b), overlap(&b, &a));
            }
        }
    }

    mod ship_tests {
        use super::*;

        #[test]
        fn ship_hitting_crate_explodes_and_crate_respawns() {
            let mut fx = Fixture::new();
            let handle = fx.obstacles.spawn(crate_at(Vec2::new(100.0, 400.0)));

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(
                events,
                vec![CollisionEvent::ShipHitObstacle {
                    ship: ShipId::Player1,
                    obstacle: handle
                }]
            );
            assert!(fx.ship(ShipId::Player1).currently_exploding());
            let moved = fx.obstacles.get(handle).unwrap().position();
            assert!((0.0..800.0).contains(&moved.x));
            assert_eq!(moved.y, 16.0);
        }

        #[test]
        fn exploding_ship_ignores_crates() {
            let mut fx = Fixture::new();
            fx.ships[0].explode();
            let handle = fx.obstacles.spawn(crate_at(Vec2::new(100.0, 400.0)));

            assert!(fx.resolve(&CollisionEngine::default()).is_empty());
            assert_eq!(fx.obstacles.get(handle).unwrap().position(), Vec2::new(100.0, 400.0));
            assert_eq!(fx.ship(ShipId::Player1).explosion(), ExplosionState::Exploding { frame: 0 });
        }

        #[test]
        fn pickup_grants_life() {
            let mut fx = Fixture::new();
            fx.pickups.spawn(Drifter::pickup(Vec2::new(600.0, 300.0), Vec2::splat(12.0), Vec2::ZERO));

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(events.len(), 1);
            assert_eq!(events[0].pairing(), Pairing::ShipPickup);
            assert_eq!(fx.ship(ShipId::Player2).lives(), 4);
        }

        #[test]
        fn ramming_enemy_explodes_ship_and_moves_enemy_to_row() {
            let mut fx = Fixture::new();
            let handle = fx.enemies.spawn(enemy_at(Vec2::new(600.0, 300.0)));

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(
                events,
                vec![CollisionEvent::ShipRammedEnemy {
                    ship: ShipId::Player2,
                    enemy: handle
                }]
            );
            assert!(fx.ship(ShipId::Player2).currently_exploding());
            assert_eq!(fx.enemies.get(handle).unwrap().position().y, 100.0);
        }

        #[test]
        fn crate_hit_shields_ship_from_enemy_bullet_in_same_frame() {
            let mut fx = Fixture::new();
            fx.obstacles.spawn(crate_at(Vec2::new(100.0, 400.0)));
            let mut enemy = enemy_at(Vec2::new(700.0, 100.0));
            enemy.bullets_mut().spawn(Projectile::new(
                Vec2::new(100.0, 400.0),
                Vec2::new(0.0, 250.0),
                Vec2::new(3.0, 6.0),
                Owner::Enemy,
            ));
            fx.enemies.spawn(enemy);

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(events.len(), 1);
            assert_eq!(events[0].pairing(), Pairing::ShipObstacle);
        }
    }

    mod bullet_tests {
        use super::*;

        #[test]
        fn shooting_crate_scores_one_and_bullet_persists() {
            let mut fx = Fixture::new();
            let crate_handle = fx.obstacles.spawn(crate_at(Vec2::new(300.0, 200.0)));
            let bullet = fx.bullets.spawn(player_bullet(Vec2::new(300.0, 210.0), ShipId::Player2));

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(
                events,
                vec![CollisionEvent::ObstacleShot {
                    obstacle: crate_handle,
                    bullet,
                    shooter: ShipId::Player2
                }]
            );
            assert_eq!(fx.ship(ShipId::Player2).score(), OBSTACLE_POINTS);
            assert_eq!(fx.ship(ShipId::Player1).score(), 0);
            assert!(fx.bullets.contains(bullet));
        }

        #[test]
        fn shooting_enemy_scores_ten() {
            let mut fx = Fixture::new();
            let enemy = fx.enemies.spawn(enemy_at(Vec2::new(300.0, 100.0)));
            fx.bullets.spawn(player_bullet(Vec2::new(305.0, 110.0), ShipId::Player1));

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(events.len(), 1);
            assert_eq!(events[0].pairing(), Pairing::EnemyBullet);
            assert_eq!(fx.ship(ShipId::Player1).score(), ENEMY_POINTS);
            assert_eq!(fx.enemies.get(enemy).unwrap().position().y, 100.0);
        }

        #[test]
        fn offscreen_bullet_never_collides() {
            let mut fx = Fixture::new();
            let mut bullet = player_bullet(Vec2::new(300.0, 4.0), ShipId::Player1);
            bullet.update(0.1, Viewport::default());
            assert!(bullet.outside_screen());
            fx.obstacles.spawn(crate_at(bullet.position()));
            fx.bullets.spawn(bullet);

            assert!(fx.resolve(&CollisionEngine::default()).is_empty());
            assert_eq!(fx.ship(ShipId::Player1).score(), 0);
        }

        #[test]
        fn dead_shooter_still_scores() {
            let mut fx = Fixture::new();
            fx.ships[0] = PlayerShip::new(
                ShipId::Player1,
                Vec2::new(100.0, 400.0),
                &ShipConfig {
                    initial_lives: 1,
                    ..ShipConfig::default()
                },
            );
            let stray = fx.ships[0].fire_bullet(&ProjectileConfig::default()).unwrap();
            fx.ships[0].explode();
            while fx.ships[0].advance_explosion() {}
            assert!(!fx.ships[0].is_alive());

            fx.obstacles.spawn(crate_at(stray.position()));
            fx.bullets.spawn(stray);
            fx.resolve(&CollisionEngine::default());
            assert_eq!(fx.ship(ShipId::Player1).score(), OBSTACLE_POINTS);
        }

        #[test]
        fn enemy_bullet_persists_by_default() {
            let mut fx = Fixture::new();
            let mut enemy = enemy_at(Vec2::new(700.0, 100.0));
            let bullet = enemy.bullets_mut().spawn(Projectile::new(
                Vec2::new(100.0, 400.0),
                Vec2::new(0.0, 250.0),
                Vec2::new(3.0, 6.0),
                Owner::Enemy,
            ));
            let enemy = fx.enemies.spawn(enemy);

            let events = fx.resolve(&CollisionEngine::default());

            assert_eq!(events.len(), 1);
            assert_eq!(events[0].ship(), ShipId::Player1);
            assert!(fx.enemies.get(enemy).unwrap().bullets().contains(bullet));
        }

        #[test]
        fn enemy_bullet_consumed_when_configured() {
            let mut fx = Fixture::new();
            let mut enemy = enemy_at(Vec2::new(700.0, 100.0));
            let bullet = enemy.bullets_mut().spawn(Projectile::new(
                Vec2::new(100.0, 400.0),
                Vec2::new(0.0, 250.0),
                Vec2::new(3.0, 6.0),
                Owner::Enemy,
            ));
            let enemy = fx.enemies.spawn(enemy);
            let engine = CollisionEngine::new(&CollisionConfig {
                consume_enemy_bullet_on_hit: true,
            });

            fx.resolve(&engine);

            assert!(fx.ship(ShipId::Player1).currently_exploding());
            assert!(!fx.enemies.get(enemy).unwrap().bullets().contains(bullet));
        }
    }
}
