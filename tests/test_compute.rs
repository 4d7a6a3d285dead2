use junk_food_attack::assets::{Assets, Sprite, SpriteId};
use junk_food_attack::compute::*;
use junk_food_attack::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(SCREEN_WIDTH, SCREEN_HEIGHT, 0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// 50×50 ships and 10×10 lasers, fully opaque, so overlaps are exact.
fn solid_assets() -> Assets {
    let ship = |rgb| Sprite::solid(50, 50, rgb);
    let laser = |rgb| Sprite::solid(10, 10, rgb);
    Assets::empty()
        .with_sprite(SpriteId::Player, ship([255, 255, 255]))
        .with_sprite(SpriteId::Burger, ship([200, 120, 40]))
        .with_sprite(SpriteId::Fries, ship([250, 210, 60]))
        .with_sprite(SpriteId::Soda, ship([40, 90, 220]))
        .with_sprite(SpriteId::LaserYellow, laser([255, 240, 40]))
        .with_sprite(SpriteId::LaserRed, laser([255, 40, 40]))
        .with_sprite(SpriteId::LaserGreen, laser([40, 255, 40]))
        .with_sprite(SpriteId::LaserBlue, laser([60, 120, 255]))
}

fn laser_at(x: f32, y: f32, sprite: SpriteId) -> Projectile {
    Projectile { x, y, sprite }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = make_state();
    assert_eq!((s.player.x, s.player.y), (300.0, 630.0));
    assert_eq!(s.player.health, 100);
    assert_eq!(s.player.role, ShipRole::Player { max_health: 100 });
    assert_eq!(s.player.cooldown, 0);
}

#[test]
fn init_state_run_counters() {
    let s = init_state(750, 750, 12);
    assert_eq!(s.lives, 5);
    assert_eq!(s.score, 0);
    assert_eq!(s.high_score, 12);
    assert_eq!(s.level, 0);
    assert_eq!(s.wave_length, 5);
    assert_eq!(s.enemy_velocity, 1.0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemies.is_empty());
    assert!(s.player.lasers.is_empty());
}

#[test]
fn new_enemy_takes_sprites_from_kind() {
    let e = new_enemy(10.0, 20.0, EnemyKind::Green);
    assert_eq!(e.sprite, SpriteId::Fries);
    assert_eq!(e.laser, SpriteId::LaserGreen);
    assert_eq!(e.health, 100);
    assert_eq!(e.role, ShipRole::Enemy { kind: EnemyKind::Green });
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn move_left_normal() {
    let s2 = move_player_left(&make_state());
    assert_eq!(s2.player.x, 295.0);
}

#[test]
fn move_left_stops_at_edge() {
    let mut s = make_state();
    s.player.x = 5.0; // 5 - 5 is not > 0
    assert_eq!(move_player_left(&s).player.x, 5.0);
    s.player.x = 6.0;
    assert_eq!(move_player_left(&s).player.x, 1.0);
}

#[test]
fn move_right_respects_sprite_width() {
    let assets = solid_assets();
    let mut s = make_state();
    assert_eq!(move_player_right(&s, &assets).player.x, 305.0);

    s.player.x = 695.0; // 695 + 5 + 50 == 750, not < 750
    assert_eq!(move_player_right(&s, &assets).player.x, 695.0);
    s.player.x = 694.0;
    assert_eq!(move_player_right(&s, &assets).player.x, 699.0);
}

#[test]
fn move_right_with_null_sprite_uses_zero_width() {
    let mut s = make_state();
    s.player.x = 744.0;
    assert_eq!(move_player_right(&s, &Assets::empty()).player.x, 749.0);
}

#[test]
fn move_up_stops_at_top() {
    let mut s = make_state();
    assert_eq!(move_player_up(&s).player.y, 625.0);
    s.player.y = 5.0;
    assert_eq!(move_player_up(&s).player.y, 5.0);
}

#[test]
fn move_down_keeps_room_for_health_bar() {
    let assets = solid_assets();
    let mut s = make_state();
    assert_eq!(move_player_down(&s, &assets).player.y, 635.0);

    s.player.y = 680.0; // 680 + 5 + 50 + 15 == 750
    assert_eq!(move_player_down(&s, &assets).player.y, 680.0);
}

#[test]
fn move_does_not_mutate_original() {
    let assets = solid_assets();
    let s = make_state();
    let _ = move_player_left(&s);
    let _ = move_player_right(&s, &assets);
    let _ = move_player_up(&s);
    let _ = move_player_down(&s, &assets);
    assert_eq!((s.player.x, s.player.y), (300.0, 630.0));
}

// ── Firing & cooldown ─────────────────────────────────────────────────────────

#[test]
fn shoot_adds_laser_at_player_position() {
    let s = make_state();
    let s2 = player_shoot(&s, &solid_assets());
    assert_eq!(s2.player.lasers, vec![laser_at(300.0, 630.0, SpriteId::LaserYellow)]);
    assert_eq!(s2.player.cooldown, 1);
    assert!(s.player.lasers.is_empty());
}

#[test]
fn shoot_without_laser_sprite_does_nothing() {
    let s2 = player_shoot(&make_state(), &Assets::empty());
    assert!(s2.player.lasers.is_empty());
    assert_eq!(s2.player.cooldown, 0);
}

#[test]
fn fire_is_locked_out_immediately_after_firing() {
    let assets = solid_assets();
    let mut ship = new_player(0.0, 0.0);
    assert!(fire(&mut ship, &assets));
    // Counter sits at 1 until the next frame advances it
    assert!(!fire(&mut ship, &assets));
    assert_eq!(ship.cooldown, 1);
    advance_cooldown(&mut ship);
    assert_eq!(ship.cooldown, 2);
}

#[test]
fn cooldown_allows_one_shot_every_thirty_frames() {
    let assets = solid_assets();
    let mut ship = new_player(100.0, 400.0);

    // Frame 0: fire, then the frame's cooldown step
    assert!(fire(&mut ship, &assets));
    advance_cooldown(&mut ship);

    // Frames 1..=29: blocked
    for frame in 1..30 {
        assert!(!fire(&mut ship, &assets), "fired early on frame {}", frame);
        advance_cooldown(&mut ship);
    }

    // Frame 30: ready again
    assert!(fire(&mut ship, &assets));
    assert_eq!(ship.lasers.len(), 2);
}

#[test]
fn idle_cooldown_stays_at_zero() {
    let mut ship = new_player(0.0, 0.0);
    advance_cooldown(&mut ship);
    assert_eq!(ship.cooldown, 0);
}

#[test]
fn enemy_laser_starts_left_of_enemy() {
    let mut enemy = new_enemy(100.0, 50.0, EnemyKind::Red);
    assert!(fire(&mut enemy, &solid_assets()));
    assert_eq!(enemy.lasers, vec![laser_at(80.0, 50.0, SpriteId::LaserRed)]);
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_moves_by_signed_velocity() {
    let mut laser = laser_at(0.0, 100.0, SpriteId::LaserRed);
    move_projectile(&mut laser, 5.0);
    assert_eq!(laser.y, 105.0);
    move_projectile(&mut laser, -5.0);
    assert_eq!(laser.y, 100.0);
}

#[test]
fn off_screen_bounds_are_inclusive() {
    let at = |y| laser_at(0.0, y, SpriteId::LaserRed);
    assert!(off_screen(&at(-0.5), 750));
    assert!(!off_screen(&at(0.0), 750));
    assert!(!off_screen(&at(750.0), 750));
    assert!(off_screen(&at(750.5), 750));
}

#[test]
fn off_screen_lasers_removed_regardless_of_direction() {
    let assets = solid_assets();
    let mut target = new_player(300.0, 630.0);

    let mut down = new_enemy(0.0, 0.0, EnemyKind::Red);
    down.lasers = vec![laser_at(0.0, -10.0, SpriteId::LaserRed), laser_at(0.0, 760.0, SpriteId::LaserRed)];
    move_lasers_at(&mut down, 5.0, &mut target, &assets, 750);
    assert!(down.lasers.is_empty());

    let mut up = new_enemy(0.0, 0.0, EnemyKind::Red);
    up.lasers = vec![laser_at(0.0, -10.0, SpriteId::LaserRed), laser_at(0.0, 760.0, SpriteId::LaserRed)];
    move_lasers_at(&mut up, -5.0, &mut target, &assets, 750);
    assert!(up.lasers.is_empty());

    assert_eq!(target.health, 100);
}

#[test]
fn enemy_laser_damages_single_target() {
    let assets = solid_assets();
    let mut player = new_player(300.0, 630.0);
    let mut enemy = new_enemy(50.0, 100.0, EnemyKind::Blue);
    enemy.lasers = vec![
        laser_at(310.0, 620.0, SpriteId::LaserBlue), // moves to 625, overlaps
        laser_at(100.0, 100.0, SpriteId::LaserBlue), // misses
    ];

    move_lasers_at(&mut enemy, 5.0, &mut player, &assets, 750);

    assert_eq!(player.health, 90);
    assert_eq!(enemy.lasers, vec![laser_at(100.0, 105.0, SpriteId::LaserBlue)]);
}

#[test]
fn lasers_with_null_sprite_never_hit() {
    let assets = Assets::empty().with_sprite(SpriteId::Player, Sprite::solid(50, 50, [255, 255, 255]));
    let mut player = new_player(300.0, 630.0);
    let mut enemy = new_enemy(0.0, 0.0, EnemyKind::Red);
    enemy.lasers = vec![laser_at(310.0, 630.0, SpriteId::LaserRed)];

    move_lasers_at(&mut enemy, 5.0, &mut player, &assets, 750);
    assert_eq!(player.health, 100);
    assert_eq!(enemy.lasers.len(), 1);
}

#[test]
fn player_laser_destroys_exactly_the_enemy_it_touches() {
    let assets = solid_assets();
    let mut player = new_player(300.0, 630.0);
    player.lasers = vec![laser_at(320.0, 215.0, SpriteId::LaserYellow)];
    let mut enemies = vec![
        new_enemy(100.0, 200.0, EnemyKind::Red),
        new_enemy(300.0, 200.0, EnemyKind::Green),
        new_enemy(500.0, 200.0, EnemyKind::Blue),
    ];

    let destroyed = move_lasers_at_many(&mut player, -5.0, &mut enemies, &assets, 750);

    assert_eq!(destroyed, 1);
    assert!(player.lasers.is_empty());
    let xs: Vec<f32> = enemies.iter().map(|e| e.x).collect();
    assert_eq!(xs, vec![100.0, 500.0]);
}

#[test]
fn player_laser_destroys_at_most_one_enemy() {
    let assets = solid_assets();
    let mut player = new_player(300.0, 630.0);
    player.lasers = vec![laser_at(320.0, 215.0, SpriteId::LaserYellow)];
    let mut enemies = vec![
        new_enemy(300.0, 200.0, EnemyKind::Red),
        new_enemy(300.0, 200.0, EnemyKind::Blue),
    ];

    let destroyed = move_lasers_at_many(&mut player, -5.0, &mut enemies, &assets, 750);

    assert_eq!(destroyed, 1);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].role, ShipRole::Enemy { kind: EnemyKind::Blue });
}

#[test]
fn player_lasers_count_every_kill() {
    let assets = solid_assets();
    let mut player = new_player(300.0, 630.0);
    player.lasers = vec![
        laser_at(120.0, 215.0, SpriteId::LaserYellow),
        laser_at(520.0, 215.0, SpriteId::LaserYellow),
        laser_at(700.0, 400.0, SpriteId::LaserYellow),
    ];
    let mut enemies = vec![
        new_enemy(100.0, 200.0, EnemyKind::Red),
        new_enemy(500.0, 200.0, EnemyKind::Blue),
    ];

    let destroyed = move_lasers_at_many(&mut player, -5.0, &mut enemies, &assets, 750);

    assert_eq!(destroyed, 2);
    assert!(enemies.is_empty());
    assert_eq!(player.lasers, vec![laser_at(700.0, 395.0, SpriteId::LaserYellow)]);
}

#[test]
fn moving_lasers_advances_cooldown() {
    let assets = solid_assets();
    let mut player = new_player(300.0, 630.0);
    assert!(fire(&mut player, &assets));
    let mut enemies = Vec::new();
    move_lasers_at_many(&mut player, -5.0, &mut enemies, &assets, 750);
    assert_eq!(player.cooldown, 2);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn wave_grows_by_five_each_level() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for n in 1..=4u32 {
        s = spawn_wave(&s, &mut rng);
        assert_eq!(s.level, n);
        assert_eq!(s.wave_length, 5 + 5 * n);
        assert_eq!(s.enemies.len() as u32, 5 + 5 * n);
        s.enemies.clear();
    }
}

#[test]
fn wave_spawns_above_screen_within_margins() {
    let s = spawn_wave(&make_state(), &mut seeded_rng());
    for e in &s.enemies {
        assert!((50.0..650.0).contains(&e.x), "x out of range: {}", e.x);
        assert!((-1500.0..-100.0).contains(&e.y), "y out of range: {}", e.y);
        assert_eq!(e.x.fract(), 0.0);
        assert!(matches!(e.role, ShipRole::Enemy { .. }));
    }
}

#[test]
fn wave_is_deterministic_for_a_seed() {
    let a = spawn_wave(&make_state(), &mut StdRng::seed_from_u64(7));
    let b = spawn_wave(&make_state(), &mut StdRng::seed_from_u64(7));
    assert_eq!(a.enemies, b.enemies);
}

#[test]
fn wave_uses_every_kind_eventually() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    for _ in 0..5 {
        s = spawn_wave(&s, &mut rng);
    }
    for kind in EnemyKind::ALL {
        assert!(
            s.enemies.iter().any(|e| e.role == ShipRole::Enemy { kind }),
            "no {:?} enemy in 100 spawns",
            kind
        );
    }
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.frame, 6);
}

#[test]
fn tick_spawns_first_wave_when_empty() {
    let s2 = tick(&make_state(), &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.level, 1);
    assert_eq!(s2.wave_length, 10);
    assert_eq!(s2.enemies.len(), 10);
    assert_eq!(s2.lives, 5);
}

#[test]
fn tick_does_not_spawn_while_enemies_remain() {
    let mut s = make_state();
    s.level = 3;
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.level, 3);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].y, -499.0);
}

#[test]
fn tick_applies_held_keys() {
    let mut s = make_state();
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    let input = FrameInput { left: true, up: true, ..FrameInput::default() };
    let s2 = tick(&s, &input, &solid_assets(), &mut seeded_rng());
    assert_eq!((s2.player.x, s2.player.y), (295.0, 625.0));
}

#[test]
fn tick_fire_spawns_laser_that_moves_up_same_frame() {
    let mut s = make_state();
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    let input = FrameInput { fire: true, ..FrameInput::default() };
    let s2 = tick(&s, &input, &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.player.lasers, vec![laser_at(300.0, 625.0, SpriteId::LaserYellow)]);
    assert_eq!(s2.player.cooldown, 2);
}

#[test]
fn tick_enemy_ramming_player_costs_health_not_lives() {
    let mut s = make_state();
    s.enemies.push(new_enemy(300.0, 600.0, EnemyKind::Green));
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.player.health, 90);
    assert_eq!(s2.lives, 5);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 0);
}

#[test]
fn tick_enemy_escaping_costs_a_life() {
    let mut s = make_state();
    s.enemies.push(new_enemy(50.0, 700.0, EnemyKind::Blue)); // 701 + 50 > 750
    s.enemies.push(new_enemy(50.0, 698.0, EnemyKind::Blue)); // 699 + 50 == 749
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.lives, 4);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].y, 699.0);
    assert_eq!(s2.player.health, 100);
}

#[test]
fn tick_enemy_laser_hits_player() {
    let mut s = make_state();
    let mut enemy = new_enemy(50.0, 100.0, EnemyKind::Red);
    enemy.lasers.push(laser_at(310.0, 620.0, SpriteId::LaserRed));
    s.enemies.push(enemy);
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.player.health, 90);
    assert!(s2.enemies[0].lasers.iter().all(|l| l.y != 625.0));
}

#[test]
fn tick_player_laser_scores() {
    let mut s = make_state();
    s.high_score = 0;
    s.enemies.push(new_enemy(300.0, 400.0, EnemyKind::Red)); // moves to 401
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    s.player.lasers.push(laser_at(320.0, 425.0, SpriteId::LaserYellow)); // moves to 420
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.score, 1);
    assert_eq!(s2.high_score, 1);
    assert_eq!(s2.enemies.len(), 1);
    assert!(s2.player.lasers.is_empty());
}

#[test]
fn tick_keeps_higher_session_best() {
    let mut s = make_state();
    s.high_score = 10;
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.high_score, 10);
}

#[test]
fn tick_loses_when_lives_run_out() {
    let mut s = make_state();
    s.lives = 0;
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Lost { ticks: 1 });
    // Nothing else moves once lost
    assert_eq!(s2.level, 0);
    assert!(s2.enemies.is_empty());
}

#[test]
fn tick_loses_when_health_runs_out() {
    let mut s = make_state();
    s.player.health = 0;
    s.enemies.push(new_enemy(50.0, -500.0, EnemyKind::Red));
    let input = FrameInput { left: true, ..FrameInput::default() };
    let s2 = tick(&s, &input, &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Lost { ticks: 1 });
    assert_eq!(s2.player.x, 300.0);
    assert_eq!(s2.enemies[0].y, -500.0);
}

#[test]
fn tick_loss_screen_lasts_180_frames() {
    let assets = solid_assets();
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.health = -10;

    let mut lost_frames = 0;
    for _ in 0..1000 {
        s = tick(&s, &FrameInput::default(), &assets, &mut rng);
        match s.status {
            GameStatus::Lost { .. } => lost_frames += 1,
            GameStatus::Finished => break,
            GameStatus::Playing => panic!("run resumed after loss"),
        }
    }
    assert_eq!(lost_frames, 180);
    assert_eq!(s.status, GameStatus::Finished);
}

#[test]
fn tick_finished_is_terminal() {
    let mut s = make_state();
    s.status = GameStatus::Finished;
    let s2 = tick(&s, &FrameInput::default(), &solid_assets(), &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Finished);
    assert!(s2.enemies.is_empty());
}

#[test]
fn tick_enemies_fire_at_random_left_of_themselves() {
    let assets = solid_assets();
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.enemy_velocity = 0.0;
    // Lasers at x - 20 stay clear of the player's 300..350 column
    for (i, x) in [50.0, 100.0, 150.0, 200.0, 450.0, 500.0, 550.0, 600.0, 650.0, 700.0].into_iter().enumerate() {
        s.enemies.push(new_enemy(x, 100.0, EnemyKind::ALL[i % 3]));
    }

    let frames = 1200;
    let mut shots = 0;
    let mut last_shot = vec![None::<u64>; s.enemies.len()];
    for _ in 0..frames {
        s = tick(&s, &FrameInput::default(), &assets, &mut rng);
        assert_eq!(s.enemies.len(), 10);
        for (i, enemy) in s.enemies.iter().enumerate() {
            for laser in &enemy.lasers {
                assert_eq!(laser.x, enemy.x - 20.0);
                assert_eq!(laser.sprite, enemy.laser);
            }
            let fresh = enemy.lasers.iter().filter(|l| l.y == enemy.y).count();
            assert!(fresh <= 1);
            if fresh == 1 {
                if let Some(prev) = last_shot[i] {
                    assert!(s.frame - prev >= 30, "enemy {} refired after {} frames", i, s.frame - prev);
                }
                last_shot[i] = Some(s.frame);
                shots += 1;
            }
        }
    }

    assert_eq!(s.player.health, 100);
    assert_eq!(s.lives, 5);
    // 1 in 120 per ready enemy plus a 30-frame lockout: about 80 shots
    assert!((40..=140).contains(&shots), "{} shots in {} frames", shots, frames);
}

// ── Health bar & menu geometry ────────────────────────────────────────────────

#[test]
fn health_bar_half_health_is_half_width() {
    let mut player = new_player(300.0, 630.0);
    player.health = 50;
    let bar = health_bar(&player, &solid_assets()).expect("player has a bar");
    assert_eq!(bar.background, Rect::new(300.0, 690.0, 50.0, 10.0));
    assert_eq!(bar.foreground.w * 2.0, bar.background.w);
    assert_eq!((bar.foreground.x, bar.foreground.y), (300.0, 690.0));
}

#[test]
fn health_bar_never_negative() {
    let mut player = new_player(300.0, 630.0);
    player.health = -20;
    let bar = health_bar(&player, &solid_assets()).expect("player has a bar");
    assert_eq!(bar.foreground.w, 0.0);
}

#[test]
fn health_bar_only_for_a_visible_player() {
    let enemy = new_enemy(0.0, 0.0, EnemyKind::Red);
    assert!(health_bar(&enemy, &solid_assets()).is_none());
    assert!(health_bar(&new_player(0.0, 0.0), &Assets::empty()).is_none());
}

#[test]
fn start_button_is_centred() {
    let button = start_button(750);
    assert_eq!(button, Rect::new(275.0, 450.0, 200.0, 60.0));
    assert!(button.overlaps(&Rect::new(370.0, 470.0, 10.0, 10.0)));
    assert!(!button.overlaps(&Rect::new(265.0, 470.0, 10.0, 10.0)));
    assert!(!button.overlaps(&Rect::new(370.0, 510.0, 10.0, 10.0)));
}
