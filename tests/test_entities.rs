use alien_invasion::entities::*;

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges() {
    let r = Rect::new(10, 4, 3, 2);
    assert_eq!(r.left(), 10);
    assert_eq!(r.right(), 13);
    assert_eq!(r.top(), 4);
    assert_eq!(r.bottom(), 6);
    assert_eq!(r.centerx(), 11);
    assert_eq!(r.midtop(), (11, 4));
}

#[test]
fn rect_overlap_counts_as_intersection() {
    let a = Rect::new(0, 0, 3, 2);
    let b = Rect::new(2, 1, 3, 2);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn rect_touching_edges_do_not_intersect() {
    let a = Rect::new(0, 0, 3, 2);
    let right = Rect::new(3, 0, 3, 2);
    let below = Rect::new(0, 2, 3, 2);
    assert!(!a.intersects(&right));
    assert!(!a.intersects(&below));
}

#[test]
fn rect_empty_never_intersects() {
    let a = Rect::new(0, 0, 5, 5);
    let empty = Rect::new(2, 2, 0, 1);
    assert!(!a.intersects(&empty));
}

#[test]
fn rect_contains_point_excludes_far_edges() {
    let r = Rect::new(10, 10, 4, 2);
    assert!(r.contains_point(10, 10));
    assert!(r.contains_point(13, 11));
    assert!(!r.contains_point(14, 10));
    assert!(!r.contains_point(10, 12));
    assert!(!r.contains_point(9, 10));
}

// ── Direction ─────────────────────────────────────────────────────────────────

#[test]
fn direction_sign_and_flip() {
    assert_eq!(Direction::Right.sign(), 1.0);
    assert_eq!(Direction::Left.sign(), -1.0);
    assert_eq!(Direction::Right.flipped(), Direction::Left);
    assert_eq!(Direction::Left.flipped(), Direction::Right);
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[test]
fn ship_starts_bottom_centre() {
    let ship = Ship::new(3, 2, 80, 23);
    assert_eq!(ship.rect, Rect::new(39, 21, 3, 2));
    assert_eq!(ship.x, 39.0);
    assert!(!ship.moving_left && !ship.moving_right);
}

#[test]
fn ship_moves_with_intent_only() {
    let mut ship = Ship::new(3, 2, 80, 23);
    ship.update(1.5, 80);
    assert_eq!(ship.x, 39.0);

    ship.moving_right = true;
    ship.update(1.5, 80);
    assert_eq!(ship.x, 40.5);
    assert_eq!(ship.rect.x, 40);

    ship.moving_right = false;
    ship.moving_left = true;
    ship.update(1.5, 80);
    ship.update(1.5, 80);
    assert_eq!(ship.x, 37.5);
    assert_eq!(ship.rect.x, 37);
}

#[test]
fn ship_both_intents_cancel() {
    let mut ship = Ship::new(3, 2, 80, 23);
    ship.moving_left = true;
    ship.moving_right = true;
    ship.update(1.0, 80);
    assert_eq!(ship.x, 39.0);
}

#[test]
fn ship_clamped_to_screen() {
    let mut ship = Ship::new(3, 2, 80, 23);
    ship.moving_right = true;
    for _ in 0..100 {
        ship.update(1.7, 80);
        assert!(ship.rect.left() >= 0 && ship.rect.right() <= 80);
    }
    assert_eq!(ship.rect.right(), 80);

    ship.moving_right = false;
    ship.moving_left = true;
    for _ in 0..100 {
        ship.update(1.7, 80);
        assert!(ship.rect.left() >= 0 && ship.rect.right() <= 80);
    }
    assert_eq!(ship.rect.left(), 0);
}

#[test]
fn ship_center_keeps_intent() {
    let mut ship = Ship::new(3, 2, 80, 23);
    ship.moving_left = true;
    ship.x = 3.0;
    ship.rect.x = 3;
    ship.center(80, 23);
    assert_eq!(ship.rect.x, 39);
    assert_eq!(ship.x, 39.0);
    assert!(ship.moving_left);
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[test]
fn projectile_sits_on_ship_nose() {
    let ship = Ship::new(3, 2, 80, 23);
    let p = Projectile::from_ship(&ship, 1, 1);
    assert_eq!(p.rect.centerx(), ship.rect.centerx());
    assert_eq!(p.rect.bottom(), ship.rect.top());
    assert_eq!(p.y, p.rect.y as f32);
}

#[test]
fn projectile_moves_up_and_expires() {
    let mut p = Projectile {
        rect: Rect::new(5, 1, 1, 1),
        y: 1.0,
    };
    p.update(0.6);
    assert_eq!(p.rect.y, 0);
    assert!(!p.is_off_screen());

    p.update(0.6);
    assert_eq!(p.rect.y, -1);
    assert_eq!(p.rect.bottom(), 0);
    assert!(p.is_off_screen());
}

// ── Enemy / Fleet ─────────────────────────────────────────────────────────────

#[test]
fn enemy_edge_depends_on_heading() {
    let at_right = Enemy::new(77, 2, 3, 2);
    assert!(at_right.at_edge(80, Direction::Right));
    assert!(!at_right.at_edge(80, Direction::Left));

    let at_left = Enemy::new(0, 2, 3, 2);
    assert!(at_left.at_edge(80, Direction::Left));
    assert!(!at_left.at_edge(80, Direction::Right));
}

#[test]
fn fleet_shift_and_drop_move_everyone() {
    let mut fleet = Fleet {
        enemies: vec![Enemy::new(3, 2, 3, 2), Enemy::new(9, 6, 3, 2)],
    };
    fleet.shift(0.5, Direction::Left);
    fleet.drop_by(2);
    assert_eq!(fleet.enemies[0].x, 2.5);
    assert_eq!(fleet.enemies[0].rect, Rect::new(2, 4, 3, 2));
    assert_eq!(fleet.enemies[1].x, 8.5);
    assert_eq!(fleet.enemies[1].rect, Rect::new(8, 8, 3, 2));
}

#[test]
fn fleet_collides_with_ship() {
    let ship = Ship::new(3, 2, 80, 23);
    let mut fleet = Fleet {
        enemies: vec![Enemy::new(0, 0, 3, 2)],
    };
    assert!(!fleet.collides_with(&ship));
    fleet.enemies.push(Enemy::new(40, 20, 3, 2));
    assert!(fleet.collides_with(&ship));
}
