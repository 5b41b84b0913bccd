//! Target selection and seek movement

use glam::Vec2;

use super::state::Enemy;

/// The `count` enemies closest to `from`, nearest first
///
/// Ties keep their order in `enemies`. Asking for more targets than exist
/// returns all of them.
pub fn nearest_enemies(enemies: &[Enemy], from: Vec2, count: usize) -> Vec<&Enemy> {
    let mut ranked: Vec<(f32, &Enemy)> = enemies
        .iter()
        .map(|e| (e.pos.distance_squared(from), e))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().take(count).map(|(_, e)| e).collect()
}

pub fn nearest_enemy(enemies: &[Enemy], from: Vec2) -> Option<&Enemy> {
    enemies
        .iter()
        .min_by(|a, b| a.pos.distance_squared(from).total_cmp(&b.pos.distance_squared(from)))
}

/// Straight-line step of length `speed` from `pos` toward `target`
pub fn seek(pos: Vec2, target: Vec2, speed: f32) -> Vec2 {
    (target - pos).normalize_or_zero() * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn enemy(id: u32, x: f32, z: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, z),
            health: 10,
        }
    }

    #[test]
    fn test_nearest_orders_by_distance() {
        let enemies = vec![enemy(1, 300.0, 0.0), enemy(2, 50.0, 0.0), enemy(3, 0.0, -120.0)];
        let ids: Vec<u32> = nearest_enemies(&enemies, Vec2::ZERO, 2)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_nearest_returns_all_when_short() {
        let enemies = vec![enemy(1, 10.0, 0.0), enemy(2, 5.0, 0.0)];
        assert_eq!(nearest_enemies(&enemies, Vec2::ZERO, 10).len(), 2);
        assert!(nearest_enemies(&[], Vec2::ZERO, 3).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let enemies = vec![enemy(7, 10.0, 0.0), enemy(8, -10.0, 0.0), enemy(9, 0.0, 10.0)];
        let ids: Vec<u32> = nearest_enemies(&enemies, Vec2::ZERO, 3)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![7, 8, 9]);
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO).map(|e| e.id), Some(7));
    }

    #[test]
    fn test_seek_moves_toward_target() {
        let step = seek(Vec2::new(100.0, 0.0), Vec2::ZERO, 2.0);
        assert_eq!(step, Vec2::new(-2.0, 0.0));
        assert_eq!(seek(Vec2::ONE, Vec2::ONE, 2.0), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_nearest_is_sorted_and_bounded(
            points in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 0..60),
            count in 0usize..80,
        ) {
            let enemies: Vec<Enemy> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, z))| enemy(i as u32, x, z))
                .collect();
            let from = Vec2::new(13.0, -7.0);
            let picked = nearest_enemies(&enemies, from, count);

            prop_assert_eq!(picked.len(), count.min(enemies.len()));
            for pair in picked.windows(2) {
                prop_assert!(pair[0].pos.distance_squared(from) <= pair[1].pos.distance_squared(from));
            }
            // Nothing left out is closer than the furthest pick
            if let Some(last) = picked.last() {
                let cutoff = last.pos.distance_squared(from);
                let closer = enemies.iter().filter(|e| e.pos.distance_squared(from) < cutoff).count();
                prop_assert!(closer < picked.len());
            }
        }
    }
}
