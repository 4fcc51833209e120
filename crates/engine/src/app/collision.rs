use super::entity::Entity;
use super::{Rect, Vec2};

/// How simultaneous movers see each other within one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionMode {
    /// Entities move one at a time in insertion order; later movers test
    /// against already-moved neighbours. Order dependent.
    #[default]
    Sequential,
    /// Every entity tests against tick-start hitboxes, all moves commit at
    /// once, and movers that end up newly overlapping are sent back.
    TwoPhase,
}

impl CollisionMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sequential" => Some(CollisionMode::Sequential),
            "two_phase" | "two-phase" | "twophase" => Some(CollisionMode::TwoPhase),
            _ => None,
        }
    }
}

/// Region covered while moving `hitbox` to `x`. A candidate that jumps
/// clean over a neighbour in one tick still collides with it.
fn swept_x(hitbox: Rect, x: f32) -> Rect {
    let left = hitbox.x.min(x);
    let right = (hitbox.x + hitbox.w).max(x + hitbox.w);
    Rect::new(left, hitbox.y, right - left, hitbox.h)
}

fn swept_y(hitbox: Rect, y: f32) -> Rect {
    let top = hitbox.y.min(y);
    let bottom = (hitbox.y + hitbox.h).max(y + hitbox.h);
    Rect::new(hitbox.x, top, hitbox.w, bottom - top)
}

/// A neighbour the mover already overlaps only blocks a candidate that
/// still overlaps it; otherwise the swept region is tested so fast movers
/// cannot pass through.
fn blocked<'a>(
    current: &Rect,
    swept: &Rect,
    candidate: &Rect,
    mut others: impl Iterator<Item = &'a Rect>,
) -> bool {
    others.any(|other| {
        if current.overlaps(other) {
            candidate.overlaps(other)
        } else {
            swept.overlaps(other)
        }
    })
}

/// Resolves X then Y for one mover. A rejected axis leaves that coordinate
/// unchanged; the other axis is still attempted, which gives wall sliding.
fn resolve_axes<'a, I>(hitbox: Rect, velocity: Vec2, dt: f32, others: impl Fn() -> I) -> Vec2
where
    I: Iterator<Item = &'a Rect>,
{
    let mut resolved = hitbox;

    if velocity.x != 0.0 {
        let try_x = resolved.x + velocity.x * dt;
        let candidate = resolved.with_x(try_x);
        if !blocked(&resolved, &swept_x(resolved, try_x), &candidate, others()) {
            resolved = candidate;
        }
    }

    if velocity.y != 0.0 {
        let try_y = resolved.y + velocity.y * dt;
        let candidate = resolved.with_y(try_y);
        if !blocked(&resolved, &swept_y(resolved, try_y), &candidate, others()) {
            resolved = candidate;
        }
    }

    resolved.position()
}

pub(crate) fn resolve_movement(mode: CollisionMode, entities: &mut [Entity], dt: f32) {
    match mode {
        CollisionMode::Sequential => resolve_sequential(entities, dt),
        CollisionMode::TwoPhase => resolve_two_phase(entities, dt),
    }
}

fn resolve_sequential(entities: &mut [Entity], dt: f32) {
    let mut hitboxes: Vec<Rect> = entities.iter().map(Entity::hitbox).collect();

    for (index, entity) in entities.iter_mut().enumerate() {
        let velocity = entity.velocity();
        if velocity.is_zero() {
            entity.sync_hitbox();
            continue;
        }
        let target = resolve_axes(hitboxes[index], velocity, dt, || {
            hitboxes
                .iter()
                .enumerate()
                .filter(move |(other, _)| *other != index)
                .map(|(_, hitbox)| hitbox)
        });
        entity.commit_x(target.x);
        entity.commit_y(target.y);
        entity.sync_hitbox();
        hitboxes[index] = entity.hitbox();
    }
}

fn resolve_two_phase(entities: &mut [Entity], dt: f32) {
    let start: Vec<Rect> = entities.iter().map(Entity::hitbox).collect();

    let targets: Vec<Vec2> = entities
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            let velocity = entity.velocity();
            if velocity.is_zero() {
                return start[index].position();
            }
            resolve_axes(start[index], velocity, dt, || {
                start
                    .iter()
                    .enumerate()
                    .filter(move |(other, _)| *other != index)
                    .map(|(_, hitbox)| hitbox)
            })
        })
        .collect();

    let mut moved = vec![false; entities.len()];
    for ((entity, target), has_moved) in entities.iter_mut().zip(&targets).zip(&mut moved) {
        *has_moved = *target != entity.position();
        entity.commit_x(target.x);
        entity.commit_y(target.y);
        entity.sync_hitbox();
    }

    // Each round sends back every mover that conflicts, so the outcome does
    // not depend on storage order. At most one round per entity.
    loop {
        let conflicting: Vec<usize> = (0..entities.len())
            .filter(|&index| moved[index])
            .filter(|&index| {
                let hitbox = entities[index].hitbox();
                entities.iter().enumerate().any(|(other, neighbour)| {
                    other != index
                        && hitbox.overlaps(&neighbour.hitbox())
                        && !start[index].overlaps(&start[other])
                })
            })
            .collect();
        if conflicting.is_empty() {
            break;
        }
        for index in conflicting {
            entities[index].set_position(start[index].position());
            moved[index] = false;
        }
    }
}
