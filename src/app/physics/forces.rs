use eframe::egui::Vec2;

use crate::util::jiggle;

use super::quadtree::QuadNode;

/// Below unit distance the inverse falloff is softened to avoid blowups.
fn soften(distance_sq: f32) -> f32 {
    if distance_sq < 1.0 {
        distance_sq.sqrt()
    } else {
        distance_sq
    }
}

fn charge_between(
    point: Vec2,
    other: Vec2,
    strength: f32,
    alpha: f32,
    pair: (usize, usize),
) -> Vec2 {
    let mut delta = other - point;
    if delta == Vec2::ZERO {
        delta = jiggle(pair.0, pair.1);
    }
    delta * (strength * alpha / soften(delta.length_sq()))
}

/// Adds the many-body velocity change for `index` by walking the tree.
///
/// Negative charges push `index` away from the charged cell.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    theta: f32,
    alpha: f32,
    velocity: &mut Vec2,
) {
    if node.charge == 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            *velocity +=
                charge_between(point, positions[other], charges[other], alpha, (index, other));
        }
        return;
    }

    let delta = node.center_of_charge - point;
    let distance_sq = delta.length_sq();
    let side = node.bounds.side_length();
    let can_approximate = distance_sq > 0.0
        && !node.bounds.contains(point)
        && (side * side) < (theta * theta * distance_sq);

    if can_approximate {
        *velocity += delta * (node.charge * alpha / soften(distance_sq));
        return;
    }

    for child in node.children() {
        accumulate_charge_for_node(child, index, positions, charges, theta, alpha, velocity);
    }
}

fn resolve_overlap(from: usize, to: usize, predicted: &[Vec2], radii: &[f32], nudges: &mut [Vec2]) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    if delta.length_sq() >= reach * reach {
        return;
    }
    if delta == Vec2::ZERO {
        delta = jiggle(from, to);
    }

    let distance = delta.length();
    let push = delta * ((reach - distance) / distance);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    nudges[from] += push * share;
    nudges[to] -= push * (1.0 - share);
}

/// Pushes apart every overlapping pair found by a dual walk of the tree.
///
/// The smaller circle of a pair moves further. Cell pairs farther apart than
/// `max_reach_sq` are pruned.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    radii: &[f32],
    max_reach_sq: f32,
    nudges: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_overlap(from, to, predicted, radii, nudges);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(from, to, predicted, radii, nudges);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(
                child_a,
                child_a,
                true,
                predicted,
                radii,
                max_reach_sq,
                nudges,
            );
            for child_b in &children[first + 1..] {
                accumulate_collision_pairs(
                    child_a,
                    child_b,
                    false,
                    predicted,
                    radii,
                    max_reach_sq,
                    nudges,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(
                child,
                node_b,
                false,
                predicted,
                radii,
                max_reach_sq,
                nudges,
            );
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(
                node_a,
                child,
                false,
                predicted,
                radii,
                max_reach_sq,
                nudges,
            );
        }
    }
}
