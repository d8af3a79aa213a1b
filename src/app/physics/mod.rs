mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::tags::TagGraph;
use crate::util::jiggle;

use forces::{accumulate_charge_for_node, accumulate_collision_pairs};
use quadtree::QuadNode;

const INITIAL_RADIUS: f32 = 10.0;

struct Body {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    fixed: Option<Vec2>,
}

struct Spring {
    source: usize,
    target: usize,
    strength: f32,
    bias: f32,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    nudges: Vec<Vec2>,
}

/// Node and link positions published after a simulation step.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) struct LayoutSnapshot {
    pub tick: u64,
    pub alpha: f32,
    pub positions: Vec<Vec2>,
    pub link_endpoints: Vec<(Vec2, Vec2)>,
}

/// Force layout driven by a decaying `alpha` energy.
///
/// Each step moves `alpha` toward `alpha_target`, applies charge, link,
/// centering and collision forces scaled by the current energy, then
/// integrates velocities with friction. Fixed bodies ignore forces.
pub(in crate::app) struct Simulation {
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    tick: u64,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub(in crate::app) fn new(graph: &TagGraph, config: LayoutConfig) -> Self {
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let bodies = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                Body {
                    position: vec2(radius * angle.cos(), radius * angle.sin()),
                    velocity: Vec2::ZERO,
                    radius: node.radius(),
                    fixed: None,
                }
            })
            .collect::<Vec<_>>();

        let springs = graph
            .links
            .iter()
            .map(|link| {
                let source_degree = graph.degree(link.source).max(1) as f32;
                let target_degree = graph.degree(link.target).max(1) as f32;
                Spring {
                    source: link.source,
                    target: link.target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect::<Vec<_>>();

        Self {
            running: !bodies.is_empty(),
            bodies,
            springs,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            tick: 0,
            scratch: PhysicsScratch::default(),
        }
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    pub(in crate::app) fn position(&self, index: usize) -> Option<Vec2> {
        self.bodies.get(index).map(|body| body.position)
    }

    pub(in crate::app) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Resumes stepping; the energy climbs toward the current target.
    pub(in crate::app) fn restart(&mut self) {
        if !self.running && !self.bodies.is_empty() {
            debug!(alpha = self.alpha, target = self.alpha_target, "layout restarted");
        }
        self.running = !self.bodies.is_empty();
    }

    /// Keeps the simulation hot while a node is held.
    pub(in crate::app) fn reheat(&mut self) {
        self.set_alpha_target(self.config.drag_alpha_target);
        self.restart();
    }

    /// Lets the energy decay so the layout settles and stops.
    pub(in crate::app) fn cool(&mut self) {
        self.set_alpha_target(0.0);
    }

    /// Restarts from full energy without holding it there.
    pub(in crate::app) fn kick(&mut self) {
        self.alpha = 1.0;
        self.restart();
    }

    pub(in crate::app) fn fix(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.fixed = Some(position);
        }
    }

    pub(in crate::app) fn release(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.fixed = None;
        }
    }

    pub(in crate::app) fn is_fixed(&self, index: usize) -> bool {
        self.bodies.get(index).is_some_and(|body| body.fixed.is_some())
    }

    /// Advances one tick and returns the resulting positions.
    ///
    /// Does nothing but report the current state once the layout has settled.
    pub(in crate::app) fn step(&mut self) -> LayoutSnapshot {
        if self.running {
            self.advance();
        }
        self.snapshot()
    }

    pub(in crate::app) fn snapshot(&self) -> LayoutSnapshot {
        let positions = self.bodies.iter().map(|body| body.position).collect::<Vec<_>>();
        let link_endpoints = self
            .springs
            .iter()
            .map(|spring| (positions[spring.source], positions[spring.target]))
            .collect();

        LayoutSnapshot {
            tick: self.tick,
            alpha: self.alpha,
            positions,
            link_endpoints,
        }
    }

    fn advance(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.tick += 1;

        self.apply_charge();
        self.apply_links();
        self.apply_centering();
        for _ in 0..self.config.collision_iterations {
            self.apply_collisions();
        }

        let retain = 1.0 - self.config.velocity_decay;
        for body in &mut self.bodies {
            if let Some(fixed) = body.fixed {
                body.position = fixed;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= retain;
                body.position += body.velocity;
            }
        }

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(tick = self.tick, "layout settled");
        }
    }

    fn apply_charge(&mut self) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.charges.clear();
        for body in &self.bodies {
            scratch.positions.push(body.position);
            scratch.charges.push(-self.config.charge_strength * body.radius);
        }

        let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges) else {
            return;
        };

        for (index, body) in self.bodies.iter_mut().enumerate() {
            accumulate_charge_for_node(
                &tree,
                index,
                &scratch.positions,
                &scratch.charges,
                self.config.theta,
                self.alpha,
                &mut body.velocity,
            );
        }
    }

    fn apply_links(&mut self) {
        for spring in &self.springs {
            let source = &self.bodies[spring.source];
            let target = &self.bodies[spring.target];
            let mut delta =
                (target.position + target.velocity) - (source.position + source.velocity);
            if delta == Vec2::ZERO {
                delta = jiggle(spring.source, spring.target);
            }

            let distance = delta.length();
            let stretch = (distance - self.config.link_distance) / distance
                * self.alpha
                * spring.strength;
            let pull = delta * stretch;

            self.bodies[spring.target].velocity -= pull * spring.bias;
            self.bodies[spring.source].velocity += pull * (1.0 - spring.bias);
        }
    }

    fn apply_centering(&mut self) {
        let strength = self.config.center_strength * self.alpha;
        for body in &mut self.bodies {
            body.velocity -= body.position * strength;
        }
    }

    fn apply_collisions(&mut self) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.radii.clear();
        scratch.charges.clear();
        let mut max_radius = 0.0_f32;
        for body in &self.bodies {
            let radius = body.radius + self.config.collision_padding;
            scratch.positions.push(body.position + body.velocity);
            scratch.radii.push(radius);
            scratch.charges.push(radius);
            max_radius = max_radius.max(radius);
        }

        let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges) else {
            return;
        };

        scratch.nudges.clear();
        scratch.nudges.resize(self.bodies.len(), Vec2::ZERO);
        let max_reach = max_radius * 2.0;
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.positions,
            &scratch.radii,
            max_reach * max_reach,
            &mut scratch.nudges,
        );

        for (body, nudge) in self.bodies.iter_mut().zip(&scratch.nudges) {
            body.velocity += *nudge;
        }
    }
}
