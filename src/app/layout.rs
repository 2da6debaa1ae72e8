use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::graph::{GraphEdge, GraphNode};

/// One simulated node inside the solver's private snapshot.
#[derive(Clone, Debug)]
pub(in crate::app) struct SolverBody {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// While set, the body is force-fixed to this position each step.
    pub fixed: Option<Vec2>,
}

/// Boundary to the force-directed solver. The driver is the only caller;
/// any solver with repulsion, link springs, centering and collision can sit
/// behind it.
pub(in crate::app) trait ForceSolver {
    /// Replaces the internal snapshot with the given bodies and springs
    /// (index pairs into `bodies`).
    fn sync(&mut self, bodies: Vec<SolverBody>, springs: Vec<(usize, usize)>);
    fn set_fixed(&mut self, id: &str, pos: Option<Vec2>);
    /// Advances one step; returns whether anything is still moving.
    fn step(&mut self, viewport: Vec2, dt: f32) -> bool;
    fn bodies(&self) -> &[SolverBody];
}

/// Owns the solver and the running/idle state machine, feeds it pin
/// constraints, and writes resulting positions back to the node store.
pub(in crate::app) struct LayoutDriver {
    solver: Box<dyn ForceSolver>,
    pinned: HashMap<String, Vec2>,
    running: bool,
}

impl LayoutDriver {
    pub fn new() -> Self {
        Self::with_solver(Box::new(SpringSolver::default()))
    }

    pub fn with_solver(solver: Box<dyn ForceSolver>) -> Self {
        Self {
            solver,
            pinned: HashMap::new(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// idle → running re-syncs the solver snapshot from the current node
    /// positions first, absorbing any manual arrangement done while idle.
    /// running → idle just stops; the in-flight tick always completes.
    pub fn toggle(&mut self, nodes: &[GraphNode], edges: &[GraphEdge]) {
        if self.running {
            self.running = false;
        } else {
            self.resync(nodes, edges);
            self.running = true;
        }
    }

    /// Rebuilds the solver snapshot from the canonical node store. Springs
    /// with endpoints missing from the node set are dropped. Active pins
    /// survive the resync.
    pub fn resync(&mut self, nodes: &[GraphNode], edges: &[GraphEdge]) {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut bodies = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let radius = node
                .half_extents
                .map(|half| half.x.max(half.y))
                .unwrap_or(24.0);
            index_by_id.insert(node.id.as_str(), index);
            bodies.push(SolverBody {
                id: node.id.clone(),
                pos: node.pos,
                vel: Vec2::ZERO,
                radius,
                fixed: self.pinned.get(&node.id).copied(),
            });
        }

        let mut springs = Vec::with_capacity(edges.len());
        for edge in edges {
            if let (Some(&source), Some(&target)) = (
                index_by_id.get(edge.source.as_str()),
                index_by_id.get(edge.target.as_str()),
            ) && source != target
            {
                springs.push((source, target));
            }
        }

        self.solver.sync(bodies, springs);
    }

    /// Force-fixes a dragged node to the drag position for as long as the
    /// pin is held.
    pub fn pin(&mut self, id: &str, pos: Vec2) {
        self.pinned.insert(id.to_string(), pos);
        self.solver.set_fixed(id, Some(pos));
    }

    /// Drag released: the node rejoins free simulation from where it is.
    pub fn release(&mut self, id: &str) {
        self.pinned.remove(id);
        self.solver.set_fixed(id, None);
    }

    /// One cooperative tick. Not an error path: before every node has
    /// measured extents the driver simply is not initialized and does
    /// nothing. Returns whether the simulation is still in motion.
    pub fn tick(&mut self, nodes: &mut [GraphNode], viewport: Vec2, dt: f32) -> bool {
        if !self.running || nodes.is_empty() {
            return false;
        }
        if nodes.iter().any(|node| node.half_extents.is_none()) {
            return false;
        }

        let moving = self.solver.step(viewport, dt);

        let mut positions = HashMap::with_capacity(self.solver.bodies().len());
        for body in self.solver.bodies() {
            positions.insert(body.id.as_str(), body.pos);
        }
        for node in nodes.iter_mut() {
            if let Some(&pos) = positions.get(node.id.as_str()) {
                node.pos = pos;
            }
        }

        moving
    }
}

/// Default solver: flat pairwise repulsion, spring attraction along links,
/// centering pull toward the viewport center scaled by aspect ratio, and
/// radius-proportional collision.
#[derive(Default)]
pub(in crate::app) struct SpringSolver {
    bodies: Vec<SolverBody>,
    springs: Vec<(usize, usize)>,
    index_by_id: HashMap<String, usize>,
}

impl ForceSolver for SpringSolver {
    fn sync(&mut self, bodies: Vec<SolverBody>, springs: Vec<(usize, usize)>) {
        self.index_by_id = bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (body.id.clone(), index))
            .collect();
        self.bodies = bodies;
        self.springs = springs;
    }

    fn set_fixed(&mut self, id: &str, pos: Option<Vec2>) {
        if let Some(&index) = self.index_by_id.get(id) {
            let body = &mut self.bodies[index];
            body.fixed = pos;
            if let Some(pos) = pos {
                body.pos = pos;
                body.vel = Vec2::ZERO;
            }
        }
    }

    fn step(&mut self, viewport: Vec2, dt: f32) -> bool {
        let node_count = self.bodies.len();
        if node_count < 2 {
            return false;
        }

        let repulsion_strength = 26_000.0;
        let spring_strength = 0.018;
        let spring_damping = 0.22;
        let collision_strength = 1.6;
        let center_pull = 0.0012;
        let damping = 0.88_f32;
        let softening = 480.0;
        let time_step_scale = (dt * 60.0).clamp(0.25, 3.0);
        let damping_factor = damping.powf(time_step_scale);

        // World origin is the viewport center; wide viewports relax the
        // horizontal pull so the layout spreads along the long axis.
        let aspect = if viewport.y > 0.0 {
            (viewport.x / viewport.y).clamp(0.5, 2.5)
        } else {
            1.0
        };
        let center_scale = vec2(center_pull / aspect, center_pull * aspect);

        let mut forces = vec![Vec2::ZERO; node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = self.bodies[i].pos - self.bodies[j].pos;
                let distance_sq = delta.length_sq().max(1.0);
                let push = delta * (repulsion_strength / (distance_sq * (distance_sq.sqrt() + softening)));
                forces[i] += push;
                forces[j] -= push;

                let min_gap = self.bodies[i].radius + self.bodies[j].radius + 14.0;
                let distance = distance_sq.sqrt();
                if distance < min_gap {
                    let direction = if distance > 0.0001 {
                        delta / distance
                    } else {
                        vec2(1.0, 0.0)
                    };
                    let overlap = min_gap - distance;
                    forces[i] += direction * overlap * collision_strength;
                    forces[j] -= direction * overlap * collision_strength;
                }
            }
        }

        for &(from, to) in &self.springs {
            let delta = self.bodies[from].pos - self.bodies[to].pos;
            let distance_sq = delta.length_sq();
            if distance_sq <= 0.0001 * 0.0001 {
                continue;
            }
            let distance = distance_sq.sqrt();
            let direction = delta / distance;

            let preferred = 90.0 + (self.bodies[from].radius + self.bodies[to].radius) * 1.4;
            let spring = (distance - preferred) * spring_strength;
            let relative_velocity = self.bodies[from].vel - self.bodies[to].vel;
            let damping_force = relative_velocity.dot(direction) * spring_damping;
            let correction = direction * (spring + damping_force);

            forces[from] -= correction;
            forces[to] += correction;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            let pos = self.bodies[index].pos;
            *force -= vec2(pos.x * center_scale.x, pos.y * center_scale.y);
        }

        let max_force = 220.0_f32;
        let max_force_sq = max_force * max_force;
        let max_speed = 18.0_f32;
        let max_speed_sq = max_speed * max_speed;
        let min_sleep_speed_sq = 0.02 * 0.02;
        let min_sleep_force_sq = 0.08 * 0.08;
        let mut any_motion = false;

        for (index, force_value) in forces.iter().enumerate() {
            let body = &mut self.bodies[index];
            if let Some(pinned) = body.fixed {
                body.pos = pinned;
                body.vel = Vec2::ZERO;
                continue;
            }

            let mut force = *force_value;
            let force_sq = force.length_sq();
            if force_sq > max_force_sq {
                force *= max_force / force_sq.sqrt();
            }

            let mut velocity = (body.vel + (force * (0.06 * time_step_scale))) * damping_factor;
            let mut speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= max_speed / speed_sq.sqrt();
                speed_sq = max_speed_sq;
            }

            if speed_sq < min_sleep_speed_sq && force_sq < min_sleep_force_sq {
                velocity = Vec2::ZERO;
                speed_sq = 0.0;
            }

            body.vel = velocity;
            body.pos += velocity * time_step_scale;
            if speed_sq > 0.000_001 {
                any_motion = true;
            }
        }

        any_motion
    }

    fn bodies(&self) -> &[SolverBody] {
        &self.bodies
    }
}
