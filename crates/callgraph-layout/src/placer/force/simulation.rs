use super::forces::{Body, Force, ForceKind};
use crate::config::ForceConfig;
use crate::model::NodeId;
use crate::placer::Positions;
use crate::{LayoutError, Point, Vec2};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Alpha target held while a node is being dragged
const DRAG_ALPHA_TARGET: f32 = 0.3;

/// Step-by-step force relaxation
///
/// Each [`tick`](Simulation::tick) sums the velocity changes of every force,
/// damps the velocities and moves the bodies by one explicit Euler step.
/// The step size `alpha` decays towards its target on every tick and the
/// simulation is considered settled once it falls below `alpha_min`.
///
/// The caller owns the loop: nothing runs between two calls, so positions
/// may be pinned or released at any time.
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    index: HashMap<NodeId, usize>,
    forces: Vec<ForceKind>,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    alpha_min: f32,
    velocity_decay: f32,
    ticks: usize,
    max_ticks: usize,
}

impl Simulation {
    pub(crate) fn new(bodies: Vec<Body>, forces: Vec<ForceKind>, config: &ForceConfig) -> Self {
        let index = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (body.id, i))
            .collect();

        Self {
            bodies,
            index,
            forces,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: config.alpha_decay,
            alpha_min: config.alpha_min,
            velocity_decay: config.velocity_decay,
            ticks: 0,
            max_ticks: config.max_ticks,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Ticks performed since the simulation was last (re)started
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Whether further ticks move anything
    ///
    /// The tick budget does not apply while a node is pinned, so the graph
    /// keeps reacting for as long as a drag lasts.
    pub fn is_running(&self) -> bool {
        self.alpha >= self.alpha_min && (self.ticks < self.max_ticks || self.is_dragging())
    }

    /// Whether any node is pinned
    pub fn is_dragging(&self) -> bool {
        self.bodies.iter().any(|body| body.pinned.is_some())
    }

    /// Advance by one step, returns whether the simulation is still running
    ///
    /// Does nothing once the simulation has settled.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let mut impulses = vec![Vec2::zero(); self.bodies.len()];
        for force in &self.forces {
            force.apply(&self.bodies, self.alpha, &mut impulses);
        }

        let damping = 1.0 - self.velocity_decay;
        for (body, impulse) in self.bodies.iter_mut().zip(impulses) {
            if let Some(pinned) = body.pinned {
                body.position = pinned;
                body.velocity = Vec2::zero();
                continue;
            }

            body.velocity = (body.velocity + impulse) * damping;
            body.position = body.position + body.velocity;

            if !body.position.is_finite() || !body.velocity.is_finite() {
                warn!("Node {} left the canvas, resetting it", body.id);
                body.position = body.seed;
                body.velocity = Vec2::zero();
            }
        }

        self.ticks += 1;
        self.is_running()
    }

    /// Tick until the simulation settles, returns the number of ticks
    pub fn run(&mut self) -> usize {
        let start = self.ticks;
        while self.tick() {}
        debug!(
            "Simulation settled after {} ticks, alpha {}",
            self.ticks - start,
            self.alpha
        );
        self.ticks - start
    }

    /// Hold a node at `at`, e.g. while it is dragged, and wake the simulation
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownNode`] if the node is not simulated
    pub fn pin(&mut self, node: NodeId, at: Point) -> Result<(), LayoutError> {
        let body = self.body_mut(node)?;
        body.pinned = Some(at);
        body.position = at;
        body.velocity = Vec2::zero();

        self.alpha_target = DRAG_ALPHA_TARGET;
        self.restart();
        Ok(())
    }

    /// Let a pinned node move freely again
    ///
    /// Once no node is pinned the simulation cools down to rest, with a
    /// fresh tick budget.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownNode`] if the node is not simulated
    pub fn release(&mut self, node: NodeId) -> Result<(), LayoutError> {
        self.body_mut(node)?.pinned = None;
        if !self.is_dragging() {
            self.alpha_target = 0.0;
            self.restart();
        }
        Ok(())
    }

    /// Make the simulation run again, keeping the current positions
    pub fn restart(&mut self) {
        self.alpha = self.alpha.max(self.alpha_min).max(self.alpha_target);
        self.ticks = 0;
    }

    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.index.get(&node).map(|&i| self.bodies[i].position)
    }

    pub fn positions(&self) -> Positions {
        self.bodies
            .iter()
            .map(|body| (body.id, body.position))
            .collect()
    }

    fn body_mut(&mut self, node: NodeId) -> Result<&mut Body, LayoutError> {
        let i = *self.index.get(&node).ok_or(LayoutError::UnknownNode(node))?;
        Ok(&mut self.bodies[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placer::force::forces::{Collision, PullX};
    use test_log::test;

    fn simulation(points: &[(f32, f32)], forces: Vec<ForceKind>, config: &ForceConfig) -> Simulation {
        let bodies = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Body::new(i as NodeId, Point::new(x, y)))
            .collect();
        Simulation::new(bodies, forces, config)
    }

    #[test]
    fn alpha_decays_until_settled() {
        let config = ForceConfig::default();
        let mut sim = simulation(&[(0.0, 0.0)], Vec::new(), &config);

        let ticks = sim.run();

        assert!(ticks > 600 && ticks < config.max_ticks, "took {ticks} ticks");
        assert!(sim.alpha() < config.alpha_min);
        assert!(!sim.tick());
        assert_eq!(sim.ticks(), ticks);
    }

    #[test]
    fn tick_budget_is_a_hard_stop() {
        let config = ForceConfig {
            max_ticks: 10,
            ..Default::default()
        };
        let mut sim = simulation(&[(0.0, 0.0)], Vec::new(), &config);

        assert_eq!(sim.run(), 10);
        assert!(!sim.is_running());
    }

    #[test]
    fn pull_moves_free_bodies_only() {
        let config = ForceConfig::default();
        let pull = ForceKind::from(PullX {
            targets: vec![100.0, 100.0],
            strength: 1.0,
        });
        let mut sim = simulation(&[(0.0, 0.0), (0.0, 50.0)], vec![pull], &config);
        sim.pin(1, Point::new(-20.0, 40.0)).unwrap();

        for _ in 0..200 {
            sim.tick();
        }

        let free = sim.position(0).unwrap();
        assert!((free.x - 100.0).abs() < 1.0, "free body at {free:?}");
        assert_eq!(sim.position(1), Some(Point::new(-20.0, 40.0)));
    }

    #[test]
    fn pinning_reheats_and_release_cools_down() {
        let config = ForceConfig::default();
        let mut sim = simulation(&[(0.0, 0.0), (10.0, 0.0)], Vec::new(), &config);
        sim.run();
        assert!(!sim.is_running());

        sim.pin(0, Point::new(5.0, 5.0)).unwrap();
        assert!(sim.is_running());
        for _ in 0..50 {
            assert!(sim.tick());
        }
        assert!(sim.alpha() > 0.2);

        sim.release(0).unwrap();
        sim.run();
        assert!(!sim.is_running());
    }

    #[test]
    fn long_drags_outlast_the_tick_budget() {
        let config = ForceConfig {
            max_ticks: 10,
            ..Default::default()
        };
        let pull = ForceKind::from(PullX {
            targets: vec![0.0, 300.0],
            strength: 1.0,
        });
        let mut sim = simulation(&[(0.0, 0.0), (0.0, 50.0)], vec![pull], &config);

        sim.pin(0, Point::new(10.0, 10.0)).unwrap();
        for _ in 0..25 {
            assert!(sim.tick());
        }
        assert!(sim.ticks() > config.max_ticks);

        sim.pin(0, Point::new(100.0, 2000.0)).unwrap();
        let before = sim.position(1).unwrap();
        assert!(sim.tick());
        assert_ne!(sim.position(1), Some(before));
        assert_eq!(sim.position(0), Some(Point::new(100.0, 2000.0)));

        sim.release(0).unwrap();
        assert!(!sim.is_dragging());
        assert_eq!(sim.run(), config.max_ticks);
        assert!(!sim.is_running());
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut sim = simulation(&[(0.0, 0.0)], Vec::new(), &ForceConfig::default());

        assert_eq!(
            sim.pin(7, Point::new(0.0, 0.0)),
            Err(LayoutError::UnknownNode(7))
        );
        assert_eq!(sim.release(7), Err(LayoutError::UnknownNode(7)));
    }

    #[test]
    fn overlapping_bodies_end_apart() {
        let config = ForceConfig::default();
        let collision = ForceKind::from(Collision {
            radius: 20.0,
            strength: 1.0,
        });
        let mut sim = simulation(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0)], vec![collision], &config);
        sim.run();

        let positions = sim.positions();
        for a in 0..3 {
            for b in (a + 1)..3 {
                let distance = (positions[&a] - positions[&b]).length();
                assert!(distance > 30.0, "{a} and {b} only {distance} apart");
                assert!(positions[&a].is_finite());
            }
        }
    }
}
