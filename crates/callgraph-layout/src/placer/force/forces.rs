use crate::model::NodeId;
use crate::{Point, Vec2};
use enum_dispatch::enum_dispatch;

/// A node taking part in the relaxation
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Body {
    pub id: NodeId,
    pub position: Point,
    pub velocity: Vec2,
    /// Starting position, also the fallback when a step goes wrong
    pub seed: Point,
    /// Position held by an interactive drag
    pub pinned: Option<Point>,
}

impl Body {
    pub fn new(id: NodeId, seed: Point) -> Self {
        Self {
            id,
            position: seed,
            velocity: Vec2::zero(),
            seed,
            pinned: None,
        }
    }
}

/// A force acting on the bodies of a simulation
#[enum_dispatch]
pub(crate) trait Force {
    /// Add this force's velocity change for the current tick to `impulses`
    ///
    /// Reads the bodies as they were at the start of the tick.
    fn apply(&self, bodies: &[Body], alpha: f32, impulses: &mut [Vec2]);
}

#[enum_dispatch(Force)]
#[derive(Debug, Clone)]
pub(crate) enum ForceKind {
    Repulsion(Repulsion),
    Collision(Collision),
    Links(Links),
    PullX(PullX),
    PullY(PullY),
}

/// Vector from body `from` to body `to`, never zero
///
/// Coincident bodies get a small offset along a direction derived from
/// their indices, so that they separate the same way on every run.
fn separation(bodies: &[Body], from: usize, to: usize) -> Vec2 {
    let delta = bodies[to].position - bodies[from].position;
    if delta.x != 0.0 || delta.y != 0.0 {
        return delta;
    }

    let (low, high) = (from.min(to), from.max(to));
    let angle = (low * 31 + high) as f32 * 2.399_963;
    let offset = Vec2::new(angle.cos(), angle.sin()) * 1e-3;
    if from < to {
        offset
    } else {
        -offset
    }
}

/// Inverse distance repulsion between every pair of bodies within range
#[derive(Debug, Clone)]
pub(crate) struct Repulsion {
    pub strength: f32,
    pub range: f32,
}

impl Force for Repulsion {
    fn apply(&self, bodies: &[Body], alpha: f32, impulses: &mut [Vec2]) {
        let range2 = self.range * self.range;
        for (i, impulse) in impulses.iter_mut().enumerate() {
            for j in 0..bodies.len() {
                if i == j {
                    continue;
                }
                let delta = separation(bodies, i, j);
                let mut distance2 = delta.x * delta.x + delta.y * delta.y;
                if distance2 >= range2 {
                    continue;
                }
                // Soften very close pairs
                if distance2 < 1.0 {
                    distance2 = distance2.sqrt();
                }
                *impulse = *impulse - delta * (self.strength * alpha / distance2);
            }
        }
    }
}

/// Pushes overlapping bodies apart until their circles only touch
#[derive(Debug, Clone)]
pub(crate) struct Collision {
    pub radius: f32,
    pub strength: f32,
}

impl Force for Collision {
    fn apply(&self, bodies: &[Body], _alpha: f32, impulses: &mut [Vec2]) {
        let reach = 2.0 * self.radius;
        for (i, impulse) in impulses.iter_mut().enumerate() {
            for j in 0..bodies.len() {
                if i == j {
                    continue;
                }
                let delta = separation(bodies, j, i);
                let distance = delta.length();
                if distance >= reach {
                    continue;
                }
                // Each body of the pair covers half of the overlap
                let push = (reach - distance) / distance * self.strength * 0.5;
                *impulse = *impulse + delta * push;
            }
        }
    }
}

/// A spring between the two ends of a layout edge
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spring {
    pub source: usize,
    pub target: usize,
    pub distance: f32,
    pub strength: f32,
    /// Share of the correction taken by the target
    pub bias: f32,
}

impl Spring {
    /// Spring whose stiffness is shared according to the degree of its ends,
    /// so that hubs move less than leaves
    pub fn new(source: usize, target: usize, distance: f32, degrees: &[usize]) -> Self {
        let (source_degree, target_degree) = (degrees[source].max(1), degrees[target].max(1));
        Self {
            source,
            target,
            distance,
            strength: 1.0 / source_degree.min(target_degree) as f32,
            bias: source_degree as f32 / (source_degree + target_degree) as f32,
        }
    }
}

/// Keeps linked bodies at their springs' rest distance
#[derive(Debug, Clone)]
pub(crate) struct Links {
    pub springs: Vec<Spring>,
}

impl Force for Links {
    fn apply(&self, bodies: &[Body], alpha: f32, impulses: &mut [Vec2]) {
        for spring in &self.springs {
            if spring.source == spring.target {
                continue;
            }
            let (source, target) = (&bodies[spring.source], &bodies[spring.target]);
            let ahead_target = target.position + target.velocity;
            let ahead_source = source.position + source.velocity;
            let mut delta = ahead_target - ahead_source;
            if delta.x == 0.0 && delta.y == 0.0 {
                delta = separation(bodies, spring.source, spring.target);
            }
            let length = delta.length();
            let correction = delta * ((length - spring.distance) / length * alpha * spring.strength);

            impulses[spring.target] = impulses[spring.target] - correction * spring.bias;
            impulses[spring.source] = impulses[spring.source] + correction * (1.0 - spring.bias);
        }
    }
}

/// Pulls every body towards a fixed column
#[derive(Debug, Clone)]
pub(crate) struct PullX {
    pub targets: Vec<f32>,
    pub strength: f32,
}

impl Force for PullX {
    fn apply(&self, bodies: &[Body], alpha: f32, impulses: &mut [Vec2]) {
        for ((body, target), impulse) in bodies.iter().zip(&self.targets).zip(impulses) {
            impulse.x += (target - body.position.x) * self.strength * alpha;
        }
    }
}

/// Where a body is pulled vertically
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HeightTarget {
    Fixed(f32),
    /// Mean current height of the bodies at these indices
    Centroid(Vec<usize>),
}

/// Pulls callers towards the mean height of their callees and everything
/// else towards its level slot
#[derive(Debug, Clone)]
pub(crate) struct PullY {
    pub targets: Vec<HeightTarget>,
    pub strength: f32,
}

impl Force for PullY {
    fn apply(&self, bodies: &[Body], alpha: f32, impulses: &mut [Vec2]) {
        for ((body, target), impulse) in bodies.iter().zip(&self.targets).zip(impulses) {
            let target = match target {
                HeightTarget::Fixed(y) => *y,
                HeightTarget::Centroid(children) if !children.is_empty() => {
                    children.iter().map(|&c| bodies[c].position.y).sum::<f32>()
                        / children.len() as f32
                }
                HeightTarget::Centroid(_) => body.seed.y,
            };
            impulse.y += (target - body.position.y) * self.strength * alpha;
        }
    }
}
