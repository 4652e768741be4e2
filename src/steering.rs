//! Pairwise repulsion between agents and the relaxation loop that spreads
//! city sites apart.

use glam::DVec2;

use crate::agent::{Agent, City};

/// Passes made over the city list during relaxation. There is no convergence
/// check; the loop always runs this many times.
pub const RELAXATION_ITERATIONS: usize = 500;

/// Longest step an agent may take in one relaxation pass.
pub const MAX_STEERING_FORCE: f64 = 15.0;

/// Fraction of the map kept free on every side while relaxing.
const BORDER_FRACTION: f64 = 0.1;

/// Sum of repulsion vectors pushing `agent` away from every overlapping agent.
///
/// A neighbour at distance `d` with combined radius `r` contributes a vector
/// of length `max_force * (1 - d / r)` pointing from it towards `agent`. The
/// agent itself is skipped by id. The sum is not clamped and can exceed
/// `max_force` when several neighbours overlap.
pub fn object_avoidance<A: AsRef<Agent>>(agent: &Agent, max_force: f64, agents: &[A]) -> DVec2 {
    let mut force = DVec2::ZERO;
    for other in agents {
        let other: &Agent = other.as_ref();
        if other.id() == agent.id() {
            continue;
        }

        let to_agent = agent.position() - other.position();
        let distance = to_agent.length();
        let contact = agent.radius() + other.radius();
        if distance < contact {
            let force_scale = 1.0 - distance / contact;
            // coincident centers have no direction to push along
            force += to_agent.normalize_or_zero() * (max_force * force_scale);
        }
    }
    force
}

/// Axis-aligned rectangle agents are confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// The area inside a `width x height` map minus a 10% border, with the far
    /// edges pulled in by one cell.
    pub fn inset(width: f64, height: f64) -> Self {
        Bounds {
            min: DVec2::new(width * BORDER_FRACTION, height * BORDER_FRACTION),
            max: DVec2::new(
                width * (1.0 - BORDER_FRACTION) - 1.0,
                height * (1.0 - BORDER_FRACTION) - 1.0,
            ),
        }
    }

    /// Clamps each axis independently. The upper edge wins when the rectangle
    /// is inverted, so this never panics the way `f64::clamp` would.
    pub fn confine(&self, position: DVec2) -> DVec2 {
        DVec2::new(
            position.x.max(self.min.x).min(self.max.x),
            position.y.max(self.min.y).min(self.max.y),
        )
    }
}

/// Pushes cities apart in place for [`RELAXATION_ITERATIONS`] passes.
pub fn relax(cities: &mut [City], bounds: Bounds) {
    for _ in 0..RELAXATION_ITERATIONS {
        relax_pass(cities, bounds);
    }
}

/// Moves every city once, by at most [`MAX_STEERING_FORCE`].
///
/// Cities move one at a time in list order, so later cities in a pass already
/// see the moved positions of earlier ones.
pub fn relax_pass(cities: &mut [City], bounds: Bounds) {
    for index in 0..cities.len() {
        let force = object_avoidance(cities[index].agent(), MAX_STEERING_FORCE, &cities[..])
            .clamp_length_max(MAX_STEERING_FORCE);
        let city = &mut cities[index];
        let moved = city.position() + force;
        city.set_position(bounds.confine(moved));
    }
}
