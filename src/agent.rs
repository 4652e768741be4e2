use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Identity of an agent, unique among the agents issued by one [`IdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Hands out sequential agent ids, starting at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> AgentId {
        self.issued += 1;
        AgentId(self.issued)
    }
}

/// A circular body that takes part in steering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    position: DVec2,
    radius: f64,
}

impl Agent {
    pub fn new(id: AgentId, position: DVec2, radius: f64) -> Self {
        Agent { id, position, radius }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }
}

/// A city site: an agent whose footprint is fully claimed inside
/// `inner_radius` and fades out towards `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    agent: Agent,
    inner_radius: f64,
}

impl City {
    /// `inner_radius` is capped at `radius`.
    pub fn new(id: AgentId, position: DVec2, radius: f64, inner_radius: f64) -> Self {
        City {
            agent: Agent::new(id, position, radius),
            inner_radius: inner_radius.min(radius),
        }
    }

    pub fn id(&self) -> AgentId {
        self.agent.id
    }

    pub fn position(&self) -> DVec2 {
        self.agent.position
    }

    pub fn radius(&self) -> f64 {
        self.agent.radius
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.agent.set_position(position);
    }

    pub fn set_inner_radius(&mut self, inner_radius: f64) {
        self.inner_radius = inner_radius.min(self.agent.radius);
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

impl AsRef<Agent> for Agent {
    fn as_ref(&self) -> &Agent {
        self
    }
}

impl AsRef<Agent> for City {
    fn as_ref(&self) -> &Agent {
        &self.agent
    }
}
