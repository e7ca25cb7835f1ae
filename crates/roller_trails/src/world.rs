//! RollerWorld - per-surface orchestrator.
//!
//! A world owns the indexed surface, both solvers, the rope pool and every
//! registered agent. One [`RollerWorld::advance`] call is one simulation
//! step: agents update, pending query slots are resolved in a single solver
//! pass, and each resolved sample extends the agent's current rope. A rope
//! that fills up is continued in a fresh pool entry joined to its tail.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use tracing::{debug, info};
use web_time::Instant;

use crate::constants::{DEFAULT_INITIAL_POINT, POOL_SIZE};
use crate::error::{EngineError, EngineResult};
use crate::metrics::{SolverDiagnostics, SolverMetrics};
use crate::octree::{Octree, OctreeConfig, OctreeStats};
use crate::pool::{RopeId, RopePool};
use crate::rope::{Crossing, PushOutcome, Rope, RopeConfig};
use crate::solver::{
    BruteForceSolver, FaceResult, OctreeSolver, QuerySlot, SolverMode, SurfaceAgent, SurfaceSolver,
};
use crate::types::{Color, LinePoint, SurfaceMesh};

// =============================================================================
// AgentId - unique identifier
// =============================================================================

/// Atomic counter for generating unique AgentIds.
static AGENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque agent identifier.
///
/// Generated atomically - unique within process lifetime, so ids from before
/// a [`RollerWorld::reset`] never alias new agents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AgentId(u64);

impl AgentId {
    fn next() -> Self {
        Self(AGENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

// =============================================================================
// WorldConfig
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Ropes shared by all agents. The pool never grows.
    pub pool_size: usize,
    pub rope: RopeConfig,
    pub octree: OctreeConfig,
    pub solver_mode: SolverMode,

    /// Results farther than this from their query stay unresolved.
    pub max_distance: f32,

    /// Spawn rays are cast toward this point in octree mode.
    pub surface_origin: Vec3,

    /// Initial query point for agents registered without one.
    pub default_initial: Vec3,

    /// Period of [`SolverDiagnostics`] reports.
    pub diagnostics_interval: Duration,
}

impl WorldConfig {
    pub const DEFAULT: Self = Self {
        pool_size: POOL_SIZE,
        rope: RopeConfig::DEFAULT,
        octree: OctreeConfig::DEFAULT,
        solver_mode: SolverMode::BruteForce,
        max_distance: f32::INFINITY,
        surface_origin: Vec3::ZERO,
        default_initial: DEFAULT_INITIAL_POINT,
        diagnostics_interval: Duration::from_secs(1),
    };

    pub fn new() -> Self {
        Self::DEFAULT
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_rope(mut self, rope: RopeConfig) -> Self {
        self.rope = rope;
        self
    }

    pub fn with_octree(mut self, octree: OctreeConfig) -> Self {
        self.octree = octree;
        self
    }

    pub fn with_solver_mode(mut self, solver_mode: SolverMode) -> Self {
        self.solver_mode = solver_mode;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_surface_origin(mut self, surface_origin: Vec3) -> Self {
        self.surface_origin = surface_origin;
        self
    }

    pub fn with_default_initial(mut self, default_initial: Vec3) -> Self {
        self.default_initial = default_initial;
        self
    }

    pub fn with_diagnostics_interval(mut self, diagnostics_interval: Duration) -> Self {
        self.diagnostics_interval = diagnostics_interval;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// RollerWorld<A>
// =============================================================================

/// Called with the agent and crossing whenever a new segment crosses a trail.
pub type CrossingCallback = Box<dyn FnMut(AgentId, &Crossing)>;

/// Called with each periodic solver report.
pub type DiagnosticsCallback = Box<dyn FnMut(&SolverDiagnostics)>;

/// Counts for one [`RollerWorld::advance`] step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Slots submitted to the solver.
    pub pending: usize,
    /// Slots that came back with a face.
    pub resolved: usize,
    /// Ropes continued into a fresh pool entry.
    pub handoffs: usize,
    pub crossings: usize,
}

struct AgentEntry<A> {
    id: AgentId,
    agent: A,
    color: Color,
    initial: Vec3,
    /// Ropes in trail order; the last one is current.
    ropes: Vec<RopeId>,
}

struct IndexedSurface {
    mesh: Arc<SurfaceMesh>,
    brute_force: BruteForceSolver,
    octree: OctreeSolver,
}

/// Orchestrator generic over the agent type.
///
/// Use `Box<dyn SurfaceAgent>` for mixed agent kinds.
pub struct RollerWorld<A: SurfaceAgent> {
    config: WorldConfig,
    surface: Option<IndexedSurface>,
    pool: RopePool,
    agents: Vec<AgentEntry<A>>,

    // Per-step scratch, parallel to `agents`.
    slots: Vec<QuerySlot>,
    results: Vec<FaceResult>,

    crossings: Vec<(AgentId, Crossing)>,
    on_crossing: Option<CrossingCallback>,
    on_diagnostics: Option<DiagnosticsCallback>,

    metrics: SolverMetrics,
    window_start: Instant,
    window_solver_time: Duration,
}

impl<A: SurfaceAgent> RollerWorld<A> {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            surface: None,
            pool: RopePool::new(config.pool_size, config.rope),
            agents: Vec::new(),
            slots: Vec::new(),
            results: Vec::new(),
            crossings: Vec::new(),
            on_crossing: None,
            on_diagnostics: None,
            metrics: SolverMetrics::new(),
            window_start: Instant::now(),
            window_solver_time: Duration::ZERO,
        }
    }

    // =========================================================================
    // Surface and agents
    // =========================================================================

    /// Index `mesh` for both solvers. Any previous surface, agent and trail
    /// is discarded.
    pub fn index_surface(&mut self, mesh: SurfaceMesh) -> OctreeStats {
        let mesh = Arc::new(mesh);
        let octree = Octree::build(Arc::clone(&mesh), &self.config.octree);
        let stats = octree.stats();

        self.surface = Some(IndexedSurface {
            brute_force: BruteForceSolver::new(Arc::clone(&mesh))
                .with_max_distance(self.config.max_distance),
            octree: OctreeSolver::new(octree).with_max_distance(self.config.max_distance),
            mesh,
        });
        self.reset();

        info!(
            faces = stats.triangles,
            nodes = stats.nodes,
            depth = stats.depth,
            "surface indexed"
        );
        stats
    }

    /// Register `agent` with its own trail color. Its query slot is parked at
    /// `initial`, or [`WorldConfig::default_initial`].
    ///
    /// Fails without side effects when no surface is indexed, when the agent
    /// exposes no query slot, or when the pool has no free rope.
    pub fn register_agent(
        &mut self,
        mut agent: A,
        color: Color,
        initial: Option<Vec3>,
    ) -> EngineResult<AgentId> {
        if self.surface.is_none() {
            return Err(EngineError::SurfaceNotIndexed);
        }

        let id = AgentId::next();
        if agent.query_slot().is_none() {
            return Err(EngineError::MissingQuerySlot(id));
        }

        let rope = self.pool.acquire()?;
        self.pool.rope_mut(rope)?.set_color(color);

        let initial = initial.unwrap_or(self.config.default_initial);
        if let Some(slot) = agent.query_slot_mut() {
            *slot = QuerySlot::idle(initial);
        }

        self.agents.push(AgentEntry {
            id,
            agent,
            color,
            initial,
            ropes: vec![rope],
        });

        debug!(agent = id.raw(), rope = rope.raw(), "agent registered");
        Ok(id)
    }

    /// Place every agent on the surface from its initial point.
    ///
    /// In octree mode a ray is cast toward [`WorldConfig::surface_origin`];
    /// otherwise the nearest point is used. A placed agent's landing point
    /// starts its trail. Agents whose spawn misses keep a pending slot.
    /// Returns the number of agents placed.
    pub fn spawn(&mut self) -> EngineResult<usize> {
        if self.surface.is_none() {
            return Err(EngineError::SurfaceNotIndexed);
        }
        if let Some(entry) = self.agents.iter().find(|e| e.agent.query_slot().is_none()) {
            return Err(EngineError::MissingQuerySlot(entry.id));
        }

        self.slots.clear();
        for entry in &mut self.agents {
            let slot = entry
                .agent
                .query_slot_mut()
                .ok_or(EngineError::MissingQuerySlot(entry.id))?;
            slot.request(entry.initial);
            self.slots.push(*slot);
        }

        let surface = self.surface.as_mut().ok_or(EngineError::SurfaceNotIndexed)?;
        let results = match self.config.solver_mode {
            SolverMode::Octree => surface
                .octree
                .resolve_rays(&self.slots, self.config.surface_origin),
            SolverMode::BruteForce => surface.brute_force.resolve(&self.slots),
        };
        self.results.clear();
        self.results.extend_from_slice(results);

        let mut placed = 0;
        let mut first_error = None;
        for index in 0..self.agents.len() {
            let result = self.results[index];
            if !result.is_resolved() {
                continue;
            }

            let entry = &mut self.agents[index];
            entry.agent.on_query_resolved(&result);
            if let Some(slot) = entry.agent.query_slot_mut() {
                slot.skip = true;
            }
            placed += 1;

            if let Err(err) = self.extend_trail(index, result.line_point()) {
                first_error.get_or_insert(err);
            }
        }

        debug!(agents = self.agents.len(), placed, "agents spawned");
        match first_error {
            Some(err) => Err(err),
            None => Ok(placed),
        }
    }

    // =========================================================================
    // Step
    // =========================================================================

    /// One simulation step. `delta` is in milliseconds and is passed to every
    /// agent's update before queries are gathered.
    ///
    /// A trail failure for one agent does not stop the others: every resolved
    /// agent is placed and the first error is returned after the step.
    #[tracing::instrument(skip_all, name = "world::advance")]
    pub fn advance(&mut self, delta: f32) -> EngineResult<StepReport> {
        if self.surface.is_none() {
            return Err(EngineError::SurfaceNotIndexed);
        }
        if let Some(entry) = self.agents.iter().find(|e| e.agent.query_slot().is_none()) {
            return Err(EngineError::MissingQuerySlot(entry.id));
        }

        for entry in &mut self.agents {
            entry.agent.update(delta);
        }

        self.slots.clear();
        for entry in &self.agents {
            let slot = entry
                .agent
                .query_slot()
                .ok_or(EngineError::MissingQuerySlot(entry.id))?;
            self.slots.push(*slot);
        }

        let mut report = StepReport {
            pending: self.slots.iter().filter(|s| s.is_pending()).count(),
            ..StepReport::default()
        };

        let elapsed = self.solve()?;

        let mut first_error = None;
        for index in 0..self.agents.len() {
            let result = self.results[index];
            if !self.slots[index].is_pending() || !result.is_resolved() {
                continue;
            }
            report.resolved += 1;

            let entry = &mut self.agents[index];
            entry.agent.on_query_resolved(&result);
            if let Some(slot) = entry.agent.query_slot_mut() {
                slot.skip = true;
            }

            match self.extend_trail(index, result.line_point()) {
                Ok((handoffs, crossing)) => {
                    report.handoffs += handoffs;
                    report.crossings += usize::from(crossing);
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        self.metrics.record_solve(
            elapsed.as_micros() as u64,
            report.resolved,
            report.pending - report.resolved,
        );
        self.report_diagnostics(elapsed);

        match first_error {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    /// Run the active solver over `slots` into `results`.
    fn solve(&mut self) -> EngineResult<Duration> {
        let surface = self.surface.as_mut().ok_or(EngineError::SurfaceNotIndexed)?;

        let start = Instant::now();
        let results = match self.config.solver_mode {
            SolverMode::BruteForce => surface.brute_force.resolve(&self.slots),
            SolverMode::Octree => surface.octree.resolve(&self.slots),
        };
        let elapsed = start.elapsed();

        self.results.clear();
        self.results.extend_from_slice(results);
        Ok(elapsed)
    }

    /// Push `sample` into the agent's current rope, check the new segment for
    /// crossings and hand off to a fresh rope once it closes. Returns the
    /// number of hand-offs and whether the new segment crossed a trail.
    fn extend_trail(&mut self, index: usize, sample: LinePoint) -> EngineResult<(usize, bool)> {
        let Some(&last) = self.agents[index].ropes.last() else {
            return Ok((0, false));
        };

        // A hand-off that failed on an earlier step is retried first.
        let mut handoffs = 0;
        let current = if self.pool.rope(last)?.is_closed() {
            handoffs += 1;
            self.hand_off(index, last)?
        } else {
            last
        };

        let rope = self.pool.rope_mut(current)?;
        let outcome = rope.push_point(sample.position, sample.normal, true)?;
        rope.rebuild(false);

        let mut crossed = false;
        if outcome == PushOutcome::Appended {
            if let Some(crossing) = self.pool.detect_crossing(current)? {
                crossed = true;
                let agent = self.agents[index].id;
                debug!(
                    agent = agent.raw(),
                    rope = current.raw(),
                    crossed_rope = crossing.b.rope.raw(),
                    segment = crossing.b.id,
                    "trail crossing"
                );
                self.metrics.record_crossing();
                if let Some(callback) = self.on_crossing.as_mut() {
                    callback(agent, &crossing);
                }
                self.crossings.push((agent, crossing));
            }
        }

        if self.pool.rope(current)?.is_closed() {
            self.hand_off(index, current)?;
            handoffs += 1;
        }
        Ok((handoffs, crossed))
    }

    /// Join a fresh rope to the agent's closed `current` rope and make it the
    /// agent's current one.
    fn hand_off(&mut self, index: usize, current: RopeId) -> EngineResult<RopeId> {
        let next = self.pool.acquire()?;
        self.pool.join(next, current)?;

        let entry = &mut self.agents[index];
        let next_rope = self.pool.rope_mut(next)?;
        next_rope.set_color(entry.color);
        next_rope.rebuild(false);
        entry.ropes.push(next);
        self.metrics.record_handoff();

        debug!(
            agent = entry.id.raw(),
            from = current.raw(),
            to = next.raw(),
            "rope handed off"
        );
        Ok(next)
    }

    fn report_diagnostics(&mut self, elapsed: Duration) {
        self.window_solver_time += elapsed;

        let window = self.window_start.elapsed();
        if window < self.config.diagnostics_interval {
            return;
        }

        let report = SolverDiagnostics::new(self.config.solver_mode, self.window_solver_time, window);
        debug!(
            mode = %report.mode,
            solver_us = report.solver_time.as_micros() as u64,
            share_percent = report.share_percent,
            "solver diagnostics"
        );
        if let Some(callback) = self.on_diagnostics.as_mut() {
            callback(&report);
        }

        self.window_start = Instant::now();
        self.window_solver_time = Duration::ZERO;
    }

    /// Release every rope, drop every agent and clear queued crossings. The
    /// indexed surface is kept.
    pub fn reset(&mut self) {
        self.pool.release_all();
        self.agents.clear();
        self.slots.clear();
        self.results.clear();
        self.crossings.clear();
        self.metrics.reset();
        self.window_start = Instant::now();
        self.window_solver_time = Duration::ZERO;
    }

    // =========================================================================
    // Settings and callbacks
    // =========================================================================

    pub fn set_solver_mode(&mut self, mode: SolverMode) {
        if mode != self.config.solver_mode {
            debug!(from = %self.config.solver_mode, to = %mode, "solver mode changed");
            self.config.solver_mode = mode;
        }
    }

    #[inline]
    pub fn solver_mode(&self) -> SolverMode {
        self.config.solver_mode
    }

    pub fn set_crossing_callback(&mut self, callback: impl FnMut(AgentId, &Crossing) + 'static) {
        self.on_crossing = Some(Box::new(callback));
    }

    pub fn set_diagnostics_callback(
        &mut self,
        callback: impl FnMut(&SolverDiagnostics) + 'static,
    ) {
        self.on_diagnostics = Some(Box::new(callback));
    }

    /// Take every crossing found since the last drain, oldest first.
    pub fn drain_crossings(&mut self) -> Vec<(AgentId, Crossing)> {
        std::mem::take(&mut self.crossings)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    fn entry(&self, id: AgentId) -> EngineResult<&AgentEntry<A>> {
        self.agents
            .iter()
            .find(|e| e.id == id)
            .ok_or(EngineError::UnknownAgent(id))
    }

    pub fn agent(&self, id: AgentId) -> EngineResult<&A> {
        self.entry(id).map(|e| &e.agent)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> EngineResult<&mut A> {
        self.agents
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.agent)
            .ok_or(EngineError::UnknownAgent(id))
    }

    /// Registered agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &A)> + '_ {
        self.agents.iter().map(|e| (e.id, &e.agent))
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Every rope of an agent's trail, oldest first.
    pub fn ropes_of(&self, id: AgentId) -> EngineResult<&[RopeId]> {
        self.entry(id).map(|e| e.ropes.as_slice())
    }

    pub fn current_rope(&self, id: AgentId) -> EngineResult<&Rope> {
        let entry = self.entry(id)?;
        let current = entry.ropes.last().ok_or(EngineError::UnknownAgent(id))?;
        self.pool.rope(*current)
    }

    pub fn rope(&self, id: RopeId) -> EngineResult<&Rope> {
        self.pool.rope(id)
    }

    #[inline]
    pub fn pool(&self) -> &RopePool {
        &self.pool
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface_mesh(&self) -> Option<&Arc<SurfaceMesh>> {
        self.surface.as_ref().map(|s| &s.mesh)
    }

    pub fn octree(&self) -> Option<&Octree> {
        self.surface.as_ref().map(|s| s.octree.octree())
    }

    #[inline]
    pub fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;
