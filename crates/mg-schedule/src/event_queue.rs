//! `EventQueue` — agents ordered by the time of their next target.
//!
//! # Layout
//!
//! A `BTreeSet` of `(time, agent)` keys gives O(log n) insert, erase and
//! minimum.  A dense `Vec` of slots indexed by `AgentId` remembers each
//! agent's current key, so an update removes exactly the stale key instead
//! of searching for it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use mg_core::AgentId;

use crate::{ScheduleError, ScheduleResult};

/// What the queue needs to know about an agent.
pub trait Scheduled {
    fn id(&self) -> AgentId;

    /// Time of the next event, `None` if the agent has nothing left to do.
    fn next_event_time(&self) -> Option<f64>;

    /// Counter bumped on every change that may move the agent in the queue.
    fn version(&self) -> u64;
}

#[derive(Copy, Clone, Debug)]
struct EventKey {
    time: f64,
    agent: AgentId,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.total_cmp(&other.time).then(self.agent.cmp(&other.agent))
    }
}

#[derive(Copy, Clone, Debug)]
struct Slot {
    key: EventKey,
    version: u64,
}

#[derive(Default)]
pub struct EventQueue {
    inner: BTreeSet<EventKey>,
    slots: Vec<Option<Slot>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every agent that has a next event.
    pub fn initialize<A: Scheduled>(agents: &[A]) -> Self {
        let mut queue = Self { inner: BTreeSet::new(), slots: vec![None; agents.len()] };
        for agent in agents {
            queue.update(agent);
        }
        queue
    }

    /// Re-sync `agent`'s position.  Agents without a next event leave the queue.
    pub fn update<A: Scheduled>(&mut self, agent: &A) {
        let id = agent.id();
        self.erase(id);
        let Some(time) = agent.next_event_time() else {
            return;
        };
        if self.slots.len() <= id.index() {
            self.slots.resize(id.index() + 1, None);
        }
        let key = EventKey { time, agent: id };
        self.inner.insert(key);
        self.slots[id.index()] = Some(Slot { key, version: agent.version() });
    }

    /// Remove `agent` from the queue.  Returns `false` if it was not queued.
    pub fn erase(&mut self, agent: AgentId) -> bool {
        match self.slots.get_mut(agent.index()).and_then(Option::take) {
            Some(slot) => {
                self.inner.remove(&slot.key);
                true
            }
            None => false,
        }
    }

    /// The agent with the earliest event and its time.
    pub fn top(&self) -> Option<(AgentId, f64)> {
        self.inner.first().map(|k| (k.agent, k.time))
    }

    /// [`top`](Self::top), after checking the agent did not change unseen.
    pub fn top_checked<A: Scheduled>(&self, agents: &[A]) -> ScheduleResult<Option<AgentId>> {
        let Some(key) = self.inner.first() else {
            return Ok(None);
        };
        self.check(key.agent, agents)?;
        Ok(Some(key.agent))
    }

    /// Check every queued agent against `agents`.
    pub fn check_all<A: Scheduled>(&self, agents: &[A]) -> ScheduleResult<()> {
        self.inner.iter().try_for_each(|k| self.check(k.agent, agents))
    }

    fn check<A: Scheduled>(&self, id: AgentId, agents: &[A]) -> ScheduleResult<()> {
        let agent = agents.get(id.index()).ok_or(ScheduleError::UnknownAgent(id))?;
        let slot = self.slots[id.index()].ok_or(ScheduleError::UnknownAgent(id))?;
        if slot.version != agent.version() {
            return Err(ScheduleError::Stale {
                agent: id,
                queued: slot.version,
                current: agent.version(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.slots.get(agent.index()).is_some_and(Option::is_some)
    }

    /// Queued time of `agent`.
    pub fn time_of(&self, agent: AgentId) -> Option<f64> {
        self.slots.get(agent.index()).copied().flatten().map(|s| s.key.time)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Queued agents in event order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, f64)> + '_ {
        self.inner.iter().map(|k| (k.agent, k.time))
    }
}
