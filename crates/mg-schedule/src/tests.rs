//! Unit tests for mg-schedule.

use mg_core::AgentId;

use crate::Scheduled;

struct Dummy {
    id: AgentId,
    next: Option<f64>,
    version: u64,
}

fn dummy(id: u32, next: Option<f64>) -> Dummy {
    Dummy { id: AgentId(id), next, version: 0 }
}

impl Scheduled for Dummy {
    fn id(&self) -> AgentId {
        self.id
    }
    fn next_event_time(&self) -> Option<f64> {
        self.next
    }
    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod event_queue {
    use super::*;
    use crate::{EventQueue, ScheduleError};

    #[test]
    fn orders_by_time_then_id() {
        let agents = vec![dummy(0, Some(2.0)), dummy(1, Some(1.0)), dummy(2, Some(1.0))];
        let q = EventQueue::initialize(&agents);
        assert_eq!(q.len(), 3);
        let order: Vec<AgentId> = q.iter().map(|(a, _)| a).collect();
        assert_eq!(order, vec![AgentId(1), AgentId(2), AgentId(0)]);
        assert_eq!(q.top(), Some((AgentId(1), 1.0)));
    }

    #[test]
    fn agents_without_events_are_skipped() {
        let agents = vec![dummy(0, None), dummy(1, Some(0.5))];
        let q = EventQueue::initialize(&agents);
        assert_eq!(q.len(), 1);
        assert!(!q.contains(AgentId(0)));
        assert!(q.contains(AgentId(1)));
    }

    #[test]
    fn update_moves_agent() {
        let mut agents = vec![dummy(0, Some(1.0)), dummy(1, Some(2.0))];
        let mut q = EventQueue::initialize(&agents);
        agents[0].next = Some(3.0);
        agents[0].version += 1;
        q.update(&agents[0]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.top(), Some((AgentId(1), 2.0)));
        assert_eq!(q.time_of(AgentId(0)), Some(3.0));
    }

    #[test]
    fn update_to_none_removes() {
        let mut agents = vec![dummy(0, Some(1.0))];
        let mut q = EventQueue::initialize(&agents);
        agents[0].next = None;
        q.update(&agents[0]);
        assert!(q.is_empty());
        assert_eq!(q.top(), None);
    }

    #[test]
    fn erase() {
        let agents = vec![dummy(0, Some(1.0)), dummy(1, Some(1.0))];
        let mut q = EventQueue::initialize(&agents);
        assert!(q.erase(AgentId(0)));
        assert!(!q.erase(AgentId(0)));
        assert_eq!(q.top(), Some((AgentId(1), 1.0)));
    }

    #[test]
    fn stale_agent_detected() {
        let mut agents = vec![dummy(0, Some(1.0))];
        let mut q = EventQueue::initialize(&agents);
        assert_eq!(q.top_checked(&agents).unwrap(), Some(AgentId(0)));

        agents[0].version += 1;
        assert!(matches!(
            q.top_checked(&agents),
            Err(ScheduleError::Stale { queued: 0, current: 1, .. })
        ));
        assert!(q.check_all(&agents).is_err());

        q.update(&agents[0]);
        assert!(q.check_all(&agents).is_ok());
    }

    #[test]
    fn empty_queue() {
        let agents: Vec<Dummy> = Vec::new();
        let q = EventQueue::initialize(&agents);
        assert!(q.is_empty());
        assert_eq!(q.top_checked(&agents).unwrap(), None);
    }
}
