#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use tribe_core::{AgentId, AgentTick, BtStatus, TickReport};

/// One agent's result for one tick, recorded during simulation and rendered later by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub tag: Cow<'static, str>,
    pub note: Option<String>,
}

impl TraceEvent {
    pub fn new(tick: u64, agent: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            agent,
            tag: tag.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// `agent.tick.<status>`, or `agent.tick.error` carrying the error message as the note.
    pub fn from_agent_tick<A: AgentId>(tick: u64, agent_tick: &AgentTick<A>) -> Self {
        let agent = agent_tick.agent.stable_id();
        if let Some(err) = &agent_tick.error {
            return TraceEvent::new(tick, agent, "agent.tick.error").with_note(err.to_string());
        }
        let tag = match agent_tick.status {
            BtStatus::Success => "agent.tick.success",
            BtStatus::Failure => "agent.tick.failure",
            BtStatus::Running => "agent.tick.running",
            BtStatus::NotEvaluated => "agent.tick.not_evaluated",
        };
        TraceEvent {
            note: agent_tick.note.clone(),
            ..TraceEvent::new(tick, agent, tag)
        }
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn record_report<A: AgentId>(&mut self, report: &TickReport<A>) {
        emit_report(self, report);
    }

    pub fn for_agent(&self, agent: u64) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter().filter(move |e| e.agent == agent)
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Emit one event per agent in `report`, in report order.
pub fn emit_report<A: AgentId>(sink: &mut dyn TraceSink, report: &TickReport<A>) {
    for agent_tick in &report.agents {
        sink.emit(TraceEvent::from_agent_tick(report.tick, agent_tick));
    }
}
