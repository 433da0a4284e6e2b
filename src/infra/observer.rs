use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::infra::Action;
use crate::planners::astar::PlanReport;
use crate::state::KinematicState;

/// Hooks invoked by the planner and the transition model at fixed points of a
/// planning call. Every method defaults to doing nothing.
pub trait PlannerObserver {
    /// Called once before the root node is queued
    fn on_plan_start(&mut self, _start: &KinematicState) {}

    /// Called for every node that passes the stale/step checks and gets expanded
    fn on_node_expanded(&mut self, _index: usize, _state: &KinematicState, _g: f32, _f: f32) {}

    /// Called for every simulated edge; `to` is `None` when the action is invalid
    fn on_transition(
        &mut self,
        _from: &KinematicState,
        _action: Action,
        _to: Option<&KinematicState>,
    ) {
    }

    /// Called when a simulated trajectory lands on a hazard and removes it
    fn on_hazard_defeated(&mut self, _row: i32, _col: i32) {}

    /// Called once with the terminal outcome of the call
    fn on_plan_finished(&mut self, _report: &PlanReport) {}
}

pub struct NoopObserver;

impl PlannerObserver for NoopObserver {}

/// Forwards planner events to `tracing`.
pub struct TracingObserver;

impl PlannerObserver for TracingObserver {
    fn on_plan_start(&mut self, start: &KinematicState) {
        debug!(row = start.row, col = start.col, grounded = start.grounded, "Planning from state");
    }

    fn on_node_expanded(&mut self, index: usize, state: &KinematicState, g: f32, f: f32) {
        trace!(node = index, row = state.row, col = state.col, g = g, f = f, "Expanding node");
    }

    fn on_transition(&mut self, from: &KinematicState, action: Action, to: Option<&KinematicState>) {
        match to {
            Some(next) => trace!(
                action = %action,
                from = ?(from.row, from.col),
                to = ?(next.row, next.col),
                grounded = next.grounded,
                "Transition"
            ),
            None => trace!(action = %action, from = ?(from.row, from.col), "Transition invalid"),
        }
    }

    fn on_hazard_defeated(&mut self, row: i32, col: i32) {
        debug!(row = row, col = col, "Hazard defeated");
    }

    fn on_plan_finished(&mut self, report: &PlanReport) {
        debug!(
            action = %report.action,
            outcome = ?report.outcome,
            expansions = report.expansions,
            nodes = report.nodes_created,
            "Plan finished"
        );
    }
}

pub struct CompositeObserver {
    observers: Vec<Box<dyn PlannerObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn PlannerObserver>>) -> Self {
        Self { observers }
    }
}

impl PlannerObserver for CompositeObserver {
    fn on_plan_start(&mut self, start: &KinematicState) {
        for observer in &mut self.observers {
            observer.on_plan_start(start);
        }
    }

    fn on_node_expanded(&mut self, index: usize, state: &KinematicState, g: f32, f: f32) {
        for observer in &mut self.observers {
            observer.on_node_expanded(index, state, g, f);
        }
    }

    fn on_transition(&mut self, from: &KinematicState, action: Action, to: Option<&KinematicState>) {
        for observer in &mut self.observers {
            observer.on_transition(from, action, to);
        }
    }

    fn on_hazard_defeated(&mut self, row: i32, col: i32) {
        for observer in &mut self.observers {
            observer.on_hazard_defeated(row, col);
        }
    }

    fn on_plan_finished(&mut self, report: &PlanReport) {
        for observer in &mut self.observers {
            observer.on_plan_finished(report);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    Started(KinematicState),
    Expanded {
        index: usize,
        state: KinematicState,
        g: f32,
        f: f32,
    },
    Transition {
        from: KinematicState,
        action: Action,
        to: Option<KinematicState>,
    },
    HazardDefeated {
        row: i32,
        col: i32,
    },
    Finished(PlanReport),
}

/// Keeps every event in memory. Clones share the same event log, so one clone
/// can be handed to the planner and the other read afterwards.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<PlanEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlanEvent> {
        self.events.borrow().clone()
    }

    pub fn expanded_states(&self) -> Vec<KinematicState> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PlanEvent::Expanded { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn report(&self) -> Option<PlanReport> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            PlanEvent::Finished(report) => Some(report.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: PlanEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PlannerObserver for RecordingObserver {
    fn on_plan_start(&mut self, start: &KinematicState) {
        self.push(PlanEvent::Started(*start));
    }

    fn on_node_expanded(&mut self, index: usize, state: &KinematicState, g: f32, f: f32) {
        self.push(PlanEvent::Expanded {
            index,
            state: *state,
            g,
            f,
        });
    }

    fn on_transition(&mut self, from: &KinematicState, action: Action, to: Option<&KinematicState>) {
        self.push(PlanEvent::Transition {
            from: *from,
            action,
            to: to.copied(),
        });
    }

    fn on_hazard_defeated(&mut self, row: i32, col: i32) {
        self.push(PlanEvent::HazardDefeated { row, col });
    }

    fn on_plan_finished(&mut self, report: &PlanReport) {
        self.push(PlanEvent::Finished(report.clone()));
    }
}
