use smallvec::SmallVec;

use crate::{
    problem::{node::NodeIdx, vehicle::VehicleIdx},
    solver::{
        guided_local_search::GuidedLocalSearch,
        ls::{
            exchange_unassigned::ExchangeUnassignedOperator,
            insert_unassigned::InsertUnassignedOperator, or_opt::OrOptOperator,
            relocate::RelocateOperator, swap::SwapOperator, two_opt::TwoOptOperator,
        },
        solution::{route::RouteSchedule, working_solution::WorkingSolution},
    },
};

/// A trip as it would look after a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub vehicle_id: VehicleIdx,
    pub nodes: Vec<NodeIdx>,
}

pub type RouteChanges = SmallVec<[RouteChange; 2]>;

pub trait LocalSearchOperator: Sized {
    fn generate_moves<F>(solution: &WorkingSolution, consumer: F)
    where
        F: FnMut(Self);

    fn route_changes(&self, solution: &WorkingSolution) -> RouteChanges;

    fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]>;

    /// Dropped delivery the move puts on a trip
    fn inserted_node(&self) -> Option<NodeIdx> {
        None
    }

    /// Served delivery the move drops
    fn removed_node(&self, _solution: &WorkingSolution) -> Option<NodeIdx> {
        None
    }

    /// Augmented delta of the move, `None` when it does not beat `threshold`
    /// or breaks a trip.
    fn evaluate(
        &self,
        solution: &WorkingSolution,
        gls: &GuidedLocalSearch,
        threshold: f64,
    ) -> Option<EvaluatedMove> {
        let model = solution.model();
        let changes = self.route_changes(solution);

        let mut delta = 0.0;
        for change in &changes {
            delta += gls.augmented_route_cost(model, &change.nodes)
                - gls.augmented_route_cost(model, solution.route(change.vehicle_id).nodes());
        }
        if let Some(node) = self.removed_node(solution) {
            delta += model.drop_penalty(node) as f64;
        }
        if let Some(node) = self.inserted_node() {
            delta -= model.drop_penalty(node) as f64;
        }

        if delta >= threshold {
            return None;
        }

        let mut schedules = SmallVec::new();
        for change in &changes {
            schedules.push(RouteSchedule::compute(model, change.vehicle_id, &change.nodes)?);
        }

        Some(EvaluatedMove {
            changes,
            schedules,
            delta,
        })
    }
}

#[derive(Debug)]
pub struct EvaluatedMove {
    changes: RouteChanges,
    schedules: SmallVec<[RouteSchedule; 2]>,
    delta: f64,
}

impl EvaluatedMove {
    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn apply(self, solution: &mut WorkingSolution) {
        for (change, schedule) in self.changes.into_iter().zip(self.schedules) {
            solution.replace_route(change.vehicle_id, change.nodes, schedule);
        }
    }
}

#[derive(Debug)]
pub enum LocalSearchMove {
    /// Moves one delivery to another position or trip.
    Relocate(RelocateOperator),
    /// Moves a chain of 2 or 3 consecutive deliveries.
    OrOpt(OrOptOperator),
    /// Exchanges two deliveries.
    Swap(SwapOperator),
    /// Reverses a segment of a trip.
    TwoOpt(TwoOptOperator),
    /// Serves a dropped delivery.
    InsertUnassigned(InsertUnassignedOperator),
    /// Replaces a served delivery with a dropped one.
    ExchangeUnassigned(ExchangeUnassignedOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(_) => "Relocate",
            LocalSearchMove::OrOpt(_) => "Or-Opt",
            LocalSearchMove::Swap(_) => "Swap",
            LocalSearchMove::TwoOpt(_) => "Two-Opt",
            LocalSearchMove::InsertUnassigned(_) => "Insert-Unassigned",
            LocalSearchMove::ExchangeUnassigned(_) => "Exchange-Unassigned",
        }
    }

    pub fn updated_routes(&self) -> SmallVec<[VehicleIdx; 2]> {
        match self {
            LocalSearchMove::Relocate(op) => op.updated_routes(),
            LocalSearchMove::OrOpt(op) => op.updated_routes(),
            LocalSearchMove::Swap(op) => op.updated_routes(),
            LocalSearchMove::TwoOpt(op) => op.updated_routes(),
            LocalSearchMove::InsertUnassigned(op) => op.updated_routes(),
            LocalSearchMove::ExchangeUnassigned(op) => op.updated_routes(),
        }
    }
}
