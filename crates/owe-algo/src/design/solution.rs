//! Design solution types and extraction.

use super::formulator::{ExportCandidate, Formulation, TierOption};
use crate::cost::{CableSelection, CostBreakdown, SupportStructure};
use crate::milp::{SolveStatus, SolverOutcome};
use owe_core::{
    Diagnostics, Euros, Kilometers, Megawatts, OffshoreSubstationId, OnshoreSubstationId,
    WindFarmId,
};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use tracing::{debug, warn};

/// Binary values are read as selected above this threshold
const SELECTION_THRESHOLD: f64 = 0.5;
/// Constraint slack accepted on the rounded assignment
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Chosen cable combination for one link
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CableSummary {
    pub voltage_kv: f64,
    pub section_mm2: f64,
    pub count: u32,
    pub route_length_km: f64,
    pub resistive_losses_mw: f64,
}

impl From<&CableSelection> for CableSummary {
    fn from(selection: &CableSelection) -> Self {
        Self {
            voltage_kv: selection.cable.voltage_kv,
            section_mm2: selection.cable.section_mm2,
            count: selection.count,
            route_length_km: selection.route_length.to_kilometers().value(),
            resistive_losses_mw: selection.resistive_losses.value(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedWindFarm {
    pub id: WindFarmId,
    pub capacity: Megawatts,
    pub fixed_cost: Euros,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedInterArray {
    pub wind_farm: WindFarmId,
    pub offshore: OffshoreSubstationId,
    pub distance: Kilometers,
    pub capacity: Megawatts,
    pub cable: CableSummary,
    /// Present-value cost
    pub cost: Euros,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedExport {
    pub offshore: OffshoreSubstationId,
    pub onshore: OnshoreSubstationId,
    pub distance: Kilometers,
    /// Capacity level the cable was sized for
    pub capacity: Megawatts,
    pub cable: CableSummary,
    pub cost: Euros,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedSubstation {
    pub id: OffshoreSubstationId,
    /// Wind farm capacity actually collected
    pub capacity: Megawatts,
    /// Capacity level the substation was priced at
    pub tier_level: Megawatts,
    pub structure: SupportStructure,
    pub foundation: Euros,
    pub converter: Euros,
    pub cost: Euros,
    pub breakdown: CostBreakdown,
}

/// Result of a design run.
///
/// Selections are empty unless [`SolveStatus::has_solution`] holds for
/// `status`.
#[derive(Debug, Clone, Serialize)]
pub struct DesignSolution {
    pub status: SolveStatus,
    /// Total present-value cost of the selected topology
    pub objective: Option<Euros>,
    pub selected_wind_farms: Vec<WindFarmId>,
    pub selected_offshore: Vec<OffshoreSubstationId>,
    pub selected_onshore: Vec<OnshoreSubstationId>,
    pub wind_farms: Vec<SelectedWindFarm>,
    pub inter_array: Vec<SelectedInterArray>,
    pub export: Vec<SelectedExport>,
    pub substations: Vec<SelectedSubstation>,
    pub connected_capacity: Megawatts,
    pub required_capacity: Megawatts,
    pub total_capacity: Megawatts,
    pub diagnostics: Diagnostics,
    pub solver: String,
    pub solve_time_seconds: f64,
    pub num_variables: usize,
    pub num_constraints: usize,
}

impl DesignSolution {
    fn empty(formulation: &Formulation, status: SolveStatus, solver: &str, solve_time_seconds: f64) -> Self {
        Self {
            status,
            objective: None,
            selected_wind_farms: Vec::new(),
            selected_offshore: Vec::new(),
            selected_onshore: Vec::new(),
            wind_farms: Vec::new(),
            inter_array: Vec::new(),
            export: Vec::new(),
            substations: Vec::new(),
            connected_capacity: Megawatts(0.0),
            required_capacity: formulation.required_capacity,
            total_capacity: formulation.total_capacity,
            diagnostics: formulation.diagnostics.clone(),
            solver: solver.to_string(),
            solve_time_seconds,
            num_variables: formulation.model.num_variables(),
            num_constraints: formulation.model.num_constraints(),
        }
    }

    /// Read the selected topology out of a solver outcome.
    ///
    /// The assignment is rounded and checked against every constraint
    /// family and against the radial structure before it is reported. A
    /// check failure turns the status into [`SolveStatus::Error`].
    pub fn from_outcome(formulation: &Formulation, outcome: SolverOutcome, solver: &str) -> Self {
        let seconds = outcome.solve_time.as_secs_f64();
        if !outcome.status.has_solution() {
            return Self::empty(formulation, outcome.status, solver, seconds);
        }

        let model = &formulation.model;
        if outcome.values.len() != model.num_variables() {
            let status = SolveStatus::Error(format!(
                "solver returned {} values for {} variables",
                outcome.values.len(),
                model.num_variables()
            ));
            return Self::empty(formulation, status, solver, seconds);
        }

        let rounded: Vec<f64> = outcome
            .values
            .iter()
            .map(|&v| if v > SELECTION_THRESHOLD { 1.0 } else { 0.0 })
            .collect();

        let violations = model.violations(&rounded, FEASIBILITY_TOLERANCE);
        if let Some(first) = violations.first() {
            warn!(
                count = violations.len(),
                family = %first.family,
                name = %first.name,
                "rounded assignment violates the model"
            );
            let status = SolveStatus::Error(format!(
                "solution violates {} constraint(s), first {}/{} by {:.3e}",
                violations.len(),
                first.family,
                first.name,
                first.amount
            ));
            return Self::empty(formulation, status, solver, seconds);
        }

        let selected = |var: crate::milp::VarId| rounded[var.index()] > SELECTION_THRESHOLD;
        let mut solution = Self::empty(formulation, outcome.status, solver, seconds);

        for farm in &formulation.scenario.wind_farms {
            if formulation.wind_farms.get(&farm.id).is_some_and(|&v| selected(v)) {
                solution.selected_wind_farms.push(farm.id);
                solution.wind_farms.push(SelectedWindFarm {
                    id: farm.id,
                    capacity: farm.capacity,
                    fixed_cost: farm.fixed_cost,
                });
            }
        }
        solution.connected_capacity = solution.wind_farms.iter().map(|w| w.capacity).sum();

        for candidate in formulation.inter_array.iter().filter(|c| selected(c.var)) {
            let Some(cable) = candidate.cable.as_ref() else {
                continue;
            };
            solution.inter_array.push(SelectedInterArray {
                wind_farm: candidate.edge.source,
                offshore: candidate.edge.destination,
                distance: candidate.edge.distance,
                capacity: candidate.capacity,
                cable: CableSummary::from(cable),
                cost: cable.cost.total(),
                breakdown: cable.cost,
            });
        }

        let mut active_tiers: BTreeMap<OffshoreSubstationId, &TierOption> = BTreeMap::new();
        let mut onshore = BTreeSet::new();
        for candidate in formulation.export.iter().filter(|c| selected(c.var)) {
            let Some(tier) = active_tier(candidate, &selected) else {
                continue;
            };
            active_tiers.insert(candidate.edge.source, tier);
            onshore.insert(candidate.edge.destination);
            solution.export.push(SelectedExport {
                offshore: candidate.edge.source,
                onshore: candidate.edge.destination,
                distance: candidate.edge.distance,
                capacity: tier.level,
                cable: CableSummary::from(&tier.cable),
                cost: tier.cable.cost.total(),
                breakdown: tier.cable.cost,
            });
        }
        solution.selected_onshore = onshore.into_iter().collect();

        for (&id, terms) in &formulation.substations {
            if !selected(terms.var) {
                continue;
            }
            solution.selected_offshore.push(id);
            let collected = model.evaluate_expression(terms.aggregate_expr, &rounded);
            debug!(
                expression = model.expression_name(terms.aggregate_expr),
                mw = collected,
                "collected capacity"
            );
            if let Some(tier) = active_tiers.get(&id) {
                solution.substations.push(SelectedSubstation {
                    id,
                    capacity: Megawatts(collected),
                    tier_level: tier.level,
                    structure: tier.substation.structure,
                    foundation: tier.substation.foundation,
                    converter: tier.substation.converter,
                    cost: tier.substation.cost.total(),
                    breakdown: tier.substation.cost,
                });
            }
        }

        solution.objective = Some(Euros(model.evaluate_objective(&rounded)));

        if let Err(message) = solution.check_radial() {
            warn!(%message, "selected topology is not radial");
            let status = SolveStatus::Error(format!("selected topology is not radial: {}", message));
            return Self::empty(formulation, status, solver, seconds);
        }

        solution
    }

    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }

    /// Verify the selection forms a forest of wind farm → offshore →
    /// onshore paths.
    ///
    /// Every selected wind farm and offshore substation must have exactly
    /// one outgoing link, and every link must end at a selected node.
    pub fn check_radial(&self) -> Result<(), String> {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        enum Node {
            Farm(WindFarmId),
            Offshore(OffshoreSubstationId),
            Onshore(OnshoreSubstationId),
        }

        let mut graph: DiGraph<Node, ()> = DiGraph::new();
        let mut index: BTreeMap<Node, NodeIndex> = BTreeMap::new();
        for &id in &self.selected_wind_farms {
            index.insert(Node::Farm(id), graph.add_node(Node::Farm(id)));
        }
        for &id in &self.selected_offshore {
            index.insert(Node::Offshore(id), graph.add_node(Node::Offshore(id)));
        }
        for &id in &self.selected_onshore {
            index.insert(Node::Onshore(id), graph.add_node(Node::Onshore(id)));
        }

        for link in &self.inter_array {
            let from = index
                .get(&Node::Farm(link.wind_farm))
                .ok_or_else(|| format!("{} is linked but not selected", link.wind_farm))?;
            let to = index
                .get(&Node::Offshore(link.offshore))
                .ok_or_else(|| format!("{} is linked but not selected", link.offshore))?;
            graph.add_edge(*from, *to, ());
        }
        for link in &self.export {
            let from = index
                .get(&Node::Offshore(link.offshore))
                .ok_or_else(|| format!("{} is linked but not selected", link.offshore))?;
            let to = index
                .get(&Node::Onshore(link.onshore))
                .ok_or_else(|| format!("{} is linked but not selected", link.onshore))?;
            graph.add_edge(*from, *to, ());
        }

        for node in graph.node_indices() {
            let out = graph.neighbors(node).count();
            match graph[node] {
                Node::Farm(id) if out != 1 => {
                    return Err(format!("{} has {} outgoing links", id, out));
                }
                Node::Offshore(id) if out != 1 => {
                    return Err(format!("{} has {} outgoing links", id, out));
                }
                _ => {}
            }
        }

        if is_cyclic_directed(&graph) {
            return Err("cycle in selected links".to_string());
        }
        Ok(())
    }

    pub fn total_inter_array_cost(&self) -> Euros {
        self.inter_array.iter().map(|l| l.cost).sum()
    }

    pub fn total_export_cost(&self) -> Euros {
        self.export.iter().map(|l| l.cost).sum()
    }

    pub fn total_substation_cost(&self) -> Euros {
        self.substations.iter().map(|s| s.cost).sum()
    }

    pub fn total_fixed_cost(&self) -> Euros {
        self.wind_farms.iter().map(|w| w.fixed_cost).sum()
    }

    /// Cost components of all selected cables and substations
    pub fn cost_components(&self) -> CostBreakdown {
        self.inter_array
            .iter()
            .map(|l| &l.breakdown)
            .chain(self.export.iter().map(|l| &l.breakdown))
            .chain(self.substations.iter().map(|s| &s.breakdown))
            .fold(CostBreakdown::default(), |acc, b| acc.combined(b))
    }

    /// Human-readable report
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Offshore Grid Design\n{}", "=".repeat(40));
        let _ = writeln!(s, "Status: {}", self.status);
        let _ = writeln!(s, "Solver: {} ({:.2}s)", self.solver, self.solve_time_seconds);
        let _ = writeln!(
            s,
            "Model: {} variables, {} constraints",
            self.num_variables, self.num_constraints
        );
        let _ = writeln!(
            s,
            "Capacity: {:.1} of {:.1} MW connected (required {:.1} MW)",
            self.connected_capacity.value(),
            self.total_capacity.value(),
            self.required_capacity.value()
        );

        if let Some(objective) = self.objective {
            let _ = writeln!(s, "Total Cost: {:.2} M€", objective.millions());
            let _ = writeln!(s, "  Wind farms: {:.2} M€", self.total_fixed_cost().millions());
            let _ = writeln!(s, "  Inter-array: {:.2} M€", self.total_inter_array_cost().millions());
            let _ = writeln!(s, "  Substations: {:.2} M€", self.total_substation_cost().millions());
            let _ = writeln!(s, "  Export: {:.2} M€", self.total_export_cost().millions());

            let c = self.cost_components();
            let pv = &c.present_value;
            s.push_str("\nCost components (undiscounted / present value):\n");
            let _ = writeln!(
                s,
                "  Equipment: {:.2} / {:.2} M€",
                c.equipment.millions(),
                pv.equipment.millions()
            );
            let _ = writeln!(
                s,
                "  Installation: {:.2} / {:.2} M€",
                c.installation.millions(),
                pv.installation.millions()
            );
            let _ = writeln!(
                s,
                "  Operation: {:.3} per year / {:.2} M€",
                c.operational_yearly.millions(),
                pv.operational.millions()
            );
            let _ = writeln!(
                s,
                "  Decommissioning: {:.2} / {:.2} M€",
                c.decommissioning.millions(),
                pv.decommissioning.millions()
            );
            let _ = writeln!(s, "  Capital (equipment + installation): {:.2} M€", c.capital().millions());
        }

        if !self.inter_array.is_empty() {
            s.push_str("\nInter-array cables:\n");
            for link in &self.inter_array {
                let _ = writeln!(
                    s,
                    "  {} -> {}: {:.1} km, {} x {:.0} kV {:.0} mm² - {:.2} M€",
                    link.wind_farm,
                    link.offshore,
                    link.distance.value(),
                    link.cable.count,
                    link.cable.voltage_kv,
                    link.cable.section_mm2,
                    link.cost.millions()
                );
            }
        }

        if !self.substations.is_empty() {
            s.push_str("\nOffshore substations:\n");
            for sub in &self.substations {
                let _ = writeln!(
                    s,
                    "  {}: {:.1} MW ({}) - capital {:.2} M€, {:.3} M€/yr, {:.2} M€ PV",
                    sub.id,
                    sub.capacity.value(),
                    sub.structure,
                    sub.breakdown.capital().millions(),
                    sub.breakdown.operational_yearly.millions(),
                    sub.cost.millions()
                );
            }
        }

        if !self.export.is_empty() {
            s.push_str("\nExport cables:\n");
            for link in &self.export {
                let _ = writeln!(
                    s,
                    "  {} -> {}: {:.1} km, {} x {:.0} kV {:.0} mm² - {:.2} M€",
                    link.offshore,
                    link.onshore,
                    link.distance.value(),
                    link.cable.count,
                    link.cable.voltage_kv,
                    link.cable.section_mm2,
                    link.cost.millions()
                );
            }
        }

        if self.diagnostics.has_issues() {
            let _ = writeln!(s, "\nDiagnostics: {}", self.diagnostics.summary());
        }
        s
    }
}

fn active_tier<'a>(
    candidate: &'a ExportCandidate,
    selected: &impl Fn(crate::milp::VarId) -> bool,
) -> Option<&'a TierOption> {
    candidate.tiers.iter().find(|t| selected(t.var))
}
