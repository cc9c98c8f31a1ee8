//! MILP assembly for the radial design problem.

use super::tiers::{CapacityTiers, TierMode};
use super::{DesignError, DesignProblem};
use crate::cost::{
    CableEngine, CableLink, CableSelection, CostError, PresentValueEngine, SubstationCost,
    SubstationEngine,
};
use crate::milp::{ExprId, LinearExpr, MilpModel, Relation, VarId};
use crate::viability::{ExportEdge, InterArrayEdge, ViabilityGraph};
use owe_core::{
    Diagnostics, Megawatts, OffshoreSubstation, OffshoreSubstationId, OnshoreSubstation,
    OnshoreSubstationId, Scenario, WindFarm, WindFarmId,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A viable wind farm to offshore substation pair in the model
#[derive(Debug, Clone)]
pub struct InterArrayCandidate {
    pub edge: InterArrayEdge,
    pub var: VarId,
    /// Capacity of the source wind farm
    pub capacity: Megawatts,
    pub iso_match: bool,
    /// `None` when no catalog combination can carry the farm's capacity
    pub cable: Option<CableSelection>,
    pub distance_expr: ExprId,
    pub capacity_expr: ExprId,
    pub cost_expr: ExprId,
}

/// One priced capacity level of an export edge
#[derive(Debug, Clone)]
pub struct TierOption {
    pub level: Megawatts,
    pub var: VarId,
    pub substation: SubstationCost,
    pub cable: CableSelection,
}

/// A viable offshore to onshore substation pair in the model
#[derive(Debug, Clone)]
pub struct ExportCandidate {
    pub edge: ExportEdge,
    pub var: VarId,
    pub iso_match: bool,
    pub eligible: bool,
    pub tiers: Vec<TierOption>,
    pub distance_expr: ExprId,
    pub capacity_expr: ExprId,
    pub cost_expr: ExprId,
}

/// Per offshore substation model terms
#[derive(Debug, Clone)]
pub struct SubstationTerms {
    pub var: VarId,
    pub mode: TierMode,
    /// Σ P_w·x_ws
    pub aggregate_expr: ExprId,
    /// Substation cost over the tiers of all its export edges
    pub cost_expr: ExprId,
}

/// The assembled model plus everything needed to read a solution back.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub model: MilpModel,
    /// Sanitized records the model was built from
    pub scenario: Scenario,
    pub wind_farms: BTreeMap<WindFarmId, VarId>,
    pub substations: BTreeMap<OffshoreSubstationId, SubstationTerms>,
    pub inter_array: Vec<InterArrayCandidate>,
    pub export: Vec<ExportCandidate>,
    pub total_capacity: Megawatts,
    pub required_capacity: Megawatts,
    pub diagnostics: Diagnostics,
}

struct Engines {
    cable: CableEngine,
    substation: SubstationEngine,
}

impl Engines {
    fn new(problem: &DesignProblem) -> Result<Self, CostError> {
        let present_value = PresentValueEngine::new(problem.config.present_value.clone())?;
        let cable = CableEngine::new(problem.config.cables.clone(), present_value.clone())?;
        let substation = SubstationEngine::new(problem.config.substation.clone(), present_value)?;
        Ok(Self { cable, substation })
    }
}

/// Build the MILP for a design problem.
///
/// Configuration errors abort here, before any solver is involved. Invalid
/// entity records are dropped and reported in [`Formulation::diagnostics`];
/// the run only fails when no wind farm or no substation of either kind
/// remains.
pub fn formulate(problem: &DesignProblem) -> Result<Formulation, DesignError> {
    let config = &problem.config;
    config.validate()?;

    let (scenario, mut diagnostics) = problem.scenario.sanitize();
    if diagnostics.has_errors() {
        warn!(
            excluded = diagnostics.error_count(),
            "invalid entity records excluded from the run"
        );
    }
    if scenario.wind_farms.is_empty() {
        return Err(DesignError::NoValidConfiguration("no valid wind farm".into()));
    }
    if scenario.offshore.is_empty() {
        return Err(DesignError::NoValidConfiguration("no valid offshore substation".into()));
    }
    if scenario.onshore.is_empty() {
        return Err(DesignError::NoValidConfiguration("no valid onshore substation".into()));
    }

    let engines = Engines::new(problem)?;
    let graph = ViabilityGraph::build(&scenario, &config.viability);
    report_isolated(&graph, &mut diagnostics);

    let farms: BTreeMap<WindFarmId, &WindFarm> = scenario.wind_farms.iter().map(|w| (w.id, w)).collect();
    let offshore: BTreeMap<OffshoreSubstationId, &OffshoreSubstation> =
        scenario.offshore.iter().map(|s| (s.id, s)).collect();
    let onshore: BTreeMap<OnshoreSubstationId, &OnshoreSubstation> =
        scenario.onshore.iter().map(|s| (s.id, s)).collect();

    let mut model = MilpModel::new();

    let wind_farm_vars: BTreeMap<WindFarmId, VarId> = farms
        .keys()
        .map(|&id| (id, model.add_binary(format!("y_wf[{}]", id.value()))))
        .collect();
    let offshore_vars: BTreeMap<OffshoreSubstationId, VarId> = offshore
        .keys()
        .map(|&id| (id, model.add_binary(format!("y_oss[{}]", id.value()))))
        .collect();

    // === Inter-array candidates ===
    let mut inter_array = Vec::with_capacity(graph.inter_array.len());
    for edge in &graph.inter_array.edges {
        let (Some(farm), Some(site)) = (farms.get(&edge.source), offshore.get(&edge.destination)) else {
            continue;
        };
        let var = model.add_binary(format!("x_iac[{},{}]", edge.source.value(), edge.destination.value()));
        let iso_match = farm.iso == site.iso;

        let cable = match engines.cable.size(edge.distance, farm.capacity, CableLink::InterArray) {
            Ok(selection) => Some(selection),
            Err(CostError::NoFeasibleCable { .. }) => {
                diagnostics.add_warning_with_entity(
                    "cable",
                    &format!("no inter-array cable can reach {}", site.id),
                    &farm.id.to_string(),
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        let key = format!("{},{}", edge.source.value(), edge.destination.value());
        let distance_expr = model.add_expression(
            format!("distance_iac[{key}]"),
            LinearExpr::new().term(var, edge.distance.value()),
        );
        let capacity_expr = model.add_expression(
            format!("capacity_iac[{key}]"),
            LinearExpr::new().term(var, farm.capacity.value()),
        );
        let pv = cable.as_ref().map(|c| c.cost.total().value()).unwrap_or(0.0);
        let cost_expr = model.add_expression(format!("cost_iac[{key}]"), LinearExpr::new().term(var, pv));

        inter_array.push(InterArrayCandidate {
            edge: *edge,
            var,
            capacity: farm.capacity,
            iso_match,
            cable,
            distance_expr,
            capacity_expr,
            cost_expr,
        });
    }

    // === Capacity tiers per substation ===
    let max_substation_mw = config.capacity.max_substation_mw;
    let mut substation_tiers: BTreeMap<OffshoreSubstationId, (CapacityTiers, Vec<SubstationCost>)> =
        BTreeMap::new();
    for (&id, site) in &offshore {
        let reachable: Vec<f64> = inter_array
            .iter()
            .filter(|c| c.edge.destination == id && c.iso_match && c.cable.is_some())
            .map(|c| c.capacity.value())
            .collect();
        let tiers = CapacityTiers::build(&reachable, &config.tiers, max_substation_mw);
        if tiers.is_empty() {
            diagnostics.add_warning_with_entity(
                "viability",
                "no wind farm with a matching ISO code can connect",
                &id.to_string(),
            );
        }
        let priced = tiers
            .levels
            .iter()
            .map(|&level| engines.substation.price_site(site, Megawatts(level)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            substation = id.value(),
            reachable = reachable.len(),
            mode = tiers.mode.as_str(),
            tiers = tiers.len(),
            "capacity tiers"
        );
        substation_tiers.insert(id, (tiers, priced));
    }

    // === Export candidates ===
    let mut export = Vec::with_capacity(graph.export.len());
    for edge in &graph.export.edges {
        let (Some(site), Some(landing)) = (offshore.get(&edge.source), onshore.get(&edge.destination)) else {
            continue;
        };
        let var = model.add_binary(format!("x_ec[{},{}]", edge.source.value(), edge.destination.value()));
        let iso_match = site.iso == landing.iso;
        let eligible = landing.eligible;

        let mut tiers = Vec::new();
        if iso_match && eligible {
            if let Some((levels, priced)) = substation_tiers.get(&site.id) {
                for (&level, substation) in levels.levels.iter().zip(priced) {
                    let cable = match engines.cable.size(edge.distance, Megawatts(level), CableLink::Export) {
                        Ok(selection) => selection,
                        Err(CostError::NoFeasibleCable { .. }) => {
                            debug!(
                                substation = site.id.value(),
                                onshore = landing.id.value(),
                                level,
                                "export tier has no feasible cable"
                            );
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    };
                    let t = model.add_binary(format!(
                        "t[{},{},{}]",
                        edge.source.value(),
                        edge.destination.value(),
                        tiers.len()
                    ));
                    tiers.push(TierOption {
                        level: Megawatts(level),
                        var: t,
                        substation: substation.clone(),
                        cable,
                    });
                }
            }
        }

        let key = format!("{},{}", edge.source.value(), edge.destination.value());
        let distance_expr = model.add_expression(
            format!("distance_ec[{key}]"),
            LinearExpr::new().term(var, edge.distance.value()),
        );
        let capacity_expr = model.add_expression(
            format!("capacity_ec[{key}]"),
            tiers.iter().map(|t| (t.var, t.level.value())).collect(),
        );
        let cost_expr = model.add_expression(
            format!("cost_ec[{key}]"),
            tiers.iter().map(|t| (t.var, t.cable.cost.total().value())).collect(),
        );

        export.push(ExportCandidate {
            edge: *edge,
            var,
            iso_match,
            eligible,
            tiers,
            distance_expr,
            capacity_expr,
            cost_expr,
        });
    }

    // === Derived substation expressions ===
    let mut substations = BTreeMap::new();
    for (&id, &var) in &offshore_vars {
        let aggregate: LinearExpr = inter_array
            .iter()
            .filter(|c| c.edge.destination == id)
            .map(|c| (c.var, c.capacity.value()))
            .collect();
        let cost: LinearExpr = export
            .iter()
            .filter(|c| c.edge.source == id)
            .flat_map(|c| c.tiers.iter())
            .map(|t| (t.var, t.substation.cost.total().value()))
            .collect();
        let mode = substation_tiers
            .get(&id)
            .map(|(tiers, _)| tiers.mode)
            .unwrap_or(TierMode::Exact);
        substations.insert(
            id,
            SubstationTerms {
                var,
                mode,
                aggregate_expr: model.add_expression(format!("aggregate_oss[{}]", id.value()), aggregate),
                cost_expr: model.add_expression(format!("cost_oss[{}]", id.value()), cost),
            },
        );
    }

    // === Constraints ===
    for (&wf, &y) in &wind_farm_vars {
        let capacity = farms[&wf].capacity.value();
        let mut degree = LinearExpr::new().term(y, -1.0);
        let mut routed = LinearExpr::new().term(y, -capacity);
        for c in inter_array.iter().filter(|c| c.edge.source == wf) {
            degree.add_term(c.var, 1.0);
            routed.add_term(c.var, capacity);
        }
        model.add_constraint("wind_farm_degree", format!("degree_wf[{}]", wf.value()), degree, Relation::Eq, 0.0);
        model.add_constraint("wind_farm_capacity", format!("capacity_wf[{}]", wf.value()), routed, Relation::Eq, 0.0);
    }

    for c in &inter_array {
        let key = format!("{},{}", c.edge.source.value(), c.edge.destination.value());
        let y_wf = wind_farm_vars[&c.edge.source];
        let y_oss = offshore_vars[&c.edge.destination];
        model.add_constraint(
            "inter_array_link",
            format!("iac_wf[{key}]"),
            LinearExpr::from(c.var).term(y_wf, -1.0),
            Relation::Le,
            0.0,
        );
        model.add_constraint(
            "inter_array_link",
            format!("iac_oss[{key}]"),
            LinearExpr::from(c.var).term(y_oss, -1.0),
            Relation::Le,
            0.0,
        );
        if !c.iso_match {
            model.add_constraint("iso_match", format!("iso_iac[{key}]"), LinearExpr::from(c.var), Relation::Le, 0.0);
        }
        if c.cable.is_none() {
            model.add_constraint(
                "cable_feasibility",
                format!("cable_iac[{key}]"),
                LinearExpr::from(c.var),
                Relation::Le,
                0.0,
            );
        }
    }

    for (&oss, &y) in &offshore_vars {
        let mut degree = LinearExpr::new().term(y, -1.0);
        for c in export.iter().filter(|c| c.edge.source == oss) {
            degree.add_term(c.var, 1.0);
        }
        model.add_constraint("substation_degree", format!("degree_oss[{}]", oss.value()), degree, Relation::Eq, 0.0);
    }

    for c in &export {
        let key = format!("{},{}", c.edge.source.value(), c.edge.destination.value());
        let y_oss = offshore_vars[&c.edge.source];
        model.add_constraint(
            "export_link",
            format!("ec_oss[{key}]"),
            LinearExpr::from(c.var).term(y_oss, -1.0),
            Relation::Le,
            0.0,
        );
        model.add_constraint(
            "export_link",
            format!("ec_onss[{key}]"),
            LinearExpr::from(c.var),
            Relation::Le,
            if c.eligible { 1.0 } else { 0.0 },
        );
        if !c.iso_match {
            model.add_constraint("iso_match", format!("iso_ec[{key}]"), LinearExpr::from(c.var), Relation::Le, 0.0);
        }

        let mut selection = LinearExpr::new().term(c.var, -1.0);
        for t in &c.tiers {
            selection.add_term(t.var, 1.0);
        }
        model.add_constraint("tier_selection", format!("tier_ec[{key}]"), selection, Relation::Eq, 0.0);
    }

    for (&oss, terms) in &substations {
        let mut balance = LinearExpr::new();
        for c in export.iter().filter(|c| c.edge.source == oss) {
            for t in &c.tiers {
                balance.add_term(t.var, t.level.value());
            }
        }
        balance.add_scaled(model.expression(terms.aggregate_expr), -1.0);
        let relation = match terms.mode {
            TierMode::Exact => Relation::Eq,
            TierMode::Grid => Relation::Ge,
        };
        model.add_constraint(
            "capacity_conservation",
            format!("conservation_oss[{}]", oss.value()),
            balance,
            relation,
            0.0,
        );

        if let Some(max_mw) = max_substation_mw {
            let mut limit = model.expression(terms.aggregate_expr).clone();
            limit.add_term(terms.var, -max_mw);
            model.add_constraint(
                "substation_capacity_limit",
                format!("limit_oss[{}]", oss.value()),
                limit,
                Relation::Le,
                0.0,
            );
        }
    }

    let total_capacity = scenario.total_capacity();
    let required_capacity = Megawatts(config.capacity.required_mw(total_capacity.value()));
    let connected: LinearExpr = wind_farm_vars
        .iter()
        .map(|(wf, &y)| (y, farms[wf].capacity.value()))
        .collect();
    model.add_constraint(
        "minimum_capacity",
        "min_capacity",
        connected,
        Relation::Ge,
        required_capacity.value(),
    );

    // === Objective ===
    let mut objective = LinearExpr::new();
    for (wf, &y) in &wind_farm_vars {
        objective.add_term(y, farms[wf].fixed_cost.value());
    }
    for c in &inter_array {
        objective.add_scaled(model.expression(c.cost_expr), 1.0);
    }
    for c in &export {
        objective.add_scaled(model.expression(c.cost_expr), 1.0);
    }
    for terms in substations.values() {
        objective.add_scaled(model.expression(terms.cost_expr), 1.0);
    }
    model.set_objective(objective);

    info!(
        wind_farms = wind_farm_vars.len(),
        offshore = offshore_vars.len(),
        onshore = onshore.len(),
        inter_array_edges = inter_array.len(),
        export_edges = export.len(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        required_mw = required_capacity.value(),
        "design model assembled"
    );

    Ok(Formulation {
        model,
        scenario: scenario.clone(),
        wind_farms: wind_farm_vars,
        substations,
        inter_array,
        export,
        total_capacity,
        required_capacity,
        diagnostics,
    })
}

fn report_isolated(graph: &ViabilityGraph, diagnostics: &mut Diagnostics) {
    let inter_km = graph.inter_array.max_distance;
    let export_km = graph.export.max_distance;
    for id in &graph.inter_array.isolated_sources {
        diagnostics.add_warning_with_entity(
            "viability",
            &format!("no offshore substation within {}", inter_km),
            &id.to_string(),
        );
    }
    for id in &graph.inter_array.isolated_destinations {
        diagnostics.add_warning_with_entity(
            "viability",
            &format!("no wind farm within {}", inter_km),
            &id.to_string(),
        );
    }
    for id in &graph.export.isolated_sources {
        diagnostics.add_warning_with_entity(
            "viability",
            &format!("no onshore substation within {}", export_km),
            &id.to_string(),
        );
    }
    for id in &graph.export.isolated_destinations {
        diagnostics.add_warning_with_entity(
            "viability",
            &format!("no offshore substation within {}", export_km),
            &id.to_string(),
        );
    }
}
