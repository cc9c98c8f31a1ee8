//! Solver-independent MILP arena.
//!
//! Variables, named expressions and constraints are stored in flat vectors
//! and referenced by index. Every decision variable is binary. The arena can evaluate any expression against an
//! assignment, which is how extracted solutions are re-priced and checked.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Index of a decision variable in a [`MilpModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of a named expression in a [`MilpModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A binary decision variable
#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    pub name: String,
}

/// Affine expression `Σ coef·var + constant`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// Builder-style term
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// `self += scale · other`
    pub fn add_scaled(&mut self, other: &LinearExpr, scale: f64) {
        for &(var, coefficient) in &other.terms {
            self.add_term(var, scale * coefficient);
        }
        self.constant += scale * other.constant;
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value under an assignment indexed by [`VarId`]
    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coefficient)| coefficient * assignment.get(var.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::new().term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (var, coefficient) in iter {
            expr.add_term(var, coefficient);
        }
        expr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        };
        f.write_str(symbol)
    }
}

/// `lhs (<=|>=|==) rhs`, tagged with the family it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct Constraint {
    pub family: &'static str,
    pub name: String,
    pub lhs: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Amount by which an assignment violates the constraint (0 when satisfied)
    pub fn violation(&self, assignment: &[f64]) -> f64 {
        let lhs = self.lhs.evaluate(assignment);
        match self.relation {
            Relation::Le => (lhs - self.rhs).max(0.0),
            Relation::Ge => (self.rhs - lhs).max(0.0),
            Relation::Eq => (lhs - self.rhs).abs(),
        }
    }
}

/// A violated constraint or variable domain
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub family: String,
    pub name: String,
    pub amount: f64,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} violated by {:.6}", self.family, self.name, self.amount)
    }
}

/// Minimisation MILP held as an index arena.
#[derive(Debug, Clone, Default)]
pub struct MilpModel {
    variables: Vec<Variable>,
    expressions: Vec<(String, LinearExpr)>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable { name: name.into() });
        id
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Register a named expression for later evaluation
    pub fn add_expression(&mut self, name: impl Into<String>, expr: LinearExpr) -> ExprId {
        let id = ExprId(self.expressions.len());
        self.expressions.push((name.into(), expr));
        id
    }

    pub fn expression(&self, id: ExprId) -> &LinearExpr {
        &self.expressions[id.0].1
    }

    pub fn expression_name(&self, id: ExprId) -> &str {
        &self.expressions[id.0].0
    }

    pub fn evaluate_expression(&self, id: ExprId, assignment: &[f64]) -> f64 {
        self.expression(id).evaluate(assignment)
    }

    pub fn add_constraint(
        &mut self,
        family: &'static str,
        name: impl Into<String>,
        lhs: LinearExpr,
        relation: Relation,
        rhs: f64,
    ) {
        // Constants move to the right-hand side
        let mut lhs = lhs;
        let rhs = rhs - lhs.constant;
        lhs.constant = 0.0;
        self.constraints.push(Constraint {
            family,
            name: name.into(),
            lhs,
            relation,
            rhs,
        });
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints_in<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a Constraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    /// Number of constraints per family
    pub fn family_sizes(&self) -> BTreeMap<&'static str, usize> {
        let mut sizes = BTreeMap::new();
        for c in &self.constraints {
            *sizes.entry(c.family).or_insert(0) += 1;
        }
        sizes
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn evaluate_objective(&self, assignment: &[f64]) -> f64 {
        self.objective.evaluate(assignment)
    }

    /// Every constraint or variable domain violated by more than `tolerance`.
    pub fn violations(&self, assignment: &[f64], tolerance: f64) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (index, var) in self.variables.iter().enumerate() {
            let value = assignment.get(index).copied().unwrap_or(0.0);
            let amount = if value < 0.0 {
                -value
            } else if value > 1.0 {
                value - 1.0
            } else {
                value.min(1.0 - value)
            };
            if amount > tolerance {
                violations.push(Violation {
                    family: "domain".to_string(),
                    name: var.name.clone(),
                    amount,
                });
            }
        }

        for c in &self.constraints {
            let amount = c.violation(assignment);
            if amount > tolerance {
                violations.push(Violation {
                    family: c.family.to_string(),
                    name: c.name.clone(),
                    amount,
                });
            }
        }

        violations
    }
}
