//! Traced values: every computed line carries its provenance graph.

use crate::money::{Money, Rounding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a traced value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// Read directly from an input document box.
    Input { reference: String },
    /// Computed from other traced values; `inputs` lists every node read.
    Computed { op: String, inputs: Vec<String> },
    /// A documented constant (rate table entry, statutory limit, ...).
    Literal { reason: String },
}

/// A monetary value annotated with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracedValue {
    pub amount: Money,
    pub node_id: String,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irs_citation: Option<String>,
}

/// Lightweight handle to a recorded node: the id plus its amount.
///
/// Schedules pass these around instead of full [`TracedValue`]s; the
/// provenance stays in the [`Trace`] map, keyed by id, so relationships
/// are flat back-references with no cyclic ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
    pub amount: Money,
}

/// Append-only map of every traced value produced during a compute.
///
/// Node ids are unique; re-inserting an id is a programming defect.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Trace {
    values: BTreeMap<String, TracedValue>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a recorded value by node id.
    pub fn get(&self, node_id: &str) -> Option<&TracedValue> {
        self.values.get(node_id)
    }

    /// All recorded values, ordered by node id.
    pub fn values(&self) -> &BTreeMap<String, TracedValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn record(&mut self, value: TracedValue) -> NodeRef {
        let node = NodeRef {
            id: value.node_id.clone(),
            amount: value.amount,
        };
        let prior = self.values.insert(value.node_id.clone(), value);
        debug_assert!(prior.is_none(), "duplicate trace node: {}", node.id);
        node
    }

    /// Records a leaf read from an input document box.
    pub fn input(
        &mut self,
        node_id: impl Into<String>,
        amount: Money,
        reference: impl Into<String>,
    ) -> NodeRef {
        self.record(TracedValue {
            amount,
            node_id: node_id.into(),
            source: Source::Input {
                reference: reference.into(),
            },
            irs_citation: None,
        })
    }

    /// Records a documented constant.
    pub fn literal(
        &mut self,
        node_id: impl Into<String>,
        amount: Money,
        reason: impl Into<String>,
    ) -> NodeRef {
        self.record(TracedValue {
            amount,
            node_id: node_id.into(),
            source: Source::Literal {
                reason: reason.into(),
            },
            irs_citation: None,
        })
    }

    /// Records a computed node with an explicit op and input list.
    pub fn computed(
        &mut self,
        node_id: impl Into<String>,
        amount: Money,
        op: impl Into<String>,
        inputs: &[&NodeRef],
    ) -> NodeRef {
        self.record(TracedValue {
            amount,
            node_id: node_id.into(),
            source: Source::Computed {
                op: op.into(),
                inputs: inputs.iter().map(|n| n.id.clone()).collect(),
            },
            irs_citation: None,
        })
    }

    /// Sums the given nodes.
    pub fn sum(&mut self, node_id: impl Into<String>, parts: &[&NodeRef]) -> NodeRef {
        let amount = parts.iter().map(|n| n.amount).sum();
        self.computed(node_id, amount, "sum", parts)
    }

    /// Subtracts `b` from `a`.
    pub fn sub(&mut self, node_id: impl Into<String>, a: &NodeRef, b: &NodeRef) -> NodeRef {
        self.computed(node_id, a.amount - b.amount, "sub", &[a, b])
    }

    /// The larger of `a` and `b`.
    pub fn max(&mut self, node_id: impl Into<String>, a: &NodeRef, b: &NodeRef) -> NodeRef {
        self.computed(node_id, a.amount.max(b.amount), "max", &[a, b])
    }

    /// The smaller of `a` and `b`.
    pub fn min(&mut self, node_id: impl Into<String>, a: &NodeRef, b: &NodeRef) -> NodeRef {
        self.computed(node_id, a.amount.min(b.amount), "min", &[a, b])
    }

    /// Clamps a negative amount to zero.
    pub fn clamp_zero(&mut self, node_id: impl Into<String>, v: &NodeRef) -> NodeRef {
        self.computed(node_id, v.amount.clamp_zero(), "clamp_zero", &[v])
    }

    /// Multiplies by `numerator / denominator` with the given rounding.
    pub fn mul_rational(
        &mut self,
        node_id: impl Into<String>,
        v: &NodeRef,
        numerator: i64,
        denominator: i64,
        rounding: Rounding,
    ) -> NodeRef {
        let amount = v.amount.mul_rational(numerator, denominator, rounding);
        self.computed(
            node_id,
            amount,
            format!("mul {numerator}/{denominator}"),
            &[v],
        )
    }

    /// Multiplies by a rate in basis points.
    pub fn pct(
        &mut self,
        node_id: impl Into<String>,
        v: &NodeRef,
        basis_points: i64,
        rounding: Rounding,
    ) -> NodeRef {
        let amount = v.amount.pct(basis_points, rounding);
        self.computed(node_id, amount, format!("pct {basis_points}bp"), &[v])
    }

    /// Relabels a value under a new node id without altering its graph;
    /// the new node reads exactly the old one.
    pub fn rebind(&mut self, v: &NodeRef, new_node_id: impl Into<String>) -> NodeRef {
        self.computed(new_node_id, v.amount, "rebind", &[v])
    }

    /// Records an externally computed amount whose inputs are known.
    ///
    /// Used where a worksheet produces one number from several reads that
    /// do not decompose into the primitive ops (bracket walks, tier
    /// selection).
    pub fn worksheet(
        &mut self,
        node_id: impl Into<String>,
        amount: Money,
        op: impl Into<String>,
        inputs: &[&NodeRef],
    ) -> NodeRef {
        self.computed(node_id, amount, op, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sum_records_inputs() {
        let mut trace = Trace::new();
        let a = trace.input("w2.0.box1", Money::from_dollars(100), "W-2 box 1");
        let b = trace.input("w2.1.box1", Money::from_dollars(50), "W-2 box 1");
        let total = trace.sum("form1040.line1a", &[&a, &b]);

        assert_eq!(total.amount, Money::from_dollars(150));
        let recorded = trace.get("form1040.line1a").unwrap();
        match &recorded.source {
            Source::Computed { op, inputs } => {
                assert_eq!(op, "sum");
                assert_eq!(inputs, &vec!["w2.0.box1".to_string(), "w2.1.box1".to_string()]);
            }
            other => panic!("expected computed source, got {other:?}"),
        }
    }

    #[test]
    fn test_rebind_preserves_amount() {
        let mut trace = Trace::new();
        let a = trace.literal("scheduleB.line4", Money::from_dollars(330), "interest total");
        let b = trace.rebind(&a, "form1040.line2b");
        assert_eq!(b.amount, a.amount);
        assert!(trace.get("form1040.line2b").is_some());
    }

    #[test]
    fn test_clamp_zero() {
        let mut trace = Trace::new();
        let a = trace.literal("x", Money::from_dollars(-5), "test");
        let b = trace.clamp_zero("y", &a);
        assert_eq!(b.amount, Money::ZERO);
    }

    #[test]
    fn test_values_ordered_by_id() {
        let mut trace = Trace::new();
        trace.literal("b", Money::ZERO, "test");
        trace.literal("a", Money::ZERO, "test");
        let ids: Vec<_> = trace.values().keys().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
