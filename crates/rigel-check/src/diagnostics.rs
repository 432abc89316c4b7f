use thiserror::Error;

/// A non-fatal finding from either pass.
///
/// None of these abort an analysis run: every condition is recovered locally
/// by substituting the unknown type or skipping the offending construct, and
/// the findings accumulate on the pass results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckDiagnostic {
    #[error("unsupported operator `{operator}` in `{expr}`")]
    UnsupportedOperator { operator: String, expr: String },

    #[error("unable to find an enclosing context for `{expr}`")]
    MissingExpressionContext { expr: String },

    #[error("tried to apply `{operator}` to non-numeric operand `{operand}` of type {ty}")]
    NonNumericOperand {
        operator: String,
        operand: String,
        ty: String,
    },

    #[error("expression `{expr}` is not type compatible: operands {lhs} and {rhs} cannot be widened to {expected}")]
    TypeIncompatible {
        expr: String,
        expected: String,
        lhs: String,
        rhs: String,
    },

    #[error("type `{ty}` is not declared or imported in the scope of {class}")]
    InvalidTypeReference { ty: String, class: String },

    #[error("{message}")]
    StructuralInconsistency { message: String },
}
