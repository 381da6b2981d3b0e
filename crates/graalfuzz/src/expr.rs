use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::pool::SymbolPool;
use crate::range::SizeRange;

/// How many operands of each kind an expression draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionShape {
    pub input_vars: SizeRange,
    pub const_vars: SizeRange,
    pub literals: SizeRange,
}

impl ExpressionShape {
    pub fn literals_only(literals: SizeRange) -> Self {
        Self {
            input_vars: SizeRange::empty(),
            const_vars: SizeRange::empty(),
            literals,
        }
    }
}

/// A flat, unparenthesized operand chain.
///
/// `operators[i]` joins `operands[i]` and `operands[i + 1]`. Every join is
/// arithmetic except the last, which is a comparison, so any expression with
/// two or more operands has a comparison at its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operands: Vec<&'static str>,
    pub operators: Vec<&'static str>,
}

impl Expression {
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// The outermost join, if any.
    pub fn root_operator(&self) -> Option<&'static str> {
        self.operators.last().copied()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, operand) in self.operands.iter().enumerate() {
            if let Some(op) = index.checked_sub(1).and_then(|i| self.operators.get(i)) {
                write!(f, " {op} ")?;
            }
            f.write_str(operand)?;
        }
        Ok(())
    }
}

pub fn synthesize_expression<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &SymbolPool,
    shape: &ExpressionShape,
) -> Expression {
    let input_count = shape.input_vars.sample(rng);
    let const_count = shape.const_vars.sample(rng);
    let literal_count = shape.literals.sample(rng);

    let mut operands = Vec::with_capacity(input_count + const_count + literal_count);
    draw(rng, pool.inputs, input_count, &mut operands);
    draw(rng, pool.constants, const_count, &mut operands);
    draw(rng, pool.literals, literal_count, &mut operands);
    operands.shuffle(rng);

    let joins = operands.len().saturating_sub(1);
    let mut operators = Vec::with_capacity(joins);
    for index in 0..joins {
        let table = if index + 1 == joins {
            pool.comparison
        } else {
            pool.arithmetic
        };
        if let Some(op) = table.choose(rng) {
            operators.push(*op);
        }
    }

    Expression {
        operands,
        operators,
    }
}

fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    table: &'static [&'static str],
    count: usize,
    out: &mut Vec<&'static str>,
) {
    // Empty tables contribute nothing.
    out.extend((0..count).filter_map(|_| table.choose(rng).copied()));
}

/// A `print(<expr>);` statement over literal constants only.
pub fn probe_statement<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &SymbolPool,
    literals: SizeRange,
) -> String {
    let expression = synthesize_expression(rng, pool, &ExpressionShape::literals_only(literals));
    format!("print({expression});")
}
