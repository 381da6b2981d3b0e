use rand::Rng;

use crate::expr::{synthesize_expression, Expression, ExpressionShape};
use crate::pool::{SymbolPool, DECLARATION_PREAMBLE};
use crate::range::SizeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramShape {
    pub blocks: SizeRange,
    pub guard: ExpressionShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlock {
    pub guard: Expression,
    pub tag: String,
    /// 1-based line of the `if`.
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct SynthesizedProgram {
    pub blocks: Vec<ConditionalBlock>,
}

/// Lines a rendered block occupies, separator included: `if`, body, `}`, blank.
pub const BLOCK_LINES: usize = 4;

impl SynthesizedProgram {
    /// Line of the first block; the preamble is fixed, so this never changes.
    pub fn first_block_line() -> usize {
        DECLARATION_PREAMBLE.lines().count() + 1
    }

    pub fn to_source(&self) -> String {
        let mut out = String::from(DECLARATION_PREAMBLE);
        for block in &self.blocks {
            out.push_str(&format!(
                "if ({}) {{\n\tprint('{}');\n}}\n\n",
                block.guard, block.tag
            ));
        }
        out
    }
}

pub fn synthesize_program<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &SymbolPool,
    shape: &ProgramShape,
) -> SynthesizedProgram {
    let count = shape.blocks.sample(rng);
    let first_line = SynthesizedProgram::first_block_line();
    let blocks = (0..count)
        .map(|index| ConditionalBlock {
            guard: synthesize_expression(rng, pool, &shape.guard),
            tag: format!("Got me, {index}!"),
            line: first_line + index * BLOCK_LINES,
        })
        .collect();
    SynthesizedProgram { blocks }
}
