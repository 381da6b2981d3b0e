pub const ARITHMETIC_OPS: &[&str] = &["+", "-", "*", "/"];

pub const COMPARISON_OPS: &[&str] = &["==", "===", "<", ">", "<=", ">="];

pub const INPUT_VARIABLES: &[&str] = &[
    "input_number_integer",
    "input_number_real",
    "input_boolean",
    "input_string",
];

pub const CONSTANT_VARIABLES: &[&str] = &[
    "const_null",
    "const_undefined",
    "const_nan",
    "const_pos_infinity",
    "const_neg_infinity",
    "const_number_integer",
    "const_number_real",
    "const_boolean",
    "const_string",
];

pub const LITERALS: &[&str] = &[
    "null",
    "undefined",
    "NaN",
    "Infinity",
    "15",
    "7004",
    "-45",
    "0",
    "-1",
    "5.8",
    "132.3984",
    "-3434.239829382",
    "'abra'",
    "'kadabra'",
    "'18'",
    "'-60'",
    "'56.7'",
    "'-34.2'",
    "'2.0'",
    "'-7.0'",
    "'NaN'",
    "'Infinity'",
];

/// Declares every pool variable with its default value. Must stay in sync
/// with [`INPUT_VARIABLES`] and [`CONSTANT_VARIABLES`].
pub const DECLARATION_PREAMBLE: &str = "\
//--------------------------------Inputs----------------------------------------

var input_number_integer = 5; // input
var input_number_real = 6.7; // input
var input_boolean = true; // input
var input_string = 'abc'; // input

//-------------------------------Constants--------------------------------------

var const_null = null;
var const_undefined = undefined;
var const_nan = NaN;
var const_pos_infinity = Infinity;
var const_neg_infinity = -Infinity;
var const_number_integer = 7;
var const_number_real = 9.877;
var const_boolean = false;
var const_string = 'halelulja';

//------------------------------Conditions--------------------------------------

";

/// Read-only symbol tables an expression draws its operands and joins from.
#[derive(Debug, Clone, Copy)]
pub struct SymbolPool {
    pub inputs: &'static [&'static str],
    pub constants: &'static [&'static str],
    pub literals: &'static [&'static str],
    pub arithmetic: &'static [&'static str],
    pub comparison: &'static [&'static str],
}

impl SymbolPool {
    pub const fn javascript() -> Self {
        Self {
            inputs: INPUT_VARIABLES,
            constants: CONSTANT_VARIABLES,
            literals: LITERALS,
            arithmetic: ARITHMETIC_OPS,
            comparison: COMPARISON_OPS,
        }
    }
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::javascript()
    }
}
