pub mod approximation;
pub mod autodiff;
pub mod calculation;
pub mod compiler;
pub mod differentiate;
pub mod error;
pub mod expr;
pub mod format;
pub mod functions;
pub mod interpret;
pub mod lexer;
pub mod parser;
pub mod sampler;
pub mod settings;
/// The `taylor_core` crate is the numeric engine behind the Taylor approximation
/// explorer. It turns a user-typed expression in `x` into a tree, differentiates
/// it symbolically, and evaluates everything through a small bytecode VM that
/// never panics on bad input.
///
/// Key components:
/// - **Parser**: `lexer` + `parser` build an `Expr` with positioned syntax errors.
/// - **Differentiate**: symbolic first and second derivatives with light folding.
/// - **Compiler**: post-order bytecode and a stack VM, generic over `Scalar`.
/// - **Autodiff**: Dual numbers for forward-mode cross-checks of the symbolic rules.
/// - **Calculation**: the full pipeline from source text to formulas and plot samples.
pub mod traits;

pub use calculation::{calculate, calculate_with, Calculation, PreparedExpression};
pub use error::{EngineError, Order, Result};
pub use expr::Expr;
pub use settings::{CalculationSettings, SamplerSettings};
