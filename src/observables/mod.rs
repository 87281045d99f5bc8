/// Observable definitions on top of the angular coefficient algebra: the point
/// quantities, the combinators building differential and binned predictions from them,
/// and the registry exposing every prediction under a unique name.
pub mod batch;
pub mod catalog;
pub mod combinators;
pub mod quantity;
pub mod registry;

pub use batch::{evaluate_batch, BatchResult, Request};
pub use combinators::Inputs;
pub use quantity::{CoefficientSet, PointObservable, Quantity};
pub use registry::{Arity, Observable, Prediction, Registry, Tolerance};
