pub mod amount;
pub mod deadline;
pub(crate) mod dates;
pub mod extract;
pub mod filter;
pub mod normalize;
pub mod orchestrator;
pub mod rate_limit;
pub mod retry;
pub mod sources;
pub mod validate;
