//! Per-hardfork rules bundles and their selection by block.

mod gas;
pub use gas::*;

mod precompiles;
pub use precompiles::*;

mod schedule;
pub use schedule::*;

mod spec;
pub use spec::*;
