//! Types shared between the simulation core and its outer surfaces.
//!
//! The HTTP server and the headless CLI both observe the world through
//! [`WorldSnapshot`]; the server drives it through [`SimulationHandle`].

pub mod driver;
pub mod snapshot;

pub use driver::SimulationHandle;
pub use snapshot::{Dimensions, SnakeView, WorldSnapshot};
