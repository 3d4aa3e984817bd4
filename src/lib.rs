mod systems;
pub use systems::*;

mod simulator;
pub use simulator::*;

mod extrema;
pub use extrema::*;

mod sweep;
pub use sweep::*;

mod curve;
pub use curve::*;

mod scene;
pub use scene::*;
