//! hf-model: the 0D network data model.
//!
//! Holds the degree-of-freedom bookkeeping, the node (wire) arena, the block
//! contract with its local element contributions, the element library, and
//! the global system matrices the blocks scatter into.

pub mod block;
pub mod blood_vessel;
pub mod coronary_bc;
pub mod dofhandler;
pub mod error;
pub mod flow_bc;
pub mod ids;
pub mod junction;
pub mod model;
pub mod node;
pub mod param;
pub mod pressure_bc;
pub mod resistance_bc;
pub mod system;
pub mod windkessel_bc;

pub use block::{Block, BlockCore, LocalEquations};
pub use blood_vessel::{BloodVessel, VesselParameters};
pub use coronary_bc::{CoronaryParameters, OpenLoopCoronaryBc};
pub use dofhandler::DofHandler;
pub use error::{ModelError, ModelResult};
pub use flow_bc::FlowBc;
pub use ids::{BlockId, NodeId};
pub use junction::Junction;
pub use model::Model;
pub use node::Node;
pub use param::Coefficient;
pub use pressure_bc::PressureBc;
pub use resistance_bc::ResistanceBc;
pub use system::SystemMatrices;
pub use windkessel_bc::WindkesselBc;
