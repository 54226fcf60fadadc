pub mod group;
pub mod heat;
pub mod info;
pub mod mode;
pub mod reconcile;
pub mod stack;
pub mod symbology;

pub use group::*;
pub use heat::*;
pub use mode::*;
pub use reconcile::*;
pub use stack::*;
