pub mod capabilities;
pub mod visitor;

pub use self::capabilities::{Capabilities, EntryPoints, Version};
pub use self::visitor::GLVisitor;
