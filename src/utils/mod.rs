//! Commonly used utilities like handles and pools.

#[macro_use]
pub mod handle;
pub mod handle_object_pool;

mod rect;

pub use self::handle::{Handle, HandleIndex};
pub use self::handle_object_pool::HandleObjectPool;
pub use self::rect::Rect;
