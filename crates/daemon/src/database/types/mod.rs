mod privacy;
mod role;

pub use privacy::Privacy;
pub use role::Role;
