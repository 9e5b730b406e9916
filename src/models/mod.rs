pub mod card;
pub mod enums;

pub use card::*;
pub use enums::*;
