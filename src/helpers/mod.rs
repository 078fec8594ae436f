pub mod email;
pub mod fonts;
pub mod pdf;
pub mod signature;
