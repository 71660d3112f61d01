pub mod retain;
pub mod response;

pub use retain::*;
pub use response::*;
