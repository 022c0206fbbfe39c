pub mod nbp;
pub mod util;
