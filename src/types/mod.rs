pub mod bar;
pub mod feature;
pub mod forecast;

pub use bar::*;
pub use feature::*;
pub use forecast::*;
