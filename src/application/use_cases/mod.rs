pub mod price_acquisition;
pub mod returns_view;

pub use price_acquisition::*;
pub use returns_view::*;
