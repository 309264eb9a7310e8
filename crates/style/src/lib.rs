pub mod font;
pub mod page;
pub mod text;

pub use font::{FontStyle, FontWeight};
pub use page::{Margins, PageLayout, PageSize, StyleParseError};
pub use text::{TextAlign, TextStyle, VerticalAlign};
