//! Output formats: sunburst page, dendrogram SVG, terminal tree

pub mod page;
pub mod svg;
pub mod text;

pub use page::{sunburst_figure, sunburst_page};
pub use svg::dendrogram_svg;
pub use text::TreeNodeConvert;
