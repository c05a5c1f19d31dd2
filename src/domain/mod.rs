pub mod article;
pub mod headline;

pub use article::{ArticleBody, ContentSource, FetchedPage};
pub use headline::Headline;
