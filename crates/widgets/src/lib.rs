pub mod language;
pub mod media;
pub mod template;

pub use language::LanguageWidget;
pub use media::MediaWidget;
pub use template::Segment;
