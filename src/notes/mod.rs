pub mod banner;
pub mod renderer;

pub use banner::{choose_banner, IndexSource, OsRandom};
pub use renderer::NoteRenderer;
