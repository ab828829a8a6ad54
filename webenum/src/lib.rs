pub mod handlers;

pub use handlers::{EnumArgs, expand_path, normalize_seed, render_banner, write_outputs};
