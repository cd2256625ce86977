//! Widget configuration resolution
//!
//! The effective configuration handed to the widget is a built-in default,
//! picked by data source, with the administrator's JSON override deep-merged
//! on top. It is recomputed on every render.

mod defaults;
mod effective;
mod merge;
mod resolver;

pub use defaults::{DefaultProfile, DEFAULT_EXTENDED_MARKER};
pub use effective::{EffectiveConfig, OverrideStatus};
pub use merge::deep_merge;
pub use resolver::{resolve_config, validate_and_normalize_config, ConfigResolver, ResolverOptions};
