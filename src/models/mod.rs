//! Model implementations bundled with the gateway binary.

pub mod echo;
pub mod textstats;

pub use echo::EchoModel;
pub use textstats::TextStatsModel;

use crate::model::ModelBinder;

/// A binder pre-registered with every bundled implementation.
pub fn builtin_binder() -> ModelBinder {
    let mut binder = ModelBinder::new();
    binder.register(EchoModel);
    binder.register(TextStatsModel);
    binder
}
