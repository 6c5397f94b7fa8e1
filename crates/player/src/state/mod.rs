//! Client-side state containers.

mod sheet_store;

pub use sheet_store::{Listener, SheetStore, Subscription};
