mod error;
mod eval;
mod index;
mod lazy;
mod navigable;
mod ops;
mod parse;
mod path;
mod unbox;
mod value;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{NavError, NavErrorKind, PathError, PathErrorKind};
pub use eval::{navigate, navigate_with};
pub use index::{
    BitsIndex, Fetch, FetchError, LazyIndex, RecordIndex, SeqIndex, TextIndex, TupleIndex, index,
};
pub use lazy::{LazyItem, LazyItems, LazySeq};
pub use navigable::Navigable;
pub use ops::{OpFn, OpRegistry, default_registry};
pub use parse::{path_from_json, path_from_yaml};
pub use path::{Key, OpCall, OpScope, Segment, Span};
pub use unbox::{unbox_one, values};
pub use value::{TupleValue, Value};
