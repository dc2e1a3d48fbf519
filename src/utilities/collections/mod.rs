pub mod index_set;
pub mod quicklist;

pub use index_set::IndexSet;
pub use quicklist::QuickList;
