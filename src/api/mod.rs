mod expire;

pub use expire::ExpireFailure;
pub use expire::ExpireSummary;
