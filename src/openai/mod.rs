pub mod completion;
pub mod responses;
