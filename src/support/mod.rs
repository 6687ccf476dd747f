pub mod enums;
pub mod errors;
pub mod hashing;
pub mod id;
pub mod merge_patch;
pub mod serializations;
pub mod time;
