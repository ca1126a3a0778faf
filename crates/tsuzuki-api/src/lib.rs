pub mod anilist;
pub mod arm;
pub mod http;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
