//! Application services. Each module imports only from `scalegate_common`
//! and `crate::application::ports`.

pub mod confirm;
