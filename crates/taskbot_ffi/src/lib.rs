//! Flutter bridge over the taskbot core.

pub mod api;
