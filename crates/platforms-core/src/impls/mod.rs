//! Impls - ホスト選択戦略の実装

pub mod host_select;

pub use self::host_select::{FirstHost, HostSelectionMethod, RandomHost, select_host};
