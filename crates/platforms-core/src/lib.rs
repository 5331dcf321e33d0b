//! platforms-core
//!
//! タスクのジョブ投入先となる実行プラットフォームを決定する。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（PlatformDefinition, TaskConfig, errors）
//! - **registry**: パターンをキーとする順序付きレジストリと TOML ローダー
//! - **resolve**: 名前による解決、legacy host/batch-system からの推定、両者の衝突チェック
//! - **ports**: 抽象化レイヤー（HostSelector）
//! - **impls**: ホスト選択の実装（random, first）

pub mod domain;
pub mod registry;
pub mod resolve;
pub mod ports;
pub mod impls;

pub use domain::{
    Conflict, Deprecation, HostSelectionError, PlatformDefinition, PlatformLookupError, RegistryError,
    Section, TaskConfig, TaskPlatform,
};
pub use impls::{FirstHost, HostSelectionMethod, RandomHost, select_host};
pub use ports::HostSelector;
pub use registry::{PlatformRegistry, RegistryEntry};
pub use resolve::{PlatformResolver, Resolution, ResolveMode};
