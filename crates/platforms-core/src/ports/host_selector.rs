//! HostSelector port - 解決済みプラットフォームからホストを 1 つ選ぶ
//!
//! # 実装
//! - `RandomHost`: 一様ランダム（デフォルト）
//! - `FirstHost`: 常に先頭のホスト
//!
//! # 将来の拡張
//! - ヘルスチェックや負荷を考慮した選択もこの trait を実装する

use crate::domain::{HostSelectionError, PlatformDefinition};

/// Picks the host a job for `platform` is submitted to.
pub trait HostSelector {
    /// Name the strategy is configured by (e.g. `"random"`).
    fn name(&self) -> &'static str;

    fn select<'p>(&self, platform: &'p PlatformDefinition)
    -> Result<&'p str, HostSelectionError>;
}
