//! Ports - 差し替え可能な振る舞いの抽象化レイヤー
//!
//! 解決そのものはタスク設定とレジストリだけで決まる純粋な処理。
//! 解決後の処理（具体的なホストの選択など）はここの trait を経由する。

pub mod host_selector;

pub use self::host_selector::HostSelector;
