//! Connect Four (四目並べ) core logic.
//!
//! このクレートは盤面表現を提供する `engine` と、手を選択する `ai` を提供します。
//! 対局の進行（手番交代・合法性の強制・勝敗の確定）はホスト環境側の責務で、
//! ホストは毎手 `ai::alphabeta::Agent::choose_move` を呼び出すことを想定しています。

#![forbid(unsafe_code)]

/// 盤面表現（着手・取り消し・勝ち判定・スナップショット）を提供するモジュール。
pub mod engine;

/// AI（手選択アルゴリズム）を提供するモジュール。
pub mod ai;

/// 公開 API のエラー型。
pub mod error;

/// `tracing` サブスクライバの初期化。
pub mod logging;
