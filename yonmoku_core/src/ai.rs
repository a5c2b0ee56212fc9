/// アルファベータ探索AI（戦術チェック + 反復深化）。
pub mod alphabeta;
/// 探索エンジンの設定とプリセット。
pub mod config;
pub mod types;

pub type Agent = alphabeta::Agent;
pub type EngineConfig = config::EngineConfig;
pub type MoveRequest<'req> = types::MoveRequest<'req>;
