/// 游戏逻辑模块
///
/// 包含役与计分、动作、玩家与对局状态、状态机和整场循环

pub mod action;
pub mod action_callback;
pub mod constants;
pub mod events;
pub mod game_engine;
pub mod kong;
pub mod match_control;
pub mod player;
pub mod pong;
pub mod scoring;
pub mod state;
pub mod yaku;
