/// 韩国麻将游戏引擎
///
/// 牌墙构建与抽牌顺序模拟、牌型与役判定、动作裁定、
/// 回合状态机和跨局计分。渲染与输入由外部协作方承担。

pub mod engine;
pub mod game;
pub mod tile;

// 重新导出常用类型
pub use engine::action_resolver::ActionResolver;
pub use game::action::{CallAction, SelfAction};
pub use game::action_callback::{DecisionSource, PassiveSource, SimpleAi};
pub use game::events::GameEvent;
pub use game::game_engine::{GameEngine, GameError};
pub use game::kong::{KongHandler, KongType};
pub use game::match_control::{MatchController, RoundRecord};
pub use game::player::Player;
pub use game::pong::PungHandler;
pub use game::scoring::{Meld, Settlement};
pub use game::state::{
    DecisionKind, GameState, Phase, PendingDecision, RoundOutcome, WinKind, WinSummary,
};
pub use game::yaku::{HandEvaluator, WinContext, WinEvaluation, Yaku};
pub use tile::{Hand, Tile, WallManager, WinChecker};
