use crate::game::action::{CallAction, SelfAction};
use crate::game::player::Player;
use crate::game::yaku::Yaku;
use crate::tile::tile::Wind;
use crate::tile::Tile;

/// 和牌方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WinKind {
    /// 自摸
    SelfDraw,
    /// 荣和（记录放铳座位）
    Discard { discarder: u8 },
}

/// 和牌摘要（和牌弹窗与战绩记录用）
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinSummary {
    /// 和牌座位
    pub winner: u8,
    /// 和牌方式
    pub kind: WinKind,
    /// 匹配到的役（按判定顺序）
    pub yaku: Vec<Yaku>,
    /// 总得分
    pub score: u32,
}

/// 一局的结果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RoundOutcome {
    /// 有人和牌
    Win(WinSummary),
    /// 流局（牌墙枯竭或回合数防护触发）
    Draw,
}

/// 对局阶段
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// 等待掷骰
    AwaitingDiceRoll,
    /// 配牌中
    DealingTiles,
    /// 某座位的回合
    SeatTurn,
    /// 等待对弃牌的响应
    AwaitingCallDecision,
    /// 一局结束
    RoundEnd(RoundOutcome),
}

/// 鸣牌候选：一个座位和它可选的响应动作
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallCandidate {
    pub seat: u8,
    pub options: Vec<CallAction>,
    /// None 表示尚未应答
    pub response: Option<CallResponse>,
}

/// 鸣牌应答
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CallResponse {
    Pass,
    Take(CallAction),
}

/// 当前等待的决策
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PendingDecision {
    /// 无（引擎内部推进中或一局已结束）
    None,
    /// 等待某座位选择自家动作（暗杠/加杠）或放弃
    SelfAction { seat: u8, options: Vec<SelfAction> },
    /// 等待某座位弃牌
    Discard { seat: u8 },
    /// 等待各候选座位对弃牌应答
    Calls { candidates: Vec<CallCandidate> },
}

/// 决策种类（查询接口用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DecisionKind {
    None,
    SelfAction,
    Discard,
    Call,
}

/// 对局状态
///
/// 所有可变状态集中在这一个结构里，修改只通过状态机的
/// 动作处理方法进行；渲染方只读。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    /// 玩家（4 个座位）
    pub players: [Player; 4],
    /// 庄家座位
    pub dealer: u8,
    /// 场风
    pub round_wind: Wind,
    /// 当前回合的座位
    pub current_seat: u8,
    /// 阶段
    pub phase: Phase,
    /// 当前等待的决策
    pub pending: PendingDecision,
    /// 回合计数（防活锁护栏用）
    pub turn: u32,
    /// 当前座位刚摸/补的牌（已在手牌中，等待打出）
    pub drawn_tile: Option<Tile>,
    /// 最近一次弃牌（座位、牌）
    pub last_discard: Option<(u8, Tile)>,
    /// 本局是否发生过鸣牌（天地人和判定用）
    pub any_call_made: bool,
    /// 各座位的摸牌次数
    pub draw_counts: [u16; 4],
    /// 本局总弃牌数
    pub total_discards: u32,
}

impl GameState {
    /// 创建新的对局状态
    ///
    /// 自风按庄家为东依次分配。
    pub fn new(dealer: u8, round_wind: Wind) -> Self {
        let mut players = [
            Player::new(0),
            Player::new(1),
            Player::new(2),
            Player::new(3),
        ];
        for (seat, player) in players.iter_mut().enumerate() {
            let relative = (seat as u8 + 4 - dealer) % 4;
            // relative 在 0-3 范围内，from_index 必然成功
            if let Some(wind) = Wind::from_index(relative) {
                player.wind = wind;
            }
        }

        Self {
            players,
            dealer,
            round_wind,
            current_seat: dealer,
            phase: Phase::AwaitingDiceRoll,
            pending: PendingDecision::None,
            turn: 0,
            drawn_tile: None,
            last_discard: None,
            any_call_made: false,
            draw_counts: [0; 4],
            total_discards: 0,
        }
    }

    /// 获取玩家（不可变引用）
    pub fn player(&self, seat: u8) -> &Player {
        &self.players[seat as usize]
    }

    /// 获取玩家（可变引用）
    pub fn player_mut(&mut self, seat: u8) -> &mut Player {
        &mut self.players[seat as usize]
    }

    /// 一局是否已结束
    pub fn is_round_over(&self) -> bool {
        matches!(self.phase, Phase::RoundEnd(_))
    }

    /// 当前等待的决策种类
    pub fn decision_kind(&self) -> DecisionKind {
        match &self.pending {
            PendingDecision::None => DecisionKind::None,
            PendingDecision::SelfAction { .. } => DecisionKind::SelfAction,
            PendingDecision::Discard { .. } => DecisionKind::Discard,
            PendingDecision::Calls { .. } => DecisionKind::Call,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_assignment() {
        // 庄家座位 2：座位 2 为东，3 南，0 西，1 北
        let state = GameState::new(2, Wind::East);
        assert_eq!(state.players[2].wind, Wind::East);
        assert_eq!(state.players[3].wind, Wind::South);
        assert_eq!(state.players[0].wind, Wind::West);
        assert_eq!(state.players[1].wind, Wind::North);
    }

    #[test]
    fn test_initial_phase() {
        let state = GameState::new(0, Wind::East);
        assert_eq!(state.phase, Phase::AwaitingDiceRoll);
        assert_eq!(state.decision_kind(), DecisionKind::None);
        assert!(!state.is_round_over());
        assert_eq!(state.current_seat, 0);
    }

    #[test]
    fn test_round_end_detection() {
        let mut state = GameState::new(0, Wind::East);
        state.phase = Phase::RoundEnd(RoundOutcome::Draw);
        assert!(state.is_round_over());
    }
}
