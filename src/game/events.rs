use crate::game::action::{CallAction, SelfAction};
use crate::game::state::RoundOutcome;
use crate::tile::Tile;

/// 状态机事件
///
/// 每次状态转移和决策点都会产生一条事件，追加进引擎的事件
/// 日志并镜像到 `log::debug!`；测试挂具和观测协作方从日志
/// 订阅，不参与控制流。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameEvent {
    /// 掷骰并设定开牌位置
    BreakPositionSet { dice_sum: u8, dealer: u8 },
    /// 配牌完成
    TilesDealt { dealer: u8 },
    /// 摸牌（from_dead_wall 为 true 表示王牌补牌）
    TileDrawn { seat: u8, from_dead_wall: bool },
    /// 花牌置出
    FlowerStashed { seat: u8 },
    /// 自家动作执行（暗杠/加杠）
    SelfActionTaken { seat: u8, action: SelfAction },
    /// 弃牌
    Discarded { seat: u8, tile: Tile },
    /// 鸣牌裁定结果（响应座位、动作、放铳座位）
    CallResolved {
        seat: u8,
        action: CallAction,
        from_seat: u8,
    },
    /// 回合转移到下一座位
    TurnAdvanced { seat: u8 },
    /// 决策来源提交了非法输入，被拒绝并重新征询
    ProtocolViolation { seat: u8 },
    /// 一局结束
    RoundEnded { outcome: RoundOutcome },
}

/// 追加事件并镜像到日志
pub fn emit(journal: &mut Vec<GameEvent>, event: GameEvent) {
    log::debug!("game event: {:?}", event);
    journal.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_appends() {
        let mut journal = Vec::new();
        emit(&mut journal, GameEvent::TurnAdvanced { seat: 1 });
        emit(
            &mut journal,
            GameEvent::Discarded {
                seat: 1,
                tile: Tile::Man(3),
            },
        );
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0], GameEvent::TurnAdvanced { seat: 1 });
    }
}
