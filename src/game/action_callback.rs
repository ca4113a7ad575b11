use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::game::action::{CallAction, SelfAction};
use crate::game::state::GameState;
use crate::tile::Tile;

/// 决策来源
///
/// 状态机在每个决策点（弃牌、自家动作、鸣牌应答）向决策来源
/// 征询，人类输入层和 AI 策略实现同一接口。任何满足接口的
/// 策略都可接入；引擎只校验合法性。
pub trait DecisionSource {
    /// 选择要打出的牌
    fn choose_discard(&mut self, state: &GameState, seat: u8) -> Tile;

    /// 在给定的自家动作中选择一个，或 None 放弃
    fn choose_self_action(
        &mut self,
        state: &GameState,
        seat: u8,
        options: &[SelfAction],
    ) -> Option<SelfAction>;

    /// 对弃牌的应答：选择一个响应动作，或 None 放弃
    fn choose_call(
        &mut self,
        state: &GameState,
        seat: u8,
        options: &[CallAction],
    ) -> Option<CallAction>;
}

/// 参考 AI：第一个合法动作 + 字牌优先的加权随机弃牌
///
/// 只是占位策略，不做任何牌效率计算。
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleAi;

impl DecisionSource for SimpleAi {
    fn choose_discard(&mut self, state: &GameState, seat: u8) -> Tile {
        let hand = state.player(seat).hand.to_sorted_vec();
        let mut rng = thread_rng();

        // 1 顺位：字牌随机打一张
        let honors: Vec<Tile> = hand.iter().copied().filter(Tile::is_honor).collect();
        if let Some(tile) = honors.choose(&mut rng) {
            return *tile;
        }

        // 2 顺位：数牌随机打一张；手牌为空在协议上不可能，
        // 这里返回的占位值会被引擎当作非法弃牌拒绝
        hand.choose(&mut rng).copied().unwrap_or(Tile::Man(1))
    }

    fn choose_self_action(
        &mut self,
        _state: &GameState,
        _seat: u8,
        options: &[SelfAction],
    ) -> Option<SelfAction> {
        options.first().copied()
    }

    fn choose_call(
        &mut self,
        _state: &GameState,
        _seat: u8,
        options: &[CallAction],
    ) -> Option<CallAction> {
        options.first().copied()
    }
}

/// 从不鸣牌、打出刚摸牌的消极策略（测试用）
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveSource;

impl DecisionSource for PassiveSource {
    fn choose_discard(&mut self, state: &GameState, seat: u8) -> Tile {
        // 优先打刚摸的牌，否则打排序后的第一张
        if let Some(tile) = state.drawn_tile {
            if state.current_seat == seat && state.player(seat).hand.has_tile(tile) {
                return tile;
            }
        }
        state
            .player(seat)
            .hand
            .to_sorted_vec()
            .first()
            .copied()
            .unwrap_or(Tile::Man(1))
    }

    fn choose_self_action(
        &mut self,
        _state: &GameState,
        _seat: u8,
        _options: &[SelfAction],
    ) -> Option<SelfAction> {
        None
    }

    fn choose_call(
        &mut self,
        _state: &GameState,
        _seat: u8,
        options: &[CallAction],
    ) -> Option<CallAction> {
        // 荣和不放过，其余一律放弃
        options
            .iter()
            .find(|a| matches!(a, CallAction::Ron { .. }))
            .copied()
    }
}
