use rand::Rng;

use crate::engine::action_resolver::ActionResolver;
use crate::game::action::{CallAction, SelfAction};
use crate::game::action_callback::DecisionSource;
use crate::game::constants::{MAX_DECISION_RETRIES, MAX_TURNS};
use crate::game::events::{emit, GameEvent};
use crate::game::kong::KongHandler;
use crate::game::pong::PungHandler;
use crate::game::state::{
    CallCandidate, CallResponse, GameState, Phase, PendingDecision, RoundOutcome, WinKind,
    WinSummary,
};
use crate::game::yaku::{HandEvaluator, WinContext, WinEvaluation, Yaku};
use crate::tile::tile::Wind;
use crate::tile::wall::WallManager;
use crate::tile::Tile;

/// 状态机错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// 无效的座位
    InvalidSeat,
    /// 当前阶段不接受该操作
    InvalidPhase,
    /// 决策来源提交了非法输入（打不存在的牌、选未提供的动作）；
    /// 状态不变，调用方应重新征询
    ProtocolViolation,
}

/// 对局状态机
///
/// 驱动一局的完整流程：掷骰 → 配牌 → 摸打/鸣牌循环 → 和牌或流局。
/// 牌墙、手牌判定、动作裁定分别委托给 WallManager、HandEvaluator
/// 和 ActionResolver；决策（弃哪张、杠不杠、鸣不鸣）全部来自
/// 外部的 DecisionSource。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameEngine {
    /// 对局状态
    pub state: GameState,
    /// 牌墙
    pub wall: WallManager,
    /// 事件日志（可排空）
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// 创建新的对局
    pub fn new(dealer: u8, round_wind: Wind, wall: WallManager) -> Self {
        Self {
            state: GameState::new(dealer % 4, round_wind),
            wall,
            events: Vec::new(),
        }
    }

    /// 掷骰并设定开牌位置
    ///
    /// 返回两个骰子的点数。
    pub fn roll_dice<R: Rng>(&mut self, rng: &mut R) -> Result<(u8, u8), GameError> {
        if self.state.phase != Phase::AwaitingDiceRoll {
            return Err(GameError::InvalidPhase);
        }

        let dice = (rng.gen_range(1..=6u8), rng.gen_range(1..=6u8));
        let dice_sum = dice.0 + dice.1;
        self.wall
            .set_break_position(dice_sum, self.state.dealer as usize);
        self.state.phase = Phase::DealingTiles;
        emit(
            &mut self.events,
            GameEvent::BreakPositionSet {
                dice_sum,
                dealer: self.state.dealer,
            },
        );
        Ok(dice)
    }

    /// 配牌：庄家起每家 3 轮 4 张，再各 1 张，庄家多 1 张（共 14 张）
    ///
    /// 配牌中摸到花牌直接置出并从一般牌墙补摸。
    pub fn deal(&mut self) -> Result<(), GameError> {
        if self.state.phase != Phase::DealingTiles {
            return Err(GameError::InvalidPhase);
        }

        let dealer = self.state.dealer;
        let mut order: Vec<u8> = Vec::new();
        for _ in 0..3 {
            for i in 0..4u8 {
                let seat = (dealer + i) % 4;
                for _ in 0..4 {
                    order.push(seat);
                }
            }
        }
        for i in 0..4u8 {
            order.push((dealer + i) % 4);
        }
        order.push(dealer);

        for seat in order {
            if !self.deal_one(seat) {
                // 配牌阶段就把 104 张摸穿是不可能的，纯防御
                self.end_in_draw();
                return Ok(());
            }
        }

        emit(&mut self.events, GameEvent::TilesDealt { dealer });
        self.state.phase = Phase::SeatTurn;
        self.state.current_seat = dealer;
        self.begin_turn();
        Ok(())
    }

    /// 配牌摸一张；花牌置出后继续从一般牌墙补摸
    fn deal_one(&mut self, seat: u8) -> bool {
        loop {
            let Some(tile) = self.wall.draw_live_tile() else {
                return false;
            };
            if tile.is_flower() {
                self.state.player_mut(seat).stash_flower(tile);
                emit(&mut self.events, GameEvent::FlowerStashed { seat });
                continue;
            }
            self.state.player_mut(seat).hand.add_tile(tile);
            return true;
        }
    }

    /// 进入当前座位的回合
    ///
    /// 手牌已满（配牌直后的庄家、碰杠之后）就跳过摸牌直接进入
    /// 自家动作/弃牌决策；否则摸牌、补花、查自摸。
    fn begin_turn(&mut self) {
        self.state.turn += 1;
        if self.state.turn > MAX_TURNS {
            // 活锁护栏，不属于计分规则
            log::warn!("turn guard tripped at {}", self.state.turn);
            self.end_in_draw();
            return;
        }

        let seat = self.state.current_seat;
        let player = self.state.player(seat);
        let full_size = player.full_hand_size();
        let rest_size = player.rest_hand_size();
        let hand_size = player.hand.total_count();

        if hand_size == full_size {
            // 庄家配牌直后的 14 张视作首摸，查天和
            if self.state.turn == 1 && seat == self.state.dealer {
                if let Some(evaluation) = self.evaluate_self_draw(seat) {
                    self.finalize_win(seat, WinKind::SelfDraw, evaluation);
                    return;
                }
            }
            self.set_pending_after_draw(seat);
            return;
        }

        if hand_size != rest_size {
            // 手牌数与副露数对不上说明内部不变量已破坏
            log::error!(
                "seat {} hand size {} mismatches rest size {}",
                seat,
                hand_size,
                rest_size
            );
            self.end_in_draw();
            return;
        }

        // 摸牌；牌墙枯竭即流局
        let Some(mut tile) = self.wall.draw_live_tile() else {
            self.end_in_draw();
            return;
        };
        emit(
            &mut self.events,
            GameEvent::TileDrawn {
                seat,
                from_dead_wall: false,
            },
        );

        // 花牌置出，从王牌补摸
        while tile.is_flower() {
            self.state.player_mut(seat).stash_flower(tile);
            emit(&mut self.events, GameEvent::FlowerStashed { seat });
            let Some(replacement) = self.wall.draw_dead_tile() else {
                self.end_in_draw();
                return;
            };
            emit(
                &mut self.events,
                GameEvent::TileDrawn {
                    seat,
                    from_dead_wall: true,
                },
            );
            tile = replacement;
        }

        self.state.draw_counts[seat as usize] += 1;
        self.state.player_mut(seat).hand.add_tile(tile);
        self.state.drawn_tile = Some(tile);

        // 自摸判定
        if let Some(evaluation) = self.evaluate_self_draw(seat) {
            self.finalize_win(seat, WinKind::SelfDraw, evaluation);
            return;
        }

        self.set_pending_after_draw(seat);
    }

    /// 摸牌后的决策：有自家动作先问动作，否则等待弃牌
    fn set_pending_after_draw(&mut self, seat: u8) {
        let player = self.state.player(seat);
        let options = ActionResolver::legal_self_actions(player, self.state.drawn_tile);
        self.state.pending = if options.is_empty() {
            PendingDecision::Discard { seat }
        } else {
            PendingDecision::SelfAction { seat, options }
        };
    }

    /// 以当前手牌做自摸判定
    fn evaluate_self_draw(&self, seat: u8) -> Option<WinEvaluation> {
        let player = self.state.player(seat);
        let ctx = self.win_context(seat, true);
        HandEvaluator::evaluate(&player.hand, &player.melds, &ctx)
    }

    /// 构造和牌上下文
    fn win_context(&self, seat: u8, is_self_drawn: bool) -> WinContext {
        let player = self.state.player(seat);
        WinContext {
            is_self_drawn,
            is_concealed: player.is_concealed(),
            seat_wind: player.wind,
            round_wind: self.state.round_wind,
            flower_count: player.flower_count(),
        }
    }

    /// 提交自家动作选择（None 为放弃）
    ///
    /// 选择未提供的动作被拒绝并保持等待状态，重新征询。
    pub fn submit_self_action(
        &mut self,
        seat: u8,
        choice: Option<SelfAction>,
    ) -> Result<(), GameError> {
        if seat >= 4 {
            return Err(GameError::InvalidSeat);
        }
        let options = match &self.state.pending {
            PendingDecision::SelfAction {
                seat: pending_seat,
                options,
            } if *pending_seat == seat => options.clone(),
            PendingDecision::SelfAction { .. } => return self.reject(seat),
            _ => return Err(GameError::InvalidPhase),
        };

        let Some(action) = choice else {
            self.state.pending = PendingDecision::Discard { seat };
            return Ok(());
        };
        if !options.contains(&action) {
            return self.reject(seat);
        }

        let executed = match action {
            SelfAction::ClosedKong { tile } => {
                KongHandler::closed_kong(self.state.player_mut(seat), tile)
            }
            SelfAction::AddedKong { tile } => {
                KongHandler::added_kong(self.state.player_mut(seat), tile)
            }
        };
        if !executed {
            return self.reject(seat);
        }

        emit(&mut self.events, GameEvent::SelfActionTaken { seat, action });
        self.state.drawn_tile = None;
        self.kong_replacement(seat);
        Ok(())
    }

    /// 杠后从王牌补牌，对补进的牌重新查自摸和自家动作
    fn kong_replacement(&mut self, seat: u8) {
        let Some(mut tile) = self.wall.draw_dead_tile() else {
            self.end_in_draw();
            return;
        };
        emit(
            &mut self.events,
            GameEvent::TileDrawn {
                seat,
                from_dead_wall: true,
            },
        );

        while tile.is_flower() {
            self.state.player_mut(seat).stash_flower(tile);
            emit(&mut self.events, GameEvent::FlowerStashed { seat });
            let Some(replacement) = self.wall.draw_dead_tile() else {
                self.end_in_draw();
                return;
            };
            emit(
                &mut self.events,
                GameEvent::TileDrawn {
                    seat,
                    from_dead_wall: true,
                },
            );
            tile = replacement;
        }

        self.state.draw_counts[seat as usize] += 1;
        self.state.player_mut(seat).hand.add_tile(tile);
        self.state.drawn_tile = Some(tile);

        if let Some(evaluation) = self.evaluate_self_draw(seat) {
            self.finalize_win(seat, WinKind::SelfDraw, evaluation);
            return;
        }
        self.set_pending_after_draw(seat);
    }

    /// 提交弃牌
    ///
    /// 打出手牌中不存在的牌被拒绝，状态不变，重新征询。
    pub fn submit_discard(&mut self, seat: u8, tile: Tile) -> Result<(), GameError> {
        if seat >= 4 {
            return Err(GameError::InvalidSeat);
        }
        match &self.state.pending {
            PendingDecision::Discard { seat: pending_seat } if *pending_seat == seat => {}
            PendingDecision::Discard { .. } => return self.reject(seat),
            _ => return Err(GameError::InvalidPhase),
        }

        if !self.state.player_mut(seat).hand.remove_tile(tile) {
            return self.reject(seat);
        }

        self.state.player_mut(seat).discards.push(tile);
        self.state.total_discards += 1;
        self.state.last_discard = Some((seat, tile));
        self.state.drawn_tile = None;
        emit(&mut self.events, GameEvent::Discarded { seat, tile });

        // 其余三家的响应候选，按座位枚举顺序
        let mut candidates = Vec::new();
        for other in 0..4u8 {
            if other == seat {
                continue;
            }
            let options = ActionResolver::legal_call_actions(
                self.state.player(other),
                tile,
                self.state.round_wind,
            );
            if !options.is_empty() {
                candidates.push(CallCandidate {
                    seat: other,
                    options,
                    response: None,
                });
            }
        }

        if candidates.is_empty() {
            self.advance_seat();
        } else {
            self.state.phase = Phase::AwaitingCallDecision;
            self.state.pending = PendingDecision::Calls { candidates };
        }
        Ok(())
    }

    /// 提交某一候选座位的鸣牌应答（None 为放弃）
    ///
    /// 全部候选座位应答后统一做优先裁定。
    pub fn submit_call_decision(
        &mut self,
        seat: u8,
        choice: Option<CallAction>,
    ) -> Result<(), GameError> {
        if seat >= 4 {
            return Err(GameError::InvalidSeat);
        }

        // 先做只读校验，再写入，避免在等待状态上长期持有可变借用
        let accepted = match &self.state.pending {
            PendingDecision::Calls { candidates } => {
                match candidates
                    .iter()
                    .find(|c| c.seat == seat && c.response.is_none())
                {
                    None => false,
                    Some(candidate) => match choice {
                        None => true,
                        Some(action) => candidate.options.contains(&action),
                    },
                }
            }
            _ => return Err(GameError::InvalidPhase),
        };
        if !accepted {
            return self.reject(seat);
        }

        let mut all_responded = false;
        if let PendingDecision::Calls { candidates } = &mut self.state.pending {
            if let Some(candidate) = candidates
                .iter_mut()
                .find(|c| c.seat == seat && c.response.is_none())
            {
                candidate.response = Some(match choice {
                    None => CallResponse::Pass,
                    Some(action) => CallResponse::Take(action),
                });
            }
            all_responded = candidates.iter().all(|c| c.response.is_some());
        }
        if all_responded {
            self.resolve_calls();
        }
        Ok(())
    }

    /// 所有候选应答齐全后的优先裁定与执行
    fn resolve_calls(&mut self) {
        let PendingDecision::Calls { candidates } = &self.state.pending else {
            return;
        };
        let chosen: Vec<(u8, CallAction)> = candidates
            .iter()
            .filter_map(|c| match c.response {
                Some(CallResponse::Take(action)) => Some((c.seat, action)),
                _ => None,
            })
            .collect();

        let Some((discarder, _)) = self.state.last_discard else {
            log::error!("call resolution without a discard on record");
            self.end_in_draw();
            return;
        };

        match ActionResolver::resolve_priority(&chosen) {
            None => {
                self.state.phase = Phase::SeatTurn;
                self.advance_seat();
            }
            Some((caller, action)) => {
                let tile = action.tile();
                self.state.player_mut(discarder).take_last_discard();
                emit(
                    &mut self.events,
                    GameEvent::CallResolved {
                        seat: caller,
                        action,
                        from_seat: discarder,
                    },
                );

                match action {
                    CallAction::Ron { .. } => {
                        self.state.player_mut(caller).hand.add_tile(tile);
                        let ctx = self.win_context(caller, false);
                        let player = self.state.player(caller);
                        match HandEvaluator::evaluate(&player.hand, &player.melds, &ctx) {
                            Some(evaluation) => {
                                self.finalize_win(caller, WinKind::Discard { discarder }, evaluation);
                            }
                            None => {
                                // 候选阶段已验证过，这里失败说明不变量破坏
                                log::error!("ron evaluation failed after validation");
                                self.end_in_draw();
                            }
                        }
                    }
                    CallAction::OpenKong { .. } => {
                        KongHandler::open_kong(self.state.player_mut(caller), tile, discarder);
                        self.state.any_call_made = true;
                        self.state.current_seat = caller;
                        self.state.phase = Phase::SeatTurn;
                        self.kong_replacement(caller);
                    }
                    CallAction::Pung { .. } => {
                        PungHandler::pung(self.state.player_mut(caller), tile, discarder);
                        self.state.any_call_made = true;
                        self.state.current_seat = caller;
                        self.state.phase = Phase::SeatTurn;
                        self.state.pending = PendingDecision::Discard { seat: caller };
                    }
                }
            }
        }
    }

    /// 轮到下一座位
    fn advance_seat(&mut self) {
        self.state.current_seat = (self.state.current_seat + 1) % 4;
        emit(
            &mut self.events,
            GameEvent::TurnAdvanced {
                seat: self.state.current_seat,
            },
        );
        self.begin_turn();
    }

    /// 和牌收尾：补天地人和标记，定格结果
    fn finalize_win(&mut self, winner: u8, kind: WinKind, evaluation: WinEvaluation) {
        let mut yaku = evaluation.yaku;
        let blessed = match kind {
            WinKind::SelfDraw => {
                if winner == self.state.dealer
                    && self.state.total_discards == 0
                    && !self.state.any_call_made
                    && self.state.draw_counts[winner as usize] == 0
                {
                    Some(Yaku::HeavenlyHand)
                } else if winner != self.state.dealer
                    && self.state.draw_counts[winner as usize] == 1
                    && !self.state.any_call_made
                {
                    Some(Yaku::EarthlyHand)
                } else {
                    None
                }
            }
            WinKind::Discard { .. } => {
                if self.state.draw_counts[winner as usize] == 0 && !self.state.any_call_made {
                    Some(Yaku::HumanHand)
                } else {
                    None
                }
            }
        };

        let is_self_drawn = matches!(kind, WinKind::SelfDraw);
        let score = if let Some(tag) = blessed {
            yaku.push(tag);
            let ctx = self.win_context(winner, is_self_drawn);
            crate::game::scoring::total_score(&yaku, &ctx)
        } else {
            evaluation.score
        };

        let summary = WinSummary {
            winner,
            kind,
            yaku,
            score,
        };
        self.state.pending = PendingDecision::None;
        self.state.phase = Phase::RoundEnd(RoundOutcome::Win(summary.clone()));
        emit(
            &mut self.events,
            GameEvent::RoundEnded {
                outcome: RoundOutcome::Win(summary),
            },
        );
    }

    /// 流局收尾（牌墙枯竭、护栏触发、决策来源失效）
    fn end_in_draw(&mut self) {
        self.state.pending = PendingDecision::None;
        self.state.phase = Phase::RoundEnd(RoundOutcome::Draw);
        emit(
            &mut self.events,
            GameEvent::RoundEnded {
                outcome: RoundOutcome::Draw,
            },
        );
    }

    /// 拒绝非法提交：记录事件，状态不变
    fn reject(&mut self, seat: u8) -> Result<(), GameError> {
        emit(&mut self.events, GameEvent::ProtocolViolation { seat });
        Err(GameError::ProtocolViolation)
    }

    /// 驱动一整局：掷骰、配牌，然后循环征询决策直到局终
    ///
    /// 同一个决策连续被拒超过上限时按流局收尾（防御失效的
    /// 决策来源，正常来源不会触发）。
    pub fn run_round<R: Rng>(
        &mut self,
        source: &mut dyn DecisionSource,
        rng: &mut R,
    ) -> Result<RoundOutcome, GameError> {
        if self.state.phase == Phase::AwaitingDiceRoll {
            self.roll_dice(rng)?;
        }
        if self.state.phase == Phase::DealingTiles {
            self.deal()?;
        }

        let mut retries = 0u8;
        while !self.state.is_round_over() {
            let result = match self.state.pending.clone() {
                PendingDecision::Discard { seat } => {
                    let tile = source.choose_discard(&self.state, seat);
                    self.submit_discard(seat, tile)
                }
                PendingDecision::SelfAction { seat, options } => {
                    let choice = source.choose_self_action(&self.state, seat, &options);
                    self.submit_self_action(seat, choice)
                }
                PendingDecision::Calls { candidates } => {
                    match candidates.iter().find(|c| c.response.is_none()) {
                        Some(candidate) => {
                            let choice =
                                source.choose_call(&self.state, candidate.seat, &candidate.options);
                            self.submit_call_decision(candidate.seat, choice)
                        }
                        None => {
                            // 应答齐全却没有裁定，不变量破坏
                            log::error!("call decision stuck with all responses present");
                            self.end_in_draw();
                            Ok(())
                        }
                    }
                }
                PendingDecision::None => {
                    log::error!("round loop reached an idle pending state");
                    self.end_in_draw();
                    Ok(())
                }
            };

            match result {
                Ok(()) => retries = 0,
                Err(GameError::ProtocolViolation) => {
                    retries += 1;
                    if retries > MAX_DECISION_RETRIES {
                        log::warn!("decision source keeps violating protocol, ending in draw");
                        self.end_in_draw();
                    }
                }
                Err(error) => return Err(error),
            }
        }

        match &self.state.phase {
            Phase::RoundEnd(outcome) => Ok(outcome.clone()),
            _ => Err(GameError::InvalidPhase),
        }
    }

    /// 剩余牌数（查询接口）
    pub fn remaining_tiles(&self) -> usize {
        self.wall.remaining_count()
    }

    /// 局结果（未结束时为 None）
    pub fn outcome(&self) -> Option<&RoundOutcome> {
        match &self.state.phase {
            Phase::RoundEnd(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// 和牌摘要（和牌弹窗用）
    pub fn last_win(&self) -> Option<&WinSummary> {
        match self.outcome() {
            Some(RoundOutcome::Win(summary)) => Some(summary),
            _ => None,
        }
    }

    /// 排空事件日志
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// 只读事件日志
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// 全桌牌数守恒检查：牌墙 + 手牌 + 副露 + 花牌 + 弃牌
    ///
    /// 任何时刻都应恰好等于 104。
    pub fn total_tiles_in_play(&self) -> usize {
        let held: usize = self
            .state
            .players
            .iter()
            .map(|p| {
                p.hand.total_count() + p.meld_tile_count() + p.flowers.len() + p.discards.len()
            })
            .sum();
        self.wall.remaining_count() + held
    }
}
