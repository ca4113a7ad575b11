use rand::Rng;

use crate::game::action_callback::DecisionSource;
use crate::game::constants::{DEFAULT_ROUNDS, STARTING_SCORE};
use crate::game::game_engine::{GameEngine, GameError};
use crate::game::scoring::Settlement;
use crate::game::state::{RoundOutcome, WinKind};
use crate::tile::tile::Wind;
use crate::tile::wall::WallManager;

/// 一局的战绩记录
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundRecord {
    /// 第几局（1 起算）
    pub round: u32,
    /// 该局的庄家
    pub dealer: u8,
    /// 局结果
    pub outcome: RoundOutcome,
    /// 各座位的分数变动
    pub deltas: [i32; 4],
}

/// 整场比赛控制器
///
/// 固定局数的循环：分数跨局累计，庄家由上一局的赢家接任，
/// 流局时庄家连任。第一局的庄家由四家各掷两骰、取最大者决定
/// （同点取枚举顺序靠前者，沿用原规则，不做真正的平局加掷）。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MatchController {
    /// 总局数
    pub total_rounds: u32,
    /// 已完成的局数
    pub rounds_played: u32,
    /// 各座位的累计分数
    pub scores: [i32; 4],
    /// 当前庄家（第一局掷骰前为 None）
    pub dealer: Option<u8>,
    /// 各局战绩
    pub records: Vec<RoundRecord>,
}

impl MatchController {
    /// 创建指定局数的比赛
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            rounds_played: 0,
            scores: [STARTING_SCORE; 4],
            dealer: None,
            records: Vec::new(),
        }
    }

    /// 四家各掷两骰决定第一局庄家
    ///
    /// 返回每家的骰子点数。最大点数者为庄家；同点时取座位
    /// 枚举顺序的第一家。
    pub fn roll_for_initial_dealer<R: Rng>(&mut self, rng: &mut R) -> [(u8, u8); 4] {
        let mut rolls = [(0u8, 0u8); 4];
        for roll in rolls.iter_mut() {
            *roll = (rng.gen_range(1..=6u8), rng.gen_range(1..=6u8));
        }

        let mut best_seat = 0usize;
        let mut best_total = 0u8;
        for (seat, (a, b)) in rolls.iter().enumerate() {
            let total = a + b;
            if total > best_total {
                best_total = total;
                best_seat = seat;
            }
        }

        log::debug!("initial dealer rolls {:?} -> seat {}", rolls, best_seat);
        self.dealer = Some(best_seat as u8);
        rolls
    }

    /// 是否已打满
    pub fn is_finished(&self) -> bool {
        self.rounds_played >= self.total_rounds
    }

    /// 打一局并结算
    ///
    /// 庄家未定时先掷骰决定。洗牌、对局、分数结算都在这里完成；
    /// 返回该局的战绩记录。
    pub fn play_round<R: Rng>(
        &mut self,
        source: &mut dyn DecisionSource,
        rng: &mut R,
    ) -> Result<RoundRecord, GameError> {
        if self.dealer.is_none() {
            self.roll_for_initial_dealer(rng);
        }
        // roll_for_initial_dealer 之后必然已有庄家
        let dealer = self.dealer.unwrap_or(0);

        let wall = WallManager::shuffled_with(rng);
        let mut engine = GameEngine::new(dealer, Wind::East, wall);
        let outcome = engine.run_round(source, rng)?;

        let settlement = match &outcome {
            RoundOutcome::Win(summary) => match summary.kind {
                WinKind::SelfDraw => Settlement::self_draw(summary.winner, summary.score),
                WinKind::Discard { discarder } => {
                    Settlement::discard_win(summary.winner, discarder, summary.score)
                }
            },
            RoundOutcome::Draw => Settlement::draw(),
        };
        for seat in 0..4 {
            self.scores[seat] += settlement.deltas[seat];
        }

        // 庄家交接：赢家接任，流局连任
        if let RoundOutcome::Win(summary) = &outcome {
            self.dealer = Some(summary.winner);
        }

        self.rounds_played += 1;
        let record = RoundRecord {
            round: self.rounds_played,
            dealer,
            outcome,
            deltas: settlement.deltas,
        };
        self.records.push(record.clone());
        Ok(record)
    }

    /// 最终排名：按分数降序，同分按座位升序（稳定排序）
    pub fn final_ranking(&self) -> [u8; 4] {
        let mut seats = [0u8, 1, 2, 3];
        seats.sort_by_key(|&seat| -self.scores[seat as usize]);
        seats
    }
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}
