use crate::game::scoring::{self, Meld};
use crate::tile::tile::{Dragon, Suit, Wind};
use crate::tile::win_check::{Decomposition, WinChecker};
use crate::tile::{Hand, Tile};

/// 和牌上下文
///
/// 役判定需要的局面信息：门清与否看副露（暗杠不破坏门清），
/// 花牌数量只影响最终得分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinContext {
    /// 是否自摸
    pub is_self_drawn: bool,
    /// 是否门清（无来自他家的副露）
    pub is_concealed: bool,
    /// 自风
    pub seat_wind: Wind,
    /// 场风
    pub round_wind: Wind,
    /// 花牌数量
    pub flower_count: u8,
}

/// 役（화료역）
///
/// 固定点数表是该地区规则的既定选择，不做任何"修正"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Yaku {
    /// 门清自摸（멘젠쯔모）
    ConcealedSelfDraw,
    /// 自风刻（자풍）
    SeatWind(Wind),
    /// 场风刻（장풍）
    RoundWind(Wind),
    /// 三元牌刻子（역패），每种单独计
    DragonTriple(Dragon),
    /// 小三元（소삼원）
    SmallThreeDragons,
    /// 大三元（대삼원）
    GrandThreeDragons,
    /// 小四喜（소사희）
    SmallFourWinds,
    /// 大四喜（대사희），点数表中无专列条目，按缺省 1 分计
    GrandFourWinds,
    /// 断幺（탕야오）
    AllSimples,
    /// 平和（핀후）：全顺子、无副露、对子非字牌
    AllRuns,
    /// 混一色（혼일색）
    HalfFlush,
    /// 清一色（청일색）
    FullFlush,
    /// 一气通贯（일기통관）
    PureStraight,
    /// 三暗刻（삼앙꼬），门清限定
    ThreeConcealedTriples,
    /// 四暗刻（사앙꼬），门清限定
    FourConcealedTriples,
    /// 副露状态下的四刻子（돌돌이），按缺省 1 分计
    FourTripletsOpen,
    /// 七种字牌齐全（칠대작）
    SevenHonorKinds,
    /// 两组暗杠（이깡자）
    TwoConcealedKongs,
    /// 九莲宝灯（구련보등）
    NineGates,
    /// 门清自摸且无其他役的保底役（부지부）
    NoYakuSelfDraw,
    /// 天和
    HeavenlyHand,
    /// 地和
    EarthlyHand,
    /// 人和
    HumanHand,
}

impl Yaku {
    /// 役的固定点数
    ///
    /// 未在表中专列的役走缺省 1 分档。
    pub fn points(&self) -> u32 {
        match self {
            Yaku::AllSimples
            | Yaku::AllRuns
            | Yaku::SeatWind(_)
            | Yaku::RoundWind(_)
            | Yaku::DragonTriple(_)
            | Yaku::ConcealedSelfDraw => 1,
            Yaku::HalfFlush | Yaku::TwoConcealedKongs => 2,
            Yaku::ThreeConcealedTriples | Yaku::PureStraight | Yaku::SevenHonorKinds => 4,
            Yaku::NoYakuSelfDraw => 5,
            Yaku::SmallThreeDragons => 6,
            Yaku::FullFlush
            | Yaku::GrandThreeDragons
            | Yaku::FourConcealedTriples
            | Yaku::SmallFourWinds => 8,
            Yaku::HeavenlyHand | Yaku::EarthlyHand | Yaku::HumanHand => 16,
            Yaku::NineGates => 24,
            Yaku::GrandFourWinds | Yaku::FourTripletsOpen => 1,
        }
    }

    /// 役的名称
    pub fn name(&self) -> &'static str {
        match self {
            Yaku::ConcealedSelfDraw => "concealed self-draw",
            Yaku::SeatWind(_) => "seat wind",
            Yaku::RoundWind(_) => "round wind",
            Yaku::DragonTriple(_) => "dragon triple",
            Yaku::SmallThreeDragons => "small three dragons",
            Yaku::GrandThreeDragons => "grand three dragons",
            Yaku::SmallFourWinds => "small four winds",
            Yaku::GrandFourWinds => "grand four winds",
            Yaku::AllSimples => "all simples",
            Yaku::AllRuns => "all runs",
            Yaku::HalfFlush => "half flush",
            Yaku::FullFlush => "full flush",
            Yaku::PureStraight => "pure straight",
            Yaku::ThreeConcealedTriples => "three concealed triples",
            Yaku::FourConcealedTriples => "four concealed triples",
            Yaku::FourTripletsOpen => "four triplets (open)",
            Yaku::SevenHonorKinds => "seven honor kinds",
            Yaku::TwoConcealedKongs => "two concealed kongs",
            Yaku::NineGates => "nine gates",
            Yaku::NoYakuSelfDraw => "no-yaku self-draw",
            Yaku::HeavenlyHand => "heavenly hand",
            Yaku::EarthlyHand => "earthly hand",
            Yaku::HumanHand => "human hand",
        }
    }
}

/// 和牌判定结果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinEvaluation {
    /// 找到的第一个分解
    pub decomposition: Decomposition,
    /// 按固定顺序匹配到的役
    pub yaku: Vec<Yaku>,
    /// 总得分
    pub score: u32,
}

/// 手牌判定器
///
/// 对手牌 + 副露 + 局面上下文做纯函数查询：牌型分解、役枚举、得分。
/// 牌型成立但无役的手不算和（무역 판정）。
pub struct HandEvaluator;

impl HandEvaluator {
    /// 判定和牌并计算役与得分
    ///
    /// # 参数
    ///
    /// - `hand`: 手牌（含刚摸/荣和的那张，共 `14 - 3 × 副露数` 张）
    /// - `melds`: 副露列表
    /// - `ctx`: 和牌上下文
    ///
    /// # 返回
    ///
    /// 和牌返回 `Some(WinEvaluation)`；牌数不符、牌型不成立或
    /// 无役时返回 `None`。
    pub fn evaluate(hand: &Hand, melds: &[Meld], ctx: &WinContext) -> Option<WinEvaluation> {
        if hand.total_count() != 14 - 3 * melds.len() {
            return None;
        }

        let virtual_hand = scoring::virtual_hand(hand, melds);
        let decomposition = WinChecker::new().decompose(&virtual_hand)?;

        let yaku = Self::enumerate_yaku(&virtual_hand, &decomposition, melds, ctx);
        if yaku.is_empty() {
            return None;
        }

        let score = scoring::total_score(&yaku, ctx);
        Some(WinEvaluation {
            decomposition,
            yaku,
            score,
        })
    }

    /// 是否和牌
    pub fn is_winning(hand: &Hand, melds: &[Meld], ctx: &WinContext) -> bool {
        Self::evaluate(hand, melds, ctx).is_some()
    }

    /// 按固定顺序枚举役
    ///
    /// 判定基于合成后的 14 张牌和实际找到的那个分解；
    /// 多解手牌只报告第一个分解对应的役。
    pub fn enumerate_yaku(
        virtual_hand: &Hand,
        decomposition: &Decomposition,
        melds: &[Meld],
        ctx: &WinContext,
    ) -> Vec<Yaku> {
        let mut yaku = Vec::new();
        let counts = virtual_hand.tiles_map();

        // 门清自摸
        if ctx.is_self_drawn && ctx.is_concealed {
            yaku.push(Yaku::ConcealedSelfDraw);
        }

        // 自风刻、场风刻（连风时两个都计）
        if virtual_hand.tile_count(Tile::Wind(ctx.seat_wind)) >= 3 {
            yaku.push(Yaku::SeatWind(ctx.seat_wind));
        }
        if virtual_hand.tile_count(Tile::Wind(ctx.round_wind)) >= 3 {
            yaku.push(Yaku::RoundWind(ctx.round_wind));
        }

        // 三元牌刻子与大小三元
        let mut dragon_triples = 0u8;
        let mut dragon_pairs = 0u8;
        for dragon in Dragon::all() {
            match virtual_hand.tile_count(Tile::Dragon(dragon)) {
                count if count >= 3 => {
                    dragon_triples += 1;
                    yaku.push(Yaku::DragonTriple(dragon));
                }
                2 => dragon_pairs += 1,
                _ => {}
            }
        }
        if dragon_triples == 3 {
            yaku.push(Yaku::GrandThreeDragons);
        } else if dragon_triples == 2 && dragon_pairs == 1 {
            yaku.push(Yaku::SmallThreeDragons);
        }

        // 风牌刻子与大小四喜
        let wind_triples = Wind::all()
            .iter()
            .filter(|w| virtual_hand.tile_count(Tile::Wind(**w)) >= 3)
            .count();
        if wind_triples == 4 {
            yaku.push(Yaku::GrandFourWinds);
        } else if wind_triples == 3 {
            yaku.push(Yaku::SmallFourWinds);
        }

        // 断幺
        if counts.keys().all(|tile| !tile.is_terminal_or_honor()) {
            yaku.push(Yaku::AllSimples);
        }

        // 平和：分解全为顺子、无副露、对子非字牌
        if melds.is_empty() && decomposition.all_runs() && !decomposition.head.is_honor() {
            yaku.push(Yaku::AllRuns);
        }

        // 混一色 / 清一色
        let mut active_suits = [false; 3];
        let mut honor_count = 0usize;
        for (tile, &count) in counts {
            match tile.suit() {
                Some(suit) => active_suits[suit as usize] = true,
                None => honor_count += count as usize,
            }
        }
        let suit_kinds = active_suits.iter().filter(|&&s| s).count();
        let single_suit = suit_kinds == 1;
        if single_suit && honor_count > 0 {
            yaku.push(Yaku::HalfFlush);
        } else if single_suit && honor_count == 0 {
            yaku.push(Yaku::FullFlush);
        }

        // 一气通贯：一种花色 1-9 齐全（14 张之内至多一种花色可能满足）
        for suit in Suit::all() {
            let complete = (Tile::MIN_RANK..=Tile::MAX_RANK).all(|rank| {
                Tile::suited(suit, rank)
                    .map(|tile| virtual_hand.has_tile(tile))
                    .unwrap_or(false)
            });
            if complete {
                yaku.push(Yaku::PureStraight);
                break;
            }
        }

        // 刻子数量役：合成后数量 ≥ 3 的牌类数
        let triple_classes = counts.values().filter(|&&count| count >= 3).count();
        if triple_classes == 4 {
            if ctx.is_concealed {
                yaku.push(Yaku::FourConcealedTriples);
            } else {
                yaku.push(Yaku::FourTripletsOpen);
            }
        } else if triple_classes == 3 && ctx.is_concealed {
            yaku.push(Yaku::ThreeConcealedTriples);
        }

        // 七种字牌齐全
        let honor_kinds = Wind::all()
            .iter()
            .map(|w| Tile::Wind(*w))
            .chain(Dragon::all().iter().map(|d| Tile::Dragon(*d)))
            .filter(|tile| virtual_hand.has_tile(*tile))
            .count();
        if honor_kinds == 7 {
            yaku.push(Yaku::SevenHonorKinds);
        }

        // 两组暗杠
        let concealed_kongs = melds.iter().filter(|m| m.is_concealed_kong()).count();
        if concealed_kongs >= 2 {
            yaku.push(Yaku::TwoConcealedKongs);
        }

        // 九莲宝灯：门清清一色 1112345678999 + 任意一张
        if ctx.is_concealed && melds.is_empty() && single_suit && honor_count == 0 {
            if let Some(suit) = Suit::all().iter().find(|s| active_suits[**s as usize]) {
                let count_of = |rank: u8| {
                    Tile::suited(*suit, rank)
                        .map(|tile| virtual_hand.tile_count(tile))
                        .unwrap_or(0)
                };
                let nine_gates = count_of(1) >= 3
                    && count_of(9) >= 3
                    && (2..=8).all(|rank| count_of(rank) >= 1);
                if nine_gates {
                    yaku.push(Yaku::NineGates);
                }
            }
        }

        // 保底役：门清自摸且除门清自摸外无任何役
        let only_self_draw = yaku.iter().all(|y| matches!(y, Yaku::ConcealedSelfDraw));
        if ctx.is_concealed && ctx.is_self_drawn && only_self_draw {
            yaku.push(Yaku::NoYakuSelfDraw);
        }

        yaku
    }
}
