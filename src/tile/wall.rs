use super::tile::Tile;
use rand::seq::SliceRandom;
use rand::thread_rng;
use rand::Rng;

/// 牌墙结构常量：4 面 × 13 墩 × 2 层 = 104 张
pub const SIDES: usize = 4;
pub const STACKS_PER_SIDE: usize = 13;
pub const LAYERS_PER_STACK: usize = 2;

/// 座位 -> 牌墙面的固定映射
///
/// 面按牌墙自身的顺时针顺序编号 0-3；面 0、1 的墩沿递增方向
/// 遍历（0→12），面 2、3 沿递减方向（12→0），对应面对面落座的布局。
pub const SEAT_TO_SIDE: [usize; 4] = [2, 1, 0, 3];

/// 牌墙位置（面、墩、层）
///
/// 层 0 为下层，层 1 为上层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WallCursor {
    pub side: usize,
    pub stack: usize,
    pub layer: usize,
}

impl WallCursor {
    /// 位置对应的牌序号（0-103）
    ///
    /// 牌按面的顺时针顺序平铺：每面 26 张，每墩 2 张，下层在前。
    fn index(&self) -> usize {
        self.side * STACKS_PER_SIDE * LAYERS_PER_STACK + self.stack * LAYERS_PER_STACK + self.layer
    }
}

/// 面的墩遍历方向是否递增
#[inline]
fn side_ascending(side: usize) -> bool {
    side < 2
}

/// 面的顺时针首墩
#[inline]
fn first_stack(side: usize) -> usize {
    if side_ascending(side) {
        0
    } else {
        STACKS_PER_SIDE - 1
    }
}

/// 面的顺时针末墩（逆时针遍历从这里进入该面）
#[inline]
fn last_stack(side: usize) -> usize {
    if side_ascending(side) {
        STACKS_PER_SIDE - 1
    } else {
        0
    }
}

/// 沿顺时针方向的下一墩（同一面内），越界返回 None
#[inline]
fn next_stack(side: usize, stack: usize) -> Option<usize> {
    if side_ascending(side) {
        if stack + 1 < STACKS_PER_SIDE {
            Some(stack + 1)
        } else {
            None
        }
    } else if stack > 0 {
        Some(stack - 1)
    } else {
        None
    }
}

/// 沿逆时针方向的上一墩（同一面内），越界返回 None
#[inline]
fn prev_stack(side: usize, stack: usize) -> Option<usize> {
    if side_ascending(side) {
        if stack > 0 {
            Some(stack - 1)
        } else {
            None
        }
    } else if stack + 1 < STACKS_PER_SIDE {
        Some(stack + 1)
    } else {
        None
    }
}

/// 牌墙管理器（WallManager）
///
/// 持有洗好的 104 张牌序列和两个独立的抽牌游标：
/// - 一般牌游标（일반패）：从骰子决定的起点沿顺时针方向前进
/// - 王牌游标（왕패）：从起点的逆时针前一墩开始，沿逆时针方向前进，
///   专用于花牌补牌和杠后补牌
///
/// 两个游标永远不会重复占用同一位置；当 104 个位置全部被占用时
/// 牌墙枯竭，对局以流局结束。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WallManager {
    /// 洗好的牌序列，按位置序号索引
    tiles: Vec<Tile>,
    /// 已占用位置的位掩码（bit = 位置序号）
    dealt_mask: u128,
    /// 已占用位置数
    dealt_count: u16,
    /// 一般牌游标（set_break_position 之前为 None）
    live: Option<WallCursor>,
    /// 王牌游标
    dead: Option<WallCursor>,
}

impl WallManager {
    /// 从洗好的牌序列创建牌墙
    ///
    /// 序列长度必须是 104；游标在 `set_break_position` 之前不可用。
    pub fn new(tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), Tile::TOTAL_COUNT);
        Self {
            tiles,
            dealt_mask: 0,
            dealt_count: 0,
            live: None,
            dead: None,
        }
    }

    /// 生成完整牌池并用给定随机源洗牌
    pub fn shuffled_with<R: Rng>(rng: &mut R) -> Self {
        let mut tiles = Tile::full_set();
        tiles.shuffle(rng);
        Self::new(tiles)
    }

    /// 生成完整牌池并洗牌（线程本地随机源）
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut thread_rng())
    }

    /// 按骰子设置起始位置
    ///
    /// # 参数
    ///
    /// - `dice_sum`: 两个骰子的合计（2-12）
    /// - `dealer_seat`: 庄家座位（0-3），通过 `SEAT_TO_SIDE` 映射到牌墙面
    ///
    /// # 规则
    ///
    /// - 起始面：从庄家的面开始沿顺时针方向数 `dice_sum` 个面
    /// - 起始墩：沿该面自身的遍历方向前进 `(dice_sum - 1) % 13` 墩
    /// - 一般牌游标从起始位置的上层开始，上层 → 下层 → 顺时针下一墩
    /// - 王牌游标从起始位置的逆时针前一墩开始（同样上层在前），
    ///   严格沿逆时针方向前进
    pub fn set_break_position(&mut self, dice_sum: u8, dealer_seat: usize) {
        let dealer_side = SEAT_TO_SIDE[dealer_seat % SIDES];
        let start_side = (dealer_side + dice_sum as usize - 1) % SIDES;

        let steps = (dice_sum as usize - 1) % STACKS_PER_SIDE;
        let start_stack = if side_ascending(start_side) {
            steps
        } else {
            STACKS_PER_SIDE - 1 - steps
        };

        let live = WallCursor {
            side: start_side,
            stack: start_stack,
            layer: 1,
        };
        // 王牌起点：一般牌起点的逆时针前一墩
        let dead = match prev_stack(start_side, start_stack) {
            Some(stack) => WallCursor {
                side: start_side,
                stack,
                layer: 1,
            },
            None => {
                let side = (start_side + SIDES - 1) % SIDES;
                WallCursor {
                    side,
                    stack: last_stack(side),
                    layer: 1,
                }
            }
        };

        log::debug!(
            "wall break: dice={} dealer_side={} live={:?} dead={:?}",
            dice_sum,
            dealer_side,
            live,
            dead
        );

        self.live = Some(live);
        self.dead = Some(dead);
    }

    /// 一般牌游标前进一个位置（上层 → 下层 → 顺时针下一墩）
    fn advance_live(cursor: &mut WallCursor) {
        if cursor.layer == 1 {
            cursor.layer = 0;
        } else {
            cursor.layer = 1;
            match next_stack(cursor.side, cursor.stack) {
                Some(stack) => cursor.stack = stack,
                None => {
                    cursor.side = (cursor.side + 1) % SIDES;
                    cursor.stack = first_stack(cursor.side);
                }
            }
        }
    }

    /// 王牌游标前进一个位置（上层 → 下层 → 逆时针上一墩）
    fn advance_dead(cursor: &mut WallCursor) {
        if cursor.layer == 1 {
            cursor.layer = 0;
        } else {
            cursor.layer = 1;
            match prev_stack(cursor.side, cursor.stack) {
                Some(stack) => cursor.stack = stack,
                None => {
                    cursor.side = (cursor.side + SIDES - 1) % SIDES;
                    cursor.stack = last_stack(cursor.side);
                }
            }
        }
    }

    /// 从游标位置抽一张未被占用的牌
    ///
    /// 游标落在已占用的位置时静默跳到下一个位置（两个游标在牌墙
    /// 即将枯竭时会相互追上）；尝试 104 次仍找不到空位即为枯竭。
    fn draw_at(&mut self, is_live: bool) -> Option<Tile> {
        if self.dealt_count as usize >= Tile::TOTAL_COUNT {
            return None;
        }
        let mut cursor = if is_live { self.live? } else { self.dead? };

        for _ in 0..Tile::TOTAL_COUNT {
            let index = cursor.index();
            let bit = 1u128 << index;
            if self.dealt_mask & bit == 0 {
                self.dealt_mask |= bit;
                self.dealt_count += 1;
                let tile = self.tiles[index];
                if is_live {
                    Self::advance_live(&mut cursor);
                    self.live = Some(cursor);
                } else {
                    Self::advance_dead(&mut cursor);
                    self.dead = Some(cursor);
                }
                return Some(tile);
            }
            if is_live {
                Self::advance_live(&mut cursor);
            } else {
                Self::advance_dead(&mut cursor);
            }
        }
        None
    }

    /// 从一般牌墙抽一张牌
    ///
    /// 返回 `None` 表示牌墙枯竭（正常的终局状态，不是错误）。
    pub fn draw_live_tile(&mut self) -> Option<Tile> {
        self.draw_at(true)
    }

    /// 从王牌抽一张牌（花牌补牌、杠后补牌专用）
    pub fn draw_dead_tile(&mut self) -> Option<Tile> {
        self.draw_at(false)
    }

    /// 剩余牌数
    pub fn remaining_count(&self) -> usize {
        Tile::TOTAL_COUNT - self.dealt_count as usize
    }

    /// 已抽取的牌数
    pub fn dealt_count(&self) -> usize {
        self.dealt_count as usize
    }

    /// 牌墙是否枯竭
    pub fn is_exhausted(&self) -> bool {
        self.dealt_count as usize >= Tile::TOTAL_COUNT
    }

    /// 查询指定位置的牌是否已被抽走（渲染协作方用）
    ///
    /// 越界位置视为已抽走。
    pub fn is_position_dealt(&self, side: usize, stack: usize, layer: usize) -> bool {
        if side >= SIDES || stack >= STACKS_PER_SIDE || layer >= LAYERS_PER_STACK {
            return true;
        }
        let cursor = WallCursor { side, stack, layer };
        self.dealt_mask & (1u128 << cursor.index()) != 0
    }

    /// 当前一般牌游标位置（调试与快照用）
    pub fn live_cursor(&self) -> Option<WallCursor> {
        self.live
    }

    /// 当前王牌游标位置
    pub fn dead_cursor(&self) -> Option<WallCursor> {
        self.dead
    }
}
