/// 可执行文件入口（用于测试和调试）

use krmj_engine::{MatchController, RoundOutcome, SimpleAi};

fn main() {
    println!("한국 마작 엔진 데모");

    let mut rng = rand::thread_rng();
    let mut controller = MatchController::default();
    let mut ai = SimpleAi;

    let rolls = controller.roll_for_initial_dealer(&mut rng);
    for (seat, (a, b)) in rolls.iter().enumerate() {
        println!("座位 {} 掷骰：{} + {} = {}", seat, a, b, a + b);
    }

    while !controller.is_finished() {
        match controller.play_round(&mut ai, &mut rng) {
            Ok(record) => match &record.outcome {
                RoundOutcome::Win(summary) => {
                    let names: Vec<&str> = summary.yaku.iter().map(|y| y.name()).collect();
                    println!(
                        "第 {} 局：座位 {} 和牌，{} 分（{}）",
                        record.round,
                        summary.winner,
                        summary.score,
                        names.join(", ")
                    );
                }
                RoundOutcome::Draw => {
                    println!("第 {} 局：流局", record.round);
                }
            },
            Err(error) => {
                println!("对局异常终止：{:?}", error);
                break;
            }
        }
    }

    println!("最终分数：{:?}", controller.scores);
    let ranking = controller.final_ranking();
    for (rank, seat) in ranking.iter().enumerate() {
        println!(
            "{} 位：座位 {}（{} 分）",
            rank + 1,
            seat,
            controller.scores[*seat as usize]
        );
    }
}
