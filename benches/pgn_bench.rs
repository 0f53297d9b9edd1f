use criterion::{criterion_group, criterion_main, Criterion, black_box};
use fenpgn::board::BoardState;
use fenpgn::pgn::GameRecord;
use shakmaty::uci::UciMove;

fn bench_replay_and_render(c: &mut Criterion) {
    let board = BoardState::parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let pv: Vec<UciMove> = ["f1b5", "a7a6", "b5a4", "g8f6", "e1g1", "f8e7", "f1e1", "b7b5", "a4b3", "d7d6"]
        .iter()
        .map(|m| m.parse().unwrap())
        .collect();
    c.bench_function("replay_render_ruy_lopez", |ben| {
        ben.iter(|| {
            let replay = board.replay(black_box(&pv)).unwrap();
            let mut game = GameRecord::new("Bench", 1);
            game.set_start(&board.fen().unwrap(), board.turn(), board.fullmoves());
            game.set_moves(replay.sans);
            game.set_comment("p=0.55");
            black_box(game.to_string())
        })
    });
}

criterion_group!(benches, bench_replay_and_render);
criterion_main!(benches);
