use std::process::ExitCode;
use std::time::Instant;

use chess_core::board::Position;
use clap::Parser;
use log::debug;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Count leaf nodes of the legal move tree")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Print the node count below each root move
    #[arg(long, default_value_t = false)]
    divide: bool,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut pos = if args.fen == "startpos" {
        Position::startpos()
    } else {
        match Position::from_fen(&args.fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("invalid FEN: {err}");
                return ExitCode::FAILURE;
            }
        }
    };
    debug!("perft {} on {}", args.depth, pos.to_fen());

    let start = Instant::now();
    let nodes = if args.divide && args.depth > 0 {
        let mut total = 0;
        for (mv, count) in pos.perft_divide(args.depth) {
            println!("{mv}: {count}");
            total += count;
        }
        println!();
        total
    } else {
        pos.perft(args.depth)
    };
    let elapsed = start.elapsed().as_secs_f64();

    if args.nps {
        let nps = if elapsed > 0.0 { nodes as f64 / elapsed } else { f64::INFINITY };
        println!("nodes: {nodes} elapsed: {elapsed:.3}s nps: {nps:.0}");
    } else {
        println!("nodes: {nodes}");
    }
    ExitCode::SUCCESS
}
