use megahal::Engine;
use std::io::{stdin, stdout, Write};

const BRAIN_PATH: &str = "megahal.brn";
const CANDIDATES: usize = 10;

fn main() {
    let mut engine = Engine::from_file_or_new(BRAIN_PATH);

    // An optional corpus file trains the brain before the conversation.
    if let Some(path) = std::env::args().nth(1) {
        match std::fs::read_to_string(&path) {
            Ok(text) => match engine.learn(&text) {
                Ok(stats) => println!(
                    "Learned {} lines ({} tokens) from '{}'.",
                    stats.lines_learned, stats.tokens_learned, path
                ),
                Err(e) => eprintln!("[ERROR] Training failed: {}", e),
            },
            Err(e) => eprintln!("[ERROR] Could not read '{}': {}", path, e),
        }
    }

    println!("MegaHAL. Type 'exit' to save and quit.");
    println!("---------------------------------------------------------------");
    println!("{}", engine.greet(CANDIDATES));

    loop {
        print!("> ");
        stdout().flush().unwrap();

        let mut input = String::new();
        if stdin().read_line(&mut input).unwrap() == 0 {
            break;
        }
        let line = input.trim();

        match line {
            "exit" | "quit" => break,
            "" => continue,
            _ => match engine.converse(line, CANDIDATES) {
                Ok(reply) => println!("{}", reply),
                Err(e) => {
                    eprintln!("[ERROR] {}", e);
                    break;
                }
            },
        }
    }

    println!("\nSaving brain...");
    if let Err(e) = engine.save_brain() {
        eprintln!("[ERROR] Could not save brain: {}", e);
    } else {
        println!("Brain saved to '{}'", BRAIN_PATH);
    }
}
